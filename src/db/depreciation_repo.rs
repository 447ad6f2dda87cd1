// src/db/depreciation_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::depreciation::{Depreciation, ScheduleLine},
};

#[derive(Clone)]
pub struct DepreciationRepository {
    pool: PgPool,
}

impl DepreciationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lista com filtros opcionais por imobilização e por ano.
    pub async fn list(
        &self,
        asset_id: Option<Uuid>,
        year: Option<i32>,
    ) -> Result<Vec<Depreciation>, AppError> {
        let rows = sqlx::query_as::<_, Depreciation>(
            r#"
            SELECT * FROM depreciations
            WHERE ($1::UUID IS NULL OR asset_id = $1)
              AND ($2::INTEGER IS NULL OR year = $2)
            ORDER BY asset_id, year ASC
            "#,
        )
        .bind(asset_id)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Depreciation>, AppError> {
        let row = sqlx::query_as::<_, Depreciation>("SELECT * FROM depreciations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn list_for_asset<'e, E>(&self, executor: E, asset_id: Uuid) -> Result<Vec<Depreciation>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, Depreciation>(
            "SELECT * FROM depreciations WHERE asset_id = $1 ORDER BY year ASC",
        )
        .bind(asset_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Soma das anuidades registradas antes de `year`.
    pub async fn accumulated_before<'e, E>(
        &self,
        executor: E,
        asset_id: Uuid,
        year: i32,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(annual_amount), 0)::NUMERIC
            FROM depreciations
            WHERE asset_id = $1 AND year < $2
            "#,
        )
        .bind(asset_id)
        .bind(year)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn insert<'e, E>(&self, executor: E, asset_id: Uuid, line: &ScheduleLine) -> Result<Depreciation, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Depreciation>(
            r#"
            INSERT INTO depreciations (asset_id, year, annual_amount, accumulated_amount, net_book_value)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(asset_id)
        .bind(line.year)
        .bind(line.annual_amount)
        .bind(line.accumulated_amount)
        .bind(line.net_book_value)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Já existe uma amortização para esta imobilização neste ano."))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM depreciations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_for_asset<'e, E>(&self, executor: E, asset_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM depreciations WHERE asset_id = $1")
            .bind(asset_id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
