// src/db/asset_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::asset::{Asset, AssetStatus},
};

const DUPLICATE_CODE: &str = "Já existe uma imobilização com este código.";

pub struct AssetFields<'a> {
    pub code: &'a str,
    pub name: &'a str,
    pub category_id: Option<Uuid>,
    pub acquisition_value: Decimal,
    pub acquisition_date: NaiveDate,
    pub useful_life_years: i32,
    pub quantity: i32,
    pub status: AssetStatus,
}

#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Asset>, AppError> {
        let assets = sqlx::query_as::<_, Asset>("SELECT * FROM assets ORDER BY code ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(assets)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(asset)
    }

    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(asset)
    }

    /// Quantidade já distribuída às agências. `except_link` exclui uma
    /// associação (útil ao recalcular a própria linha numa edição).
    pub async fn assigned_quantity<'e, E>(
        &self,
        executor: E,
        asset_id: Uuid,
        except_link: Option<Uuid>,
    ) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::BIGINT
            FROM agency_assets
            WHERE asset_id = $1 AND ($2::UUID IS NULL OR id <> $2)
            "#,
        )
        .bind(asset_id)
        .bind(except_link)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn create<'e, E>(&self, executor: E, fields: &AssetFields<'_>) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets
                (code, name, category_id, acquisition_value, acquisition_date,
                 useful_life_years, quantity, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(fields.code)
        .bind(fields.name)
        .bind(fields.category_id)
        .bind(fields.acquisition_value)
        .bind(fields.acquisition_date)
        .bind(fields.useful_life_years)
        .bind(fields.quantity)
        .bind(fields.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_CODE))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        fields: &AssetFields<'_>,
    ) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets
            SET code = $2,
                name = $3,
                category_id = $4,
                acquisition_value = $5,
                acquisition_date = $6,
                useful_life_years = $7,
                quantity = $8,
                status = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.code)
        .bind(fields.name)
        .bind(fields.category_id)
        .bind(fields.acquisition_value)
        .bind(fields.acquisition_date)
        .bind(fields.useful_life_years)
        .bind(fields.quantity)
        .bind(fields.status)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_CODE))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
