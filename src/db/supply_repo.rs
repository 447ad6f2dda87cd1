// src/db/supply_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::supply::{Supply, SupplyWithCategory},
};

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT s.*, c.name AS category_name
    FROM supplies s
    JOIN categories c ON c.id = s.category_id
"#;

// Campos graváveis de uma fornitura
pub struct SupplyFields<'a> {
    pub name: &'a str,
    pub category_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub purchase_date: NaiveDate,
    pub supplier: Option<&'a str>,
}

#[derive(Clone)]
pub struct SupplyRepository {
    pool: PgPool,
}

impl SupplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---

    pub async fn list_with_category(&self) -> Result<Vec<SupplyWithCategory>, AppError> {
        let rows = sqlx::query_as::<_, SupplyWithCategory>(&format!(
            "{SELECT_WITH_CATEGORY} ORDER BY s.name ASC, s.purchase_date ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_with_category(&self, id: Uuid) -> Result<Option<SupplyWithCategory>, AppError> {
        let row = sqlx::query_as::<_, SupplyWithCategory>(&format!(
            "{SELECT_WITH_CATEGORY} WHERE s.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Supply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply = sqlx::query_as::<_, Supply>("SELECT * FROM supplies WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(supply)
    }

    /// Mesma leitura, mas trava a linha até o fim da transação.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Supply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply = sqlx::query_as::<_, Supply>("SELECT * FROM supplies WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(supply)
    }

    // ---
    // Escrita
    // ---

    /// Cria um lote. O restante começa igual à quantidade comprada.
    pub async fn create<'e, E>(&self, executor: E, fields: &SupplyFields<'_>) -> Result<Supply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            INSERT INTO supplies
                (name, category_id, quantity, remaining_quantity, unit_price, purchase_date, supplier)
            VALUES ($1, $2, $3, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(fields.name)
        .bind(fields.category_id)
        .bind(fields.quantity)
        .bind(fields.unit_price)
        .bind(fields.purchase_date)
        .bind(fields.supplier)
        .fetch_one(executor)
        .await?;
        Ok(supply)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        fields: &SupplyFields<'_>,
        remaining_quantity: i32,
    ) -> Result<Supply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            UPDATE supplies
            SET name = $2,
                category_id = $3,
                quantity = $4,
                remaining_quantity = $5,
                unit_price = $6,
                purchase_date = $7,
                supplier = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fields.name)
        .bind(fields.category_id)
        .bind(fields.quantity)
        .bind(remaining_quantity)
        .bind(fields.unit_price)
        .bind(fields.purchase_date)
        .bind(fields.supplier)
        .fetch_one(executor)
        .await?;
        Ok(supply)
    }

    /// Soma `delta` ao restante (negativo = saída para uma agência).
    pub async fn adjust_remaining<'e, E>(&self, executor: E, id: Uuid, delta: i32) -> Result<Supply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            UPDATE supplies
            SET remaining_quantity = remaining_quantity + $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_one(executor)
        .await?;
        Ok(supply)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM supplies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
