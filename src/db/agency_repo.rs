// src/db/agency_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::agency::Agency,
};

const DUPLICATE_NUMBER: &str = "Já existe uma agência com este número.";

#[derive(Clone)]
pub struct AgencyRepository {
    pool: PgPool,
}

impl AgencyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Agency>, AppError> {
        let agencies = sqlx::query_as::<_, Agency>("SELECT * FROM agencies ORDER BY agency_number ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(agencies)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Agency>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let agency = sqlx::query_as::<_, Agency>("SELECT * FROM agencies WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(agency)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        agency_number: &str,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Agency, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Agency>(
            r#"
            INSERT INTO agencies (agency_number, name, address, phone)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(agency_number)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_NUMBER))
    }

    pub async fn update(
        &self,
        id: Uuid,
        agency_number: &str,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Option<Agency>, AppError> {
        sqlx::query_as::<_, Agency>(
            r#"
            UPDATE agencies
            SET agency_number = $2, name = $3, address = $4, phone = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(agency_number)
        .bind(name)
        .bind(address)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_NUMBER))
    }

    /// Remove a agência. As associações caem por cascata; quem chama é
    /// responsável por devolver o estoque antes.
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM agencies WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
