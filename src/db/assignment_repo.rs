// src/db/assignment_repo.rs
// Tabelas de associação. As operações que mexem em estoque recebem um
// executor para rodar dentro da transação aberta pelo serviço.

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::assignment::{
        AgencyAsset, AgencyAssetView, AgencySupply, AgencySupplyView, UserAgency, UserSupply,
    },
};

const SUPPLY_VIEW: &str = r#"
    SELECT l.id, l.agency_id, a.name AS agency_name, l.supply_id, s.name AS supply_name,
           l.quantity, s.unit_price, (l.quantity * s.unit_price)::NUMERIC(14, 2) AS line_value,
           l.assigned_at
    FROM agency_supplies l
    JOIN agencies a ON a.id = l.agency_id
    JOIN supplies s ON s.id = l.supply_id
"#;

const ASSET_VIEW: &str = r#"
    SELECT l.id, l.agency_id, a.name AS agency_name, l.asset_id, i.code AS asset_code,
           i.name AS asset_name, l.quantity, l.assigned_date
    FROM agency_assets l
    JOIN agencies a ON a.id = l.agency_id
    JOIN assets i ON i.id = l.asset_id
"#;

#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Agência <-> Fornitura
    // ---

    pub async fn list_supply_views(
        &self,
        agency_id: Option<Uuid>,
        supply_id: Option<Uuid>,
    ) -> Result<Vec<AgencySupplyView>, AppError> {
        let rows = sqlx::query_as::<_, AgencySupplyView>(&format!(
            r#"{SUPPLY_VIEW}
            WHERE ($1::UUID IS NULL OR l.agency_id = $1)
              AND ($2::UUID IS NULL OR l.supply_id = $2)
            ORDER BY a.name, s.name"#
        ))
        .bind(agency_id)
        .bind(supply_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_supply_view<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<AgencySupplyView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencySupplyView>(&format!("{SUPPLY_VIEW} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn find_supply_link_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<AgencySupply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencySupply>(
            "SELECT * FROM agency_supplies WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn find_supply_link_by_pair<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
        supply_id: Uuid,
    ) -> Result<Option<AgencySupply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencySupply>(
            "SELECT * FROM agency_supplies WHERE agency_id = $1 AND supply_id = $2 FOR UPDATE",
        )
        .bind(agency_id)
        .bind(supply_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn list_supply_links_for_agency<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
    ) -> Result<Vec<AgencySupply>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, AgencySupply>(
            "SELECT * FROM agency_supplies WHERE agency_id = $1 FOR UPDATE",
        )
        .bind(agency_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn insert_supply_link<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
        supply_id: Uuid,
        quantity: i32,
    ) -> Result<AgencySupply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AgencySupply>(
            r#"
            INSERT INTO agency_supplies (agency_id, supply_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(agency_id)
        .bind(supply_id)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Esta fornitura já está atribuída a esta agência."))
    }

    pub async fn set_supply_link_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<AgencySupply, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencySupply>(
            r#"
            UPDATE agency_supplies SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn delete_supply_link<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM agency_supplies WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Agência <-> Imobilização
    // ---

    pub async fn list_asset_views(
        &self,
        agency_id: Option<Uuid>,
        asset_id: Option<Uuid>,
    ) -> Result<Vec<AgencyAssetView>, AppError> {
        let rows = sqlx::query_as::<_, AgencyAssetView>(&format!(
            r#"{ASSET_VIEW}
            WHERE ($1::UUID IS NULL OR l.agency_id = $1)
              AND ($2::UUID IS NULL OR l.asset_id = $2)
            ORDER BY a.name, i.code"#
        ))
        .bind(agency_id)
        .bind(asset_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_asset_view<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<AgencyAssetView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencyAssetView>(&format!("{ASSET_VIEW} WHERE l.id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn find_asset_link_for_update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<AgencyAsset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencyAsset>("SELECT * FROM agency_assets WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn find_asset_link_by_pair<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
        asset_id: Uuid,
    ) -> Result<Option<AgencyAsset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencyAsset>(
            "SELECT * FROM agency_assets WHERE agency_id = $1 AND asset_id = $2 FOR UPDATE",
        )
        .bind(agency_id)
        .bind(asset_id)
        .fetch_optional(executor)
        .await?;
        Ok(row)
    }

    pub async fn insert_asset_link<'e, E>(
        &self,
        executor: E,
        agency_id: Uuid,
        asset_id: Uuid,
        quantity: i32,
        assigned_date: NaiveDate,
    ) -> Result<AgencyAsset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, AgencyAsset>(
            r#"
            INSERT INTO agency_assets (agency_id, asset_id, quantity, assigned_date)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(agency_id)
        .bind(asset_id)
        .bind(quantity)
        .bind(assigned_date)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "Esta imobilização já está atribuída a esta agência."))
    }

    pub async fn update_asset_link<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
        assigned_date: NaiveDate,
    ) -> Result<AgencyAsset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, AgencyAsset>(
            r#"
            UPDATE agency_assets SET quantity = $2, assigned_date = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(assigned_date)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn delete_asset_link(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM agency_assets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Usuário <-> Agência (um para um)
    // ---

    pub async fn list_user_agencies(&self, agency_id: Option<Uuid>) -> Result<Vec<UserAgency>, AppError> {
        let rows = sqlx::query_as::<_, UserAgency>(
            r#"
            SELECT * FROM user_agencies
            WHERE ($1::UUID IS NULL OR agency_id = $1)
            ORDER BY assigned_at DESC
            "#,
        )
        .bind(agency_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn find_user_agency(&self, id: Uuid) -> Result<Option<UserAgency>, AppError> {
        let row = sqlx::query_as::<_, UserAgency>("SELECT * FROM user_agencies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn insert_user_agency(&self, user_id: Uuid, agency_id: Uuid) -> Result<UserAgency, AppError> {
        sqlx::query_as::<_, UserAgency>(
            r#"
            INSERT INTO user_agencies (user_id, agency_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(agency_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Este usuário já está vinculado a uma agência."))
    }

    pub async fn move_user_agency(&self, id: Uuid, agency_id: Uuid) -> Result<Option<UserAgency>, AppError> {
        let row = sqlx::query_as::<_, UserAgency>(
            r#"
            UPDATE user_agencies SET agency_id = $2, assigned_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(agency_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn delete_user_agency(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_agencies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ---
    // Usuário <-> Fornitura (muitos para muitos)
    // ---

    pub async fn list_user_supplies(
        &self,
        user_id: Option<Uuid>,
        supply_id: Option<Uuid>,
    ) -> Result<Vec<UserSupply>, AppError> {
        let rows = sqlx::query_as::<_, UserSupply>(
            r#"
            SELECT * FROM user_supplies
            WHERE ($1::UUID IS NULL OR user_id = $1)
              AND ($2::UUID IS NULL OR supply_id = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(supply_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn insert_user_supply(&self, user_id: Uuid, supply_id: Uuid) -> Result<UserSupply, AppError> {
        sqlx::query_as::<_, UserSupply>(
            r#"
            INSERT INTO user_supplies (user_id, supply_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(supply_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Esta fornitura já está vinculada a este usuário."))
    }

    pub async fn delete_user_supply(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM user_supplies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
