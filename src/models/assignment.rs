// src/models/assignment.rs
// Tabelas de associação: agência <-> fornitura, agência <-> imobilização,
// usuário <-> agência e usuário <-> fornitura.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencySupply {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub supply_id: Uuid,
    pub quantity: i32,
    pub assigned_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencySupplyView {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub agency_name: String,
    pub supply_id: Uuid,
    pub supply_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_value: Decimal,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyAsset {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub asset_id: Uuid,
    pub quantity: i32,
    pub assigned_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyAssetView {
    pub id: Uuid,
    pub agency_id: Uuid,
    pub agency_name: String,
    pub asset_id: Uuid,
    pub asset_code: String,
    pub asset_name: String,
    pub quantity: i32,
    pub assigned_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAgency {
    pub id: Uuid,
    pub user_id: Uuid,
    pub agency_id: Uuid,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSupply {
    pub id: Uuid,
    pub user_id: Uuid,
    pub supply_id: Uuid,
    pub created_at: DateTime<Utc>,
}
