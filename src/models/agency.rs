// src/models/agency.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::assignment::{AgencyAssetView, AgencySupplyView};

// --- Agência ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: Uuid,
    pub agency_number: String, // Único
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Tudo o que uma agência detém: fornituras, imobilizações e o valor do estoque.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyInventory {
    pub agency: Agency,
    pub supplies: Vec<AgencySupplyView>,
    pub assets: Vec<AgencyAssetView>,
    pub supplies_value: Decimal,
}
