// src/models/asset.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "asset_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    InService,
    UnderRepair,
    Disposed, // Baixado: não pode mais ser atribuído
}

impl Default for AssetStatus {
    fn default() -> Self {
        AssetStatus::InService
    }
}

// --- Imobilização ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    pub code: String, // Único (etiqueta / código de barras)
    pub name: String,
    pub category_id: Option<Uuid>,
    pub acquisition_value: Decimal,
    pub acquisition_date: NaiveDate,
    pub useful_life_years: i32,
    pub quantity: i32,
    pub status: AssetStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Detalhe com os valores derivados (distribuição e amortização)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: Asset,
    pub assigned_quantity: i64,
    pub available_quantity: i64,
    pub accumulated_depreciation: Decimal,
    pub net_book_value: Decimal,
    pub depreciation_end_date: Option<NaiveDate>,
}
