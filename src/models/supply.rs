// src/models/supply.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Fornitura (um lote de compra) ---
// `quantity` é o que foi comprado; `remaining_quantity` o que ainda não foi
// distribuído às agências.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    pub id: Uuid,
    pub name: String,
    pub category_id: Uuid,
    pub quantity: i32,
    pub remaining_quantity: i32,
    pub unit_price: Decimal,
    pub purchase_date: NaiveDate,
    pub supplier: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha de listagem: a fornitura com o nome da categoria (JOIN)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub supply: Supply,
    pub category_name: String,
}

// Resposta da API: fornitura + CMUP do seu grupo + valor do estoque restante
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyView {
    #[serde(flatten)]
    pub supply: Supply,
    pub category_name: String,
    pub cmup: Decimal,
    pub stock_value: Decimal,
}

// Agregado do CMUP de um grupo (nome + categoria)
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CmupGroup {
    pub name: String,
    pub category_id: Uuid,
    pub category_name: String,
    pub lots: usize,
    pub total_quantity: i64,
    pub remaining_quantity: i64,
    pub total_value: Decimal,
    pub cmup: Decimal,
}
