// src/models/depreciation.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Amortização (uma linha por imobilização e por ano) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Depreciation {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub year: i32,
    pub annual_amount: Decimal,
    pub accumulated_amount: Decimal,
    pub net_book_value: Decimal,
    pub created_at: DateTime<Utc>,
}

// Linha do plano calculado, antes de ir para o banco
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleLine {
    pub year: i32,
    pub annual_amount: Decimal,
    pub accumulated_amount: Decimal,
    pub net_book_value: Decimal,
}

// Consolidação anual (todas as imobilizações)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: i32,
    pub asset_count: usize,
    pub total_annual_amount: Decimal,
    pub total_accumulated_amount: Decimal,
    pub total_net_book_value: Decimal,
}
