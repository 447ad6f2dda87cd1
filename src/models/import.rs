// src/models/import.rs

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RowError {
    pub row: usize, // Número da linha na planilha (o cabeçalho é a linha 1)
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub entity: String,
    pub total_rows: usize,
    pub imported: usize,
    pub errors: Vec<RowError>,
}
