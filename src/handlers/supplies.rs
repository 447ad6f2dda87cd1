// src/handlers/supplies.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath},
        money::round_money,
        validation::{validate_not_blank, validate_not_negative},
    },
    config::AppState,
    db::supply_repo::SupplyFields,
    models::supply::{CmupGroup, SupplyView},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyPayload {
    #[validate(
        length(min = 1, max = 200, message = "O nome é obrigatório (máx. 200)."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    pub category_id: Uuid,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_price: Decimal,

    // Ausente = data de hoje
    pub purchase_date: Option<NaiveDate>,

    pub supplier: Option<String>,
}

impl SupplyPayload {
    fn fields(&self) -> SupplyFields<'_> {
        SupplyFields {
            name: self.name.trim(),
            category_id: self.category_id,
            quantity: self.quantity,
            unit_price: round_money(self.unit_price),
            purchase_date: self.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
            supplier: self.supplier.as_deref(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/Supplies",
    tag = "Supplies",
    responses((status = 200, description = "Lotes com CMUP e valor em estoque", body = Vec<SupplyView>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_supplies(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let supplies = app_state.supply_service.list().await?;
    Ok(Json(supplies))
}

#[utoipa::path(
    get,
    path = "/api/Supplies/{id}",
    tag = "Supplies",
    params(("id" = Uuid, Path, description = "ID da fornitura")),
    responses(
        (status = 200, description = "Fornitura", body = SupplyView),
        (status = 404, description = "Fornitura não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let supply = app_state.supply_service.get(id).await?;
    Ok(Json(supply))
}

#[utoipa::path(
    post,
    path = "/api/Supplies",
    tag = "Supplies",
    request_body = SupplyPayload,
    responses(
        (status = 201, description = "Lote registrado", body = SupplyView),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_supply(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<SupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let supply = app_state.supply_service.create(payload.fields()).await?;
    Ok((StatusCode::CREATED, Json(supply)))
}

#[utoipa::path(
    put,
    path = "/api/Supplies/{id}",
    tag = "Supplies",
    params(("id" = Uuid, Path, description = "ID da fornitura")),
    request_body = SupplyPayload,
    responses(
        (status = 200, description = "Lote atualizado", body = SupplyView),
        (status = 400, description = "Quantidade menor que o já distribuído"),
        (status = 404, description = "Fornitura ou categoria não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<SupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let supply = app_state.supply_service.update(id, payload.fields()).await?;
    Ok(Json(supply))
}

#[utoipa::path(
    delete,
    path = "/api/Supplies/{id}",
    tag = "Supplies",
    params(("id" = Uuid, Path, description = "ID da fornitura")),
    responses(
        (status = 204, description = "Fornitura removida"),
        (status = 404, description = "Fornitura não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.supply_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/Supplies/cmup",
    tag = "Supplies",
    responses((status = 200, description = "CMUP por nome e categoria", body = Vec<CmupGroup>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_cmup(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let groups = app_state.supply_service.cmup_groups().await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/Supplies/{id}/cmup",
    tag = "Supplies",
    params(("id" = Uuid, Path, description = "ID da fornitura")),
    responses(
        (status = 200, description = "CMUP do grupo da fornitura", body = CmupGroup),
        (status = 404, description = "Fornitura não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_supply_cmup(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let group = app_state.supply_service.cmup_for(id).await?;
    Ok(Json(group))
}
