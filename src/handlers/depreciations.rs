// src/handlers/depreciations.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        extract::{AppJson, AppPath, AppQuery},
        money::round_money,
        validation::validate_not_negative,
    },
    config::AppState,
    models::depreciation::{Depreciation, YearSummary},
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DepreciationFilter {
    pub asset_id: Option<Uuid>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SummaryFilter {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepreciationPayload {
    pub asset_id: Uuid,

    #[validate(range(min = 1900, max = 2200, message = "Ano inválido."))]
    pub year: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub annual_amount: Decimal,
}

#[utoipa::path(
    get,
    path = "/api/Depreciations",
    tag = "Depreciations",
    params(DepreciationFilter),
    responses((status = 200, description = "Lançamentos de amortização", body = Vec<Depreciation>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_depreciations(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<DepreciationFilter>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state
        .depreciation_service
        .list(filter.asset_id, filter.year)
        .await?;
    Ok(Json(entries))
}

#[utoipa::path(
    get,
    path = "/api/Depreciations/{id}",
    tag = "Depreciations",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 200, description = "Lançamento", body = Depreciation),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_depreciation(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let entry = app_state.depreciation_service.get(id).await?;
    Ok(Json(entry))
}

#[utoipa::path(
    post,
    path = "/api/Depreciations",
    tag = "Depreciations",
    request_body = CreateDepreciationPayload,
    responses(
        (status = 201, description = "Lançamento manual registrado", body = Depreciation),
        (status = 400, description = "Acumulado acima do valor de aquisição"),
        (status = 404, description = "Imobilização não encontrada"),
        (status = 409, description = "Ano já lançado para esta imobilização")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_depreciation(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CreateDepreciationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let entry = app_state
        .depreciation_service
        .create_manual(payload.asset_id, payload.year, round_money(payload.annual_amount))
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/Depreciations/{id}",
    tag = "Depreciations",
    params(("id" = Uuid, Path, description = "ID do lançamento")),
    responses(
        (status = 204, description = "Lançamento removido"),
        (status = 404, description = "Lançamento não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_depreciation(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.depreciation_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Recalcula o plano linear inteiro da imobilização
#[utoipa::path(
    post,
    path = "/api/Depreciations/generate/{asset_id}",
    tag = "Depreciations",
    params(("asset_id" = Uuid, Path, description = "ID da imobilização")),
    responses(
        (status = 201, description = "Plano gerado", body = Vec<Depreciation>),
        (status = 404, description = "Imobilização não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn generate_schedule(
    State(app_state): State<AppState>,
    AppPath(asset_id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let schedule = app_state.depreciation_service.generate(asset_id).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    get,
    path = "/api/Depreciations/summary",
    tag = "Depreciations",
    params(SummaryFilter),
    responses((status = 200, description = "Totais por exercício", body = Vec<YearSummary>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<SummaryFilter>,
) -> Result<impl IntoResponse, AppError> {
    let summary = app_state.depreciation_service.summary(filter.year).await?;
    Ok(Json(summary))
}
