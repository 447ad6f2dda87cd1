// src/handlers/agency_assets.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath, AppQuery}},
    config::AppState,
    models::assignment::AgencyAssetView,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AgencyAssetFilter {
    pub agency_id: Option<Uuid>,
    pub asset_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAssetPayload {
    pub agency_id: Uuid,
    pub asset_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
    // Ausente = hoje
    pub assigned_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssetAssignmentPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
    pub assigned_date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/AgencyAssets",
    tag = "AgencyAssets",
    params(AgencyAssetFilter),
    responses((status = 200, description = "Atribuições", body = Vec<AgencyAssetView>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_agency_assets(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<AgencyAssetFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .assignment_service
        .list_assets(filter.agency_id, filter.asset_id)
        .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/AgencyAssets/{id}",
    tag = "AgencyAssets",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    responses(
        (status = 200, description = "Atribuição", body = AgencyAssetView),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_agency_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.assignment_service.get_asset(id).await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/api/AgencyAssets",
    tag = "AgencyAssets",
    request_body = AssignAssetPayload,
    responses(
        (status = 201, description = "Imobilização atribuída", body = AgencyAssetView),
        (status = 400, description = "Quantidade indisponível ou imobilização baixada"),
        (status = 404, description = "Agência ou imobilização não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn assign_asset(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<AssignAssetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .assignment_service
        .assign_asset(payload.agency_id, payload.asset_id, payload.quantity, payload.assigned_date)
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/AgencyAssets/{id}",
    tag = "AgencyAssets",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    request_body = UpdateAssetAssignmentPayload,
    responses(
        (status = 200, description = "Atribuição atualizada", body = AgencyAssetView),
        (status = 400, description = "Quantidade indisponível"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_agency_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateAssetAssignmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .assignment_service
        .update_asset_assignment(id, payload.quantity, payload.assigned_date)
        .await?;

    Ok(Json(row))
}

#[utoipa::path(
    delete,
    path = "/api/AgencyAssets/{id}",
    tag = "AgencyAssets",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    responses(
        (status = 204, description = "Atribuição removida"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_agency_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.assignment_service.remove_asset_assignment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
