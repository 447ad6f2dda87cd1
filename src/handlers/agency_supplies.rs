// src/handlers/agency_supplies.rs
// Distribuição de fornituras às agências. Cada operação mexe no estoque
// restante da fornitura.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath, AppQuery}},
    config::AppState,
    models::assignment::AgencySupplyView,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AgencySupplyFilter {
    pub agency_id: Option<Uuid>,
    pub supply_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignSupplyPayload {
    pub agency_id: Uuid,
    pub supply_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateQuantityPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[utoipa::path(
    get,
    path = "/api/AgencySupplies",
    tag = "AgencySupplies",
    params(AgencySupplyFilter),
    responses((status = 200, description = "Atribuições", body = Vec<AgencySupplyView>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_agency_supplies(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<AgencySupplyFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .assignment_service
        .list_supplies(filter.agency_id, filter.supply_id)
        .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/AgencySupplies/{id}",
    tag = "AgencySupplies",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    responses(
        (status = 200, description = "Atribuição", body = AgencySupplyView),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_agency_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.assignment_service.get_supply(id).await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/api/AgencySupplies",
    tag = "AgencySupplies",
    request_body = AssignSupplyPayload,
    responses(
        (status = 201, description = "Fornitura entregue à agência", body = AgencySupplyView),
        (status = 400, description = "Estoque insuficiente"),
        (status = 404, description = "Agência ou fornitura não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn assign_supply(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<AssignSupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .assignment_service
        .assign_supply(payload.agency_id, payload.supply_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/AgencySupplies/{id}",
    tag = "AgencySupplies",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    request_body = UpdateQuantityPayload,
    responses(
        (status = 200, description = "Quantidade ajustada", body = AgencySupplyView),
        (status = 400, description = "Estoque insuficiente"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_agency_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateQuantityPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let row = app_state
        .assignment_service
        .update_supply_assignment(id, payload.quantity)
        .await?;

    Ok(Json(row))
}

#[utoipa::path(
    delete,
    path = "/api/AgencySupplies/{id}",
    tag = "AgencySupplies",
    params(("id" = Uuid, Path, description = "ID da atribuição")),
    responses(
        (status = 204, description = "Atribuição removida e quantidade devolvida ao estoque"),
        (status = 404, description = "Atribuição não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_agency_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.assignment_service.remove_supply_assignment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
