// src/handlers/user_supplies.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath, AppQuery}},
    config::AppState,
    models::assignment::UserSupply,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserSupplyFilter {
    pub user_id: Option<Uuid>,
    pub supply_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkUserSupplyPayload {
    pub user_id: Uuid,
    pub supply_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/UserSupplies",
    tag = "UserSupplies",
    params(UserSupplyFilter),
    responses((status = 200, description = "Vínculos usuário-fornitura", body = Vec<UserSupply>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_user_supplies(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<UserSupplyFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state
        .assignment_service
        .list_user_supplies(filter.user_id, filter.supply_id)
        .await?;
    Ok(Json(rows))
}

#[utoipa::path(
    post,
    path = "/api/UserSupplies",
    tag = "UserSupplies",
    request_body = LinkUserSupplyPayload,
    responses(
        (status = 201, description = "Vínculo criado", body = UserSupply),
        (status = 404, description = "Usuário ou fornitura não encontrado"),
        (status = 409, description = "Vínculo já existe")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn link_user_supply(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LinkUserSupplyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state
        .assignment_service
        .link_user_to_supply(payload.user_id, payload.supply_id)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/UserSupplies/{id}",
    tag = "UserSupplies",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_user_supply(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.assignment_service.unlink_user_from_supply(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
