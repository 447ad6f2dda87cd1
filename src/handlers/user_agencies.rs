// src/handlers/user_agencies.rs
// Cada usuário pertence a no máximo uma agência.

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
    models::assignment::UserAgency,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserAgencyFilter {
    pub agency_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkUserAgencyPayload {
    pub user_id: Uuid,
    pub agency_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveUserAgencyPayload {
    pub agency_id: Uuid,
}

#[utoipa::path(
    get,
    path = "/api/UserAgencies",
    tag = "UserAgencies",
    params(UserAgencyFilter),
    responses((status = 200, description = "Vínculos usuário-agência", body = Vec<UserAgency>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_user_agencies(
    State(app_state): State<AppState>,
    AppQuery(filter): AppQuery<UserAgencyFilter>,
) -> Result<impl IntoResponse, AppError> {
    let rows = app_state.assignment_service.list_user_agencies(filter.agency_id).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/api/UserAgencies/{id}",
    tag = "UserAgencies",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 200, description = "Vínculo", body = UserAgency),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_user_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state.assignment_service.get_user_agency(id).await?;
    Ok(Json(row))
}

#[utoipa::path(
    post,
    path = "/api/UserAgencies",
    tag = "UserAgencies",
    request_body = LinkUserAgencyPayload,
    responses(
        (status = 201, description = "Usuário vinculado", body = UserAgency),
        (status = 404, description = "Usuário ou agência não encontrado"),
        (status = 409, description = "Usuário já vinculado a uma agência")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn link_user_agency(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<LinkUserAgencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state
        .assignment_service
        .link_user_to_agency(payload.user_id, payload.agency_id)
        .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    put,
    path = "/api/UserAgencies/{id}",
    tag = "UserAgencies",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    request_body = MoveUserAgencyPayload,
    responses(
        (status = 200, description = "Usuário transferido", body = UserAgency),
        (status = 404, description = "Vínculo ou agência não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn move_user_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<MoveUserAgencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    let row = app_state
        .assignment_service
        .move_user_to_agency(id, payload.agency_id)
        .await?;
    Ok(Json(row))
}

#[utoipa::path(
    delete,
    path = "/api/UserAgencies/{id}",
    tag = "UserAgencies",
    params(("id" = Uuid, Path, description = "ID do vínculo")),
    responses(
        (status = 204, description = "Vínculo removido"),
        (status = 404, description = "Vínculo não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_user_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.assignment_service.unlink_user_from_agency(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
