// src/handlers/agencies.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, extract::{AppJson, AppPath}, validation::validate_not_blank},
    config::AppState,
    models::agency::{Agency, AgencyInventory},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyPayload {
    #[validate(
        length(min = 1, max = 50, message = "O número da agência é obrigatório (máx. 50)."),
        custom(function = "validate_not_blank")
    )]
    pub agency_number: String,

    #[validate(
        length(min = 1, max = 200, message = "O nome da agência é obrigatório (máx. 200)."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    pub address: Option<String>,

    #[validate(length(max = 50, message = "Telefone muito longo."))]
    pub phone: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/Agencies",
    tag = "Agencies",
    responses((status = 200, description = "Agências por número", body = Vec<Agency>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_agencies(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let agencies = app_state.agency_service.list().await?;
    Ok(Json(agencies))
}

#[utoipa::path(
    get,
    path = "/api/Agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 200, description = "Agência", body = Agency),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let agency = app_state.agency_service.get(id).await?;
    Ok(Json(agency))
}

#[utoipa::path(
    post,
    path = "/api/Agencies",
    tag = "Agencies",
    request_body = AgencyPayload,
    responses(
        (status = 201, description = "Agência criada", body = Agency),
        (status = 409, description = "Número de agência já usado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_agency(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<AgencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let agency = app_state
        .agency_service
        .create(
            &payload.agency_number,
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(agency)))
}

#[utoipa::path(
    put,
    path = "/api/Agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    request_body = AgencyPayload,
    responses(
        (status = 200, description = "Agência atualizada", body = Agency),
        (status = 404, description = "Agência não encontrada"),
        (status = 409, description = "Número de agência já usado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<AgencyPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let agency = app_state
        .agency_service
        .update(
            id,
            &payload.agency_number,
            &payload.name,
            payload.address.as_deref(),
            payload.phone.as_deref(),
        )
        .await?;

    Ok(Json(agency))
}

// A exclusão devolve ao estoque tudo o que a agência tinha recebido
#[utoipa::path(
    delete,
    path = "/api/Agencies/{id}",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 204, description = "Agência removida e estoque devolvido"),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_agency(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.assignment_service.delete_agency(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/Agencies/{id}/inventory",
    tag = "Agencies",
    params(("id" = Uuid, Path, description = "ID da agência")),
    responses(
        (status = 200, description = "Fornituras e imobilizações da agência", body = AgencyInventory),
        (status = 404, description = "Agência não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_agency_inventory(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let inventory = app_state.assignment_service.agency_inventory(id).await?;
    Ok(Json(inventory))
}
