// src/handlers/users.rs
// Gestão de usuários: só administradores.

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
    common::{error::AppError, extract::{AppJson, AppPath}},
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::auth::{User, UserRole},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub first_name: String,
    #[validate(length(min = 1, message = "O sobrenome é obrigatório."))]
    pub last_name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    pub role: UserRole,
    // Ausente = mantém a senha atual
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/Users",
    tag = "Users",
    responses(
        (status = 200, description = "Usuários", body = Vec<User>),
        (status = 403, description = "Reservado aos administradores")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list().await?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/Users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let user = app_state.user_service.get(id).await?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/Users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    AppJson(payload): AppJson<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .create(
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    put,
    path = "/api/Users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = app_state
        .user_service
        .update(
            id,
            &payload.first_name,
            &payload.last_name,
            &payload.email,
            payload.role,
            payload.password.as_deref(),
        )
        .await?;

    Ok(Json(user))
}

#[utoipa::path(
    delete,
    path = "/api/Users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
