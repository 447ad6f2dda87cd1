// src/handlers/categories.rs

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
    models::category::{Category, CategoryNode},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    #[validate(
        length(min = 1, max = 100, message = "O nome da categoria é obrigatório (máx. 100)."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/Categories",
    tag = "Categories",
    responses((status = 200, description = "Lista plana", body = Vec<Category>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_categories(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.category_service.list().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/api/Categories/tree",
    tag = "Categories",
    responses((status = 200, description = "Árvore de categorias", body = Vec<CategoryNode>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_category_tree(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let tree = app_state.category_service.tree().await?;
    Ok(Json(tree))
}

#[utoipa::path(
    get,
    path = "/api/Categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 200, description = "Categoria", body = Category),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_category(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let category = app_state.category_service.get(id).await?;
    Ok(Json(category))
}

#[utoipa::path(
    post,
    path = "/api/Categories",
    tag = "Categories",
    request_body = CategoryPayload,
    responses(
        (status = 201, description = "Categoria criada", body = Category),
        (status = 404, description = "Categoria pai não encontrada"),
        (status = 409, description = "Nome já usado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .category_service
        .create(&payload.name, payload.description.as_deref(), payload.parent_id)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/api/Categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    request_body = CategoryPayload,
    responses(
        (status = 200, description = "Categoria atualizada", body = Category),
        (status = 400, description = "Ciclo na hierarquia"),
        (status = 404, description = "Categoria não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_category(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<CategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state
        .category_service
        .update(id, &payload.name, payload.description.as_deref(), payload.parent_id)
        .await?;

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/api/Categories/{id}",
    tag = "Categories",
    params(("id" = Uuid, Path, description = "ID da categoria")),
    responses(
        (status = 204, description = "Categoria removida"),
        (status = 404, description = "Categoria não encontrada"),
        (status = 409, description = "Categoria ainda possui subcategorias ou fornituras")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_category(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
