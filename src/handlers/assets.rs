// src/handlers/assets.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
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
    db::asset_repo::AssetFields,
    models::asset::{Asset, AssetDetail, AssetStatus},
};

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetPayload {
    #[validate(
        length(min = 1, max = 50, message = "O código é obrigatório (máx. 50)."),
        custom(function = "validate_not_blank")
    )]
    pub code: String,

    #[validate(
        length(min = 1, max = 200, message = "A designação é obrigatória (máx. 200)."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    pub category_id: Option<Uuid>,

    #[validate(custom(function = "validate_not_negative"))]
    pub acquisition_value: Decimal,

    pub acquisition_date: NaiveDate,

    #[validate(range(min = 1, max = 100, message = "A vida útil deve estar entre 1 e 100 anos."))]
    pub useful_life_years: i32,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    #[serde(default)]
    pub status: AssetStatus,
}

impl AssetPayload {
    fn fields(&self) -> AssetFields<'_> {
        AssetFields {
            code: self.code.trim(),
            name: self.name.trim(),
            category_id: self.category_id,
            acquisition_value: round_money(self.acquisition_value),
            acquisition_date: self.acquisition_date,
            useful_life_years: self.useful_life_years,
            quantity: self.quantity,
            status: self.status,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/Assets",
    tag = "Assets",
    responses((status = 200, description = "Imobilizações", body = Vec<Asset>)),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn list_assets(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let assets = app_state.asset_service.list().await?;
    Ok(Json(assets))
}

#[utoipa::path(
    get,
    path = "/api/Assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID da imobilização")),
    responses(
        (status = 200, description = "Imobilização com distribuição e valor contábil", body = AssetDetail),
        (status = 404, description = "Imobilização não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn get_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let asset = app_state.asset_service.detail(id).await?;
    Ok(Json(asset))
}

#[utoipa::path(
    post,
    path = "/api/Assets",
    tag = "Assets",
    request_body = AssetPayload,
    responses(
        (status = 201, description = "Imobilização registrada", body = AssetDetail),
        (status = 409, description = "Código já usado")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn create_asset(
    State(app_state): State<AppState>,
    AppJson(payload): AppJson<AssetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let asset = app_state.asset_service.create(payload.fields()).await?;
    Ok((StatusCode::CREATED, Json(asset)))
}

#[utoipa::path(
    put,
    path = "/api/Assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID da imobilização")),
    request_body = AssetPayload,
    responses(
        (status = 200, description = "Imobilização atualizada", body = AssetDetail),
        (status = 400, description = "Quantidade abaixo do total atribuído"),
        (status = 404, description = "Imobilização não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn update_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(payload): AppJson<AssetPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let asset = app_state.asset_service.update(id, payload.fields()).await?;
    Ok(Json(asset))
}

#[utoipa::path(
    delete,
    path = "/api/Assets/{id}",
    tag = "Assets",
    params(("id" = Uuid, Path, description = "ID da imobilização")),
    responses(
        (status = 204, description = "Imobilização removida com seu plano de amortização"),
        (status = 404, description = "Imobilização não encontrada")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn delete_asset(
    State(app_state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.asset_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
