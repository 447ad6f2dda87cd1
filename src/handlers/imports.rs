// src/handlers/imports.rs

use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};

use crate::{
    common::{error::AppError, extract::AppPath},
    config::AppState,
    middleware::rbac::RequireAdmin,
    models::import::ImportReport,
    services::import_service::ImportEntity,
};

// Corpo do upload: campo `file` com a planilha
#[derive(utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ImportUpload {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    post,
    path = "/api/Import/{entity}",
    tag = "Import",
    params(("entity" = String, Path, description = "agencies | categories | supplies | assets")),
    request_body(content = ImportUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Relatório da importação", body = ImportReport),
        (status = 400, description = "Arquivo inválido, entidade desconhecida ou colunas ausentes"),
        (status = 403, description = "Reservado aos administradores")
    ),
    security(("api_jwt" = []), ("cookie_auth" = []))
)]
pub async fn import_sheet(
    State(app_state): State<AppState>,
    _admin: RequireAdmin,
    AppPath(entity): AppPath<String>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let entity: ImportEntity = entity.parse()?;

    let mut file_data: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Falha ao ler o formulário: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_lowercase();
        if !filename.ends_with(".xlsx") {
            return Err(AppError::BadRequest(
                "Apenas arquivos .xlsx são aceitos.".to_string(),
            ));
        }

        file_data = Some(
            field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Falha ao ler o arquivo: {e}")))?
                .to_vec(),
        );
    }

    let file_data =
        file_data.ok_or_else(|| AppError::BadRequest("O campo 'file' é obrigatório.".to_string()))?;

    tracing::info!("📤 Upload de {} bytes para importação de {}.", file_data.len(), entity.as_str());

    let report = app_state.import_service.import(entity, file_data).await?;
    Ok(Json(report))
}
