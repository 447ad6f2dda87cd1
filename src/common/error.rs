// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Tipo de erro único da aplicação. Os handlers devolvem `Result<_, AppError>`
// e a conversão para HTTP fica toda aqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("Estoque insuficiente: disponível {available}, solicitado {requested}")]
    InsufficientStock { available: i64, requested: i64 },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso reservado aos administradores")]
    Forbidden,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(what: &str) -> Self {
        AppError::NotFound(format!("{what} não encontrado(a)."))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::BadRequest(_)
            | AppError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Os payloads circulam em camelCase; os nomes de campo do validator, não.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(camel_case(&field), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::InvalidCredentials => "E-mail ou senha inválidos.".to_string(),
            AppError::InvalidToken => "Sessão inválida ou expirada.".to_string(),
            AppError::DatabaseError(sqlx::Error::RowNotFound) => {
                "Registro não encontrado.".to_string()
            }
            // O detalhe dos erros internos vai para o log, nunca para o cliente.
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use validator::{ValidationError, ValidationErrors};

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[rstest]
    #[case(AppError::BadRequest("x".into()), StatusCode::BAD_REQUEST)]
    #[case(AppError::InsufficientStock { available: 1, requested: 2 }, StatusCode::BAD_REQUEST)]
    #[case(AppError::not_found("Agência"), StatusCode::NOT_FOUND)]
    #[case(AppError::Conflict("dup".into()), StatusCode::CONFLICT)]
    #[case(AppError::InvalidToken, StatusCode::UNAUTHORIZED)]
    #[case(AppError::Forbidden, StatusCode::FORBIDDEN)]
    #[case(AppError::DatabaseError(sqlx::Error::RowNotFound), StatusCode::NOT_FOUND)]
    #[case(AppError::DatabaseError(sqlx::Error::PoolTimedOut), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_variants_to_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let error = AppError::InternalServerError(anyhow::anyhow!("senha do banco: hunter2"));
        let body = body_json(error.into_response()).await;
        assert_eq!(body["error"], "Ocorreu um erro inesperado.");
    }

    #[tokio::test]
    async fn insufficient_stock_reports_quantities() {
        let error = AppError::InsufficientStock { available: 3, requested: 5 };
        let body = body_json(error.into_response()).await;
        assert_eq!(
            body["error"],
            "Estoque insuficiente: disponível 3, solicitado 5"
        );
    }

    #[tokio::test]
    async fn validation_errors_are_grouped_by_field() {
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("length");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("name", err);
        errors.add("unit_price", ValidationError::new("range"));

        let response = AppError::ValidationError(errors).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["details"]["name"][0], "O nome é obrigatório.");
        assert_eq!(body["details"]["unitPrice"][0], "range");
    }
}
