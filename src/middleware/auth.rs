// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::User,
    services::auth::AUTH_COOKIE,
};

/// Usuário da sessão, recarregado do banco pelo `auth_guard` a cada requisição.
/// O papel vale o que está no banco, não o que o token diz.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Cookie da sessão primeiro; cabeçalho `Authorization: Bearer` como alternativa
/// para clientes que não guardam cookies.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE) {
        return Some(cookie.value().to_string());
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
}

pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(request.headers()).ok_or(AppError::InvalidToken)?;
    let claims = app_state.auth_service.validate_token(&token)?;

    // Conta excluída depois da emissão do token: sessão inválida
    let user = app_state.auth_service.current_user(&claims).await?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
