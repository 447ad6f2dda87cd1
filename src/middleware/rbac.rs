// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::{User, UserRole},
};

/// Guardião das rotas administrativas (usuários e importação).
/// Depende do `auth_guard` ter rodado antes; o papel checado é o do banco.
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden);
        }
        Ok(RequireAdmin(user))
    }
}
