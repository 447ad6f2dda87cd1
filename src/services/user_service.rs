// src/services/user_service.rs
// Gestão de contas pelos administradores.

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{User, UserRole},
    services::auth::AuthService,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    auth_service: AuthService,
}

impl UserService {
    pub fn new(user_repo: UserRepository, auth_service: AuthService) -> Self {
        Self { user_repo, auth_service }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário"))
    }

    pub async fn create(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        self.auth_service
            .register_user(first_name, last_name, email, password, role)
            .await
    }

    /// `password = None` mantém a senha atual.
    pub async fn update(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
        role: UserRole,
        password: Option<&str>,
    ) -> Result<User, AppError> {
        let hashed = match password {
            Some(password) => Some(AuthService::hash_password(password).await?),
            None => None,
        };

        self.user_repo
            .update_user(id, first_name.trim(), last_name.trim(), email.trim(), role, hashed.as_deref())
            .await?
            .ok_or_else(|| AppError::not_found("Usuário"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete_user(id).await? {
            return Err(AppError::not_found("Usuário"));
        }
        Ok(())
    }
}
