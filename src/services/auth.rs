// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Claims, User, UserRole},
};

// Nome do cookie que carrega o JWT da sessão
pub const AUTH_COOKIE: &str = "auth_token";

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, jwt_secret: String, token_ttl_hours: i64) -> Self {
        Self { user_repo, jwt_secret, token_ttl_hours }
    }

    pub async fn hash_password(password: &str) -> Result<String, AppError> {
        let password_clone = password.to_owned();
        let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
        Ok(hashed)
    }

    pub async fn register_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        let hashed_password = Self::hash_password(password).await?;
        self.user_repo
            .create_user(first_name.trim(), last_name.trim(), email.trim(), &hashed_password, role)
            .await
    }

    /// Verifica as credenciais e devolve o usuário com um token novo.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok((user, token))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
    }

    pub async fn current_user(&self, claims: &Claims) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::hours(self.token_ttl_hours);

        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    /// Cria o administrador inicial (ADMIN_EMAIL / ADMIN_PASSWORD) se ainda não existir.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }
        self.register_user("Admin", "Système", email, password, UserRole::Admin)
            .await?;
        tracing::info!("👤 Administrador inicial {} criado.", email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn service(secret: &str, ttl_hours: i64) -> AuthService {
        // Pool preguiçoso: nenhum teste aqui toca o banco
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/gestion_stock_test")
            .expect("lazy pool");
        AuthService::new(UserRepository::new(pool), secret.to_string(), ttl_hours)
    }

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            first_name: "Awa".into(),
            last_name: "Diallo".into(),
            email: "awa@agence.local".into(),
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn token_carries_identity_and_role() {
        let auth = service("segredo", 8);
        let admin = user(UserRole::Admin);

        let token = auth.create_token(&admin).expect("token");
        let claims = auth.validate_token(&token).expect("claims");

        assert_eq!(claims.sub, admin.id);
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.email, "awa@agence.local");
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_rejected() {
        let token = service("outro", 8).create_token(&user(UserRole::User)).expect("token");
        assert!(matches!(
            service("segredo", 8).validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let auth = service("segredo", -2);
        let token = auth.create_token(&user(UserRole::User)).expect("token");
        assert!(matches!(auth.validate_token(&token), Err(AppError::InvalidToken)));
    }
}
