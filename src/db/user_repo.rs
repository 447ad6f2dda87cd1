// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::auth::{User, UserRole},
};

const DUPLICATE_EMAIL: &str = "Este e-mail já está em uso.";

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY last_name, first_name")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário no banco de dados
    pub async fn create_user(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        hashed_password: &str,
        role: UserRole,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(hashed_password)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        // Converte erro de violação de chave única em um erro mais amigável
        .map_err(|e| map_constraint_violation(e, DUPLICATE_EMAIL))
    }

    /// Atualiza os dados do usuário. `hashed_password = None` mantém a senha atual.
    pub async fn update_user(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        email: &str,
        role: UserRole,
        hashed_password: Option<&str>,
    ) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET first_name = $2,
                last_name = $3,
                email = $4,
                role = $5,
                password_hash = COALESCE($6, password_hash),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(role)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_EMAIL))
    }

    pub async fn delete_user(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
