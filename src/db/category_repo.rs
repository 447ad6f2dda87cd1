// src/db/category_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_constraint_violation, error::AppError},
    models::category::Category,
};

const DUPLICATE_NAME: &str = "Já existe uma categoria com este nome.";

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    // Usado pela importação, que referencia categorias pelo nome
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// Cria uma nova categoria (raiz ou subcategoria).
    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, parent_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(parent_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_NAME))
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Option<Category>, AppError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2, description = $3, parent_id = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(parent_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_constraint_violation(e, DUPLICATE_NAME))
    }

    /// Falha com 409 se a categoria ainda tiver filhas ou fornituras (RESTRICT).
    pub async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                map_constraint_violation(
                    e,
                    "A categoria ainda possui subcategorias ou fornituras vinculadas.",
                )
            })?;
        Ok(result.rows_affected() > 0)
    }
}
