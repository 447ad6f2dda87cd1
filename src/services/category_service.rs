// src/services/category_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CategoryRepository,
    models::category::{Category, CategoryNode},
};

/// Monta a árvore a partir da lista plana. Categorias cujo pai não está na
/// lista sobem para a raiz.
pub fn build_tree(categories: &[Category]) -> Vec<CategoryNode> {
    let known: HashMap<Uuid, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let mut children: HashMap<Option<Uuid>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| known.contains_key(p));
        children.entry(parent).or_default().push(category);
    }

    fn build(parent: Option<Uuid>, children: &HashMap<Option<Uuid>, Vec<&Category>>) -> Vec<CategoryNode> {
        let mut nodes: Vec<CategoryNode> = children
            .get(&parent)
            .map(|list| {
                list.iter()
                    .map(|c| CategoryNode {
                        id: c.id,
                        name: c.name.clone(),
                        description: c.description.clone(),
                        children: build(Some(c.id), children),
                    })
                    .collect()
            })
            .unwrap_or_default();
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    build(None, &children)
}

/// `true` se `new_parent` for a própria categoria ou um de seus descendentes.
pub fn creates_cycle(categories: &[Category], id: Uuid, new_parent: Uuid) -> bool {
    let parents: HashMap<Uuid, Option<Uuid>> = categories.iter().map(|c| (c.id, c.parent_id)).collect();

    let mut current = Some(new_parent);
    let mut steps = 0;
    while let Some(node) = current {
        if node == id {
            return true;
        }
        steps += 1;
        if steps > categories.len() {
            // Árvore já corrompida
            return true;
        }
        current = parents.get(&node).copied().flatten();
    }
    false
}

#[derive(Clone)]
pub struct CategoryService {
    pool: PgPool,
    category_repo: CategoryRepository,
}

impl CategoryService {
    pub fn new(pool: PgPool, category_repo: CategoryRepository) -> Self {
        Self { pool, category_repo }
    }

    pub async fn list(&self) -> Result<Vec<Category>, AppError> {
        self.category_repo.list().await
    }

    pub async fn tree(&self) -> Result<Vec<CategoryNode>, AppError> {
        let categories = self.category_repo.list().await?;
        Ok(build_tree(&categories))
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, AppError> {
        self.category_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Categoria"))
    }

    pub async fn create(
        &self,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        if let Some(parent_id) = parent_id {
            self.ensure_parent(parent_id).await?;
        }
        self.category_repo.create(name.trim(), description, parent_id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, AppError> {
        if let Some(parent_id) = parent_id {
            self.ensure_parent(parent_id).await?;
            let categories = self.category_repo.list().await?;
            if creates_cycle(&categories, id, parent_id) {
                return Err(AppError::BadRequest(
                    "Uma categoria não pode ser subcategoria de si mesma nem de suas descendentes."
                        .to_string(),
                ));
            }
        }

        self.category_repo
            .update(id, name.trim(), description, parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Categoria"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.category_repo.delete(id).await? {
            return Err(AppError::not_found("Categoria"));
        }
        Ok(())
    }

    async fn ensure_parent(&self, parent_id: Uuid) -> Result<(), AppError> {
        self.category_repo
            .find_by_id(&self.pool, parent_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Categoria pai não encontrada.".to_string()))?;
        Ok(())
    }
}
