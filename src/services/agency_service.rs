// src/services/agency_service.rs
// A exclusão de agências devolve estoque e por isso fica no AssignmentService.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, db::AgencyRepository, models::agency::Agency};

#[derive(Clone)]
pub struct AgencyService {
    pool: PgPool,
    agency_repo: AgencyRepository,
}

impl AgencyService {
    pub fn new(pool: PgPool, agency_repo: AgencyRepository) -> Self {
        Self { pool, agency_repo }
    }

    pub async fn list(&self) -> Result<Vec<Agency>, AppError> {
        self.agency_repo.list().await
    }

    pub async fn get(&self, id: Uuid) -> Result<Agency, AppError> {
        self.agency_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))
    }

    pub async fn create(
        &self,
        agency_number: &str,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Agency, AppError> {
        let agency = self
            .agency_repo
            .create(&self.pool, agency_number.trim(), name.trim(), address, phone)
            .await?;
        tracing::info!("🏢 Agência {} ({}) criada.", agency.agency_number, agency.name);
        Ok(agency)
    }

    pub async fn update(
        &self,
        id: Uuid,
        agency_number: &str,
        name: &str,
        address: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Agency, AppError> {
        self.agency_repo
            .update(id, agency_number.trim(), name.trim(), address, phone)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))
    }
}
