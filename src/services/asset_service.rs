// src/services/asset_service.rs

use chrono::{Datelike, Months, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{asset_repo::AssetFields, AssetRepository, CategoryRepository, DepreciationRepository},
    models::asset::{Asset, AssetDetail},
    services::depreciation_service::book_values_at,
};

/// Fim do plano: data de aquisição + vida útil em anos.
pub fn depreciation_end_date(acquisition_date: NaiveDate, useful_life_years: i32) -> Option<NaiveDate> {
    let months = u32::try_from(useful_life_years).ok()?.checked_mul(12)?;
    acquisition_date.checked_add_months(Months::new(months))
}

#[derive(Clone)]
pub struct AssetService {
    pool: PgPool,
    asset_repo: AssetRepository,
    category_repo: CategoryRepository,
    depreciation_repo: DepreciationRepository,
}

impl AssetService {
    pub fn new(
        pool: PgPool,
        asset_repo: AssetRepository,
        category_repo: CategoryRepository,
        depreciation_repo: DepreciationRepository,
    ) -> Self {
        Self { pool, asset_repo, category_repo, depreciation_repo }
    }

    pub async fn list(&self) -> Result<Vec<Asset>, AppError> {
        self.asset_repo.list().await
    }

    /// Imobilização com distribuição e valores contábeis do ano corrente.
    pub async fn detail(&self, id: Uuid) -> Result<AssetDetail, AppError> {
        let asset = self
            .asset_repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        let assigned = self.asset_repo.assigned_quantity(&self.pool, id, None).await?;
        let entries = self.depreciation_repo.list_for_asset(&self.pool, id).await?;
        let (accumulated, net_book_value) =
            book_values_at(&entries, asset.acquisition_value, Utc::now().year());

        Ok(AssetDetail {
            assigned_quantity: assigned,
            available_quantity: i64::from(asset.quantity) - assigned,
            accumulated_depreciation: accumulated,
            net_book_value,
            depreciation_end_date: depreciation_end_date(asset.acquisition_date, asset.useful_life_years),
            asset,
        })
    }

    pub async fn create(&self, fields: AssetFields<'_>) -> Result<AssetDetail, AppError> {
        self.ensure_category(fields.category_id).await?;
        let asset = self.asset_repo.create(&self.pool, &fields).await?;
        tracing::info!("🏷️ Imobilização '{}' registrada.", asset.code);
        self.detail(asset.id).await
    }

    /// A quantidade não pode cair abaixo do que já está nas agências.
    pub async fn update(&self, id: Uuid, fields: AssetFields<'_>) -> Result<AssetDetail, AppError> {
        self.ensure_category(fields.category_id).await?;

        let mut tx = self.pool.begin().await?;

        self.asset_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        let assigned = self.asset_repo.assigned_quantity(&mut *tx, id, None).await?;
        if i64::from(fields.quantity) < assigned {
            return Err(AppError::BadRequest(format!(
                "A quantidade não pode ser inferior ao total atribuído às agências ({assigned})."
            )));
        }

        self.asset_repo.update(&mut *tx, id, &fields).await?;
        tx.commit().await?;

        self.detail(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.asset_repo.delete(id).await? {
            return Err(AppError::not_found("Imobilização"));
        }
        Ok(())
    }

    async fn ensure_category(&self, category_id: Option<Uuid>) -> Result<(), AppError> {
        if let Some(category_id) = category_id {
            self.category_repo
                .find_by_id(&self.pool, category_id)
                .await?
                .ok_or_else(|| AppError::not_found("Categoria"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_date_adds_whole_years() {
        let acquired = NaiveDate::from_ymd_opt(2024, 7, 1).expect("date");
        assert_eq!(
            depreciation_end_date(acquired, 5),
            NaiveDate::from_ymd_opt(2029, 7, 1)
        );
    }

    #[test]
    fn end_date_clamps_leap_day() {
        let acquired = NaiveDate::from_ymd_opt(2024, 2, 29).expect("date");
        assert_eq!(
            depreciation_end_date(acquired, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28)
        );
    }

    #[test]
    fn negative_life_has_no_end_date() {
        let acquired = NaiveDate::from_ymd_opt(2024, 1, 1).expect("date");
        assert_eq!(depreciation_end_date(acquired, -1), None);
    }
}
