// src/services/assignment_service.rs
// Regras de estoque entre agências, fornituras e imobilizações.
// Toda leitura-modificação-escrita roda numa transação com a linha de estoque
// travada (FOR UPDATE).

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AgencyRepository, AssetRepository, AssignmentRepository, SupplyRepository, UserRepository},
    models::{
        agency::AgencyInventory,
        asset::AssetStatus,
        assignment::{AgencyAssetView, AgencySupplyView, UserAgency, UserSupply},
    },
};

/// Verifica se `requested` cabe em `available`.
pub fn ensure_available(available: i64, requested: i64) -> Result<(), AppError> {
    if requested > available {
        return Err(AppError::InsufficientStock { available, requested });
    }
    Ok(())
}

pub fn ensure_positive_quantity(quantity: i32) -> Result<(), AppError> {
    if quantity <= 0 {
        return Err(AppError::BadRequest(
            "A quantidade deve ser maior que zero.".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct AssignmentService {
    pool: PgPool,
    assignment_repo: AssignmentRepository,
    agency_repo: AgencyRepository,
    supply_repo: SupplyRepository,
    asset_repo: AssetRepository,
    user_repo: UserRepository,
}

impl AssignmentService {
    pub fn new(
        pool: PgPool,
        assignment_repo: AssignmentRepository,
        agency_repo: AgencyRepository,
        supply_repo: SupplyRepository,
        asset_repo: AssetRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self { pool, assignment_repo, agency_repo, supply_repo, asset_repo, user_repo }
    }

    // ---
    // Agência <-> Fornitura
    // ---

    pub async fn list_supplies(
        &self,
        agency_id: Option<Uuid>,
        supply_id: Option<Uuid>,
    ) -> Result<Vec<AgencySupplyView>, AppError> {
        self.assignment_repo.list_supply_views(agency_id, supply_id).await
    }

    pub async fn get_supply(&self, id: Uuid) -> Result<AgencySupplyView, AppError> {
        self.assignment_repo
            .find_supply_view(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de fornitura"))
    }

    /// Entrega `quantity` unidades de uma fornitura a uma agência.
    /// Se a agência já possui a fornitura, as quantidades se acumulam.
    pub async fn assign_supply(
        &self,
        agency_id: Uuid,
        supply_id: Uuid,
        quantity: i32,
    ) -> Result<AgencySupplyView, AppError> {
        ensure_positive_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;

        self.agency_repo
            .find_by_id(&mut *tx, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))?;

        let supply = self
            .supply_repo
            .find_by_id_for_update(&mut *tx, supply_id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;

        ensure_available(i64::from(supply.remaining_quantity), i64::from(quantity))?;

        let existing = self
            .assignment_repo
            .find_supply_link_by_pair(&mut *tx, agency_id, supply_id)
            .await?;

        let link = match existing {
            Some(link) => {
                self.assignment_repo
                    .set_supply_link_quantity(&mut *tx, link.id, link.quantity + quantity)
                    .await?
            }
            None => {
                self.assignment_repo
                    .insert_supply_link(&mut *tx, agency_id, supply_id, quantity)
                    .await?
            }
        };

        self.supply_repo.adjust_remaining(&mut *tx, supply_id, -quantity).await?;

        let view = self
            .assignment_repo
            .find_supply_view(&mut *tx, link.id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de fornitura"))?;

        tx.commit().await?;

        tracing::info!(
            "🚚 {} x '{}' atribuídas à agência '{}' (total na agência: {}).",
            quantity,
            view.supply_name,
            view.agency_name,
            view.quantity
        );
        Ok(view)
    }

    /// Redefine a quantidade de uma atribuição. A diferença sai do (ou volta
    /// para o) restante da fornitura.
    pub async fn update_supply_assignment(&self, id: Uuid, quantity: i32) -> Result<AgencySupplyView, AppError> {
        ensure_positive_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;

        let link = self
            .assignment_repo
            .find_supply_link_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de fornitura"))?;

        let supply = self
            .supply_repo
            .find_by_id_for_update(&mut *tx, link.supply_id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;

        let delta = quantity - link.quantity;
        ensure_available(i64::from(supply.remaining_quantity), i64::from(delta))?;

        self.assignment_repo.set_supply_link_quantity(&mut *tx, id, quantity).await?;
        if delta != 0 {
            self.supply_repo.adjust_remaining(&mut *tx, link.supply_id, -delta).await?;
        }

        let view = self
            .assignment_repo
            .find_supply_view(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de fornitura"))?;

        tx.commit().await?;
        Ok(view)
    }

    /// Desfaz a atribuição devolvendo as unidades ao estoque.
    pub async fn remove_supply_assignment(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let link = self
            .assignment_repo
            .find_supply_link_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de fornitura"))?;

        self.supply_repo
            .adjust_remaining(&mut *tx, link.supply_id, link.quantity)
            .await?;
        self.assignment_repo.delete_supply_link(&mut *tx, id).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Exclui a agência devolvendo todo o estoque de fornituras que ela detinha.
    pub async fn delete_agency(&self, agency_id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.agency_repo
            .find_by_id(&mut *tx, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))?;

        let links = self
            .assignment_repo
            .list_supply_links_for_agency(&mut *tx, agency_id)
            .await?;
        for link in &links {
            self.supply_repo
                .adjust_remaining(&mut *tx, link.supply_id, link.quantity)
                .await?;
        }

        self.agency_repo.delete(&mut *tx, agency_id).await?;
        tx.commit().await?;

        tracing::info!(
            "🗑️ Agência {} excluída; {} atribuições devolvidas ao estoque.",
            agency_id,
            links.len()
        );
        Ok(())
    }

    pub async fn agency_inventory(&self, agency_id: Uuid) -> Result<AgencyInventory, AppError> {
        let agency = self
            .agency_repo
            .find_by_id(&self.pool, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))?;

        let supplies = self.assignment_repo.list_supply_views(Some(agency_id), None).await?;
        let assets = self.assignment_repo.list_asset_views(Some(agency_id), None).await?;
        let supplies_value = supplies.iter().fold(Decimal::ZERO, |acc, s| acc + s.line_value);

        Ok(AgencyInventory { agency, supplies, assets, supplies_value })
    }

    // ---
    // Agência <-> Imobilização
    // ---

    pub async fn list_assets(
        &self,
        agency_id: Option<Uuid>,
        asset_id: Option<Uuid>,
    ) -> Result<Vec<AgencyAssetView>, AppError> {
        self.assignment_repo.list_asset_views(agency_id, asset_id).await
    }

    pub async fn get_asset(&self, id: Uuid) -> Result<AgencyAssetView, AppError> {
        self.assignment_repo
            .find_asset_view(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de imobilização"))
    }

    /// Atribui unidades de uma imobilização a uma agência, respeitando o que
    /// ainda não foi distribuído. Um par repetido acumula e atualiza a data.
    pub async fn assign_asset(
        &self,
        agency_id: Uuid,
        asset_id: Uuid,
        quantity: i32,
        assigned_date: Option<NaiveDate>,
    ) -> Result<AgencyAssetView, AppError> {
        ensure_positive_quantity(quantity)?;
        let assigned_date = assigned_date.unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.pool.begin().await?;

        self.agency_repo
            .find_by_id(&mut *tx, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))?;

        let asset = self
            .asset_repo
            .find_by_id_for_update(&mut *tx, asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        if asset.status == AssetStatus::Disposed {
            return Err(AppError::BadRequest(
                "Uma imobilização baixada não pode ser atribuída.".to_string(),
            ));
        }

        let assigned = self.asset_repo.assigned_quantity(&mut *tx, asset_id, None).await?;
        ensure_available(i64::from(asset.quantity) - assigned, i64::from(quantity))?;

        let existing = self
            .assignment_repo
            .find_asset_link_by_pair(&mut *tx, agency_id, asset_id)
            .await?;

        let link = match existing {
            Some(link) => {
                self.assignment_repo
                    .update_asset_link(&mut *tx, link.id, link.quantity + quantity, assigned_date)
                    .await?
            }
            None => {
                self.assignment_repo
                    .insert_asset_link(&mut *tx, agency_id, asset_id, quantity, assigned_date)
                    .await?
            }
        };

        let view = self
            .assignment_repo
            .find_asset_view(&mut *tx, link.id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de imobilização"))?;

        tx.commit().await?;

        tracing::info!(
            "🏢 {} x '{}' atribuídas à agência '{}'.",
            quantity,
            view.asset_code,
            view.agency_name
        );
        Ok(view)
    }

    pub async fn update_asset_assignment(
        &self,
        id: Uuid,
        quantity: i32,
        assigned_date: Option<NaiveDate>,
    ) -> Result<AgencyAssetView, AppError> {
        ensure_positive_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;

        let link = self
            .assignment_repo
            .find_asset_link_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de imobilização"))?;

        let asset = self
            .asset_repo
            .find_by_id_for_update(&mut *tx, link.asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        // As outras agências continuam com o que já têm
        let assigned_elsewhere = self
            .asset_repo
            .assigned_quantity(&mut *tx, link.asset_id, Some(id))
            .await?;
        ensure_available(i64::from(asset.quantity) - assigned_elsewhere, i64::from(quantity))?;

        self.assignment_repo
            .update_asset_link(&mut *tx, id, quantity, assigned_date.unwrap_or(link.assigned_date))
            .await?;

        let view = self
            .assignment_repo
            .find_asset_view(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Atribuição de imobilização"))?;

        tx.commit().await?;
        Ok(view)
    }

    pub async fn remove_asset_assignment(&self, id: Uuid) -> Result<(), AppError> {
        if !self.assignment_repo.delete_asset_link(id).await? {
            return Err(AppError::not_found("Atribuição de imobilização"));
        }
        Ok(())
    }

    // ---
    // Usuário <-> Agência / Fornitura
    // ---

    pub async fn link_user_to_agency(&self, user_id: Uuid, agency_id: Uuid) -> Result<UserAgency, AppError> {
        self.ensure_user(user_id).await?;
        self.ensure_agency(agency_id).await?;
        self.assignment_repo.insert_user_agency(user_id, agency_id).await
    }

    pub async fn move_user_to_agency(&self, id: Uuid, agency_id: Uuid) -> Result<UserAgency, AppError> {
        self.ensure_agency(agency_id).await?;
        self.assignment_repo
            .move_user_agency(id, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Vínculo usuário-agência"))
    }

    pub async fn list_user_agencies(&self, agency_id: Option<Uuid>) -> Result<Vec<UserAgency>, AppError> {
        self.assignment_repo.list_user_agencies(agency_id).await
    }

    pub async fn get_user_agency(&self, id: Uuid) -> Result<UserAgency, AppError> {
        self.assignment_repo
            .find_user_agency(id)
            .await?
            .ok_or_else(|| AppError::not_found("Vínculo usuário-agência"))
    }

    pub async fn unlink_user_from_agency(&self, id: Uuid) -> Result<(), AppError> {
        if !self.assignment_repo.delete_user_agency(id).await? {
            return Err(AppError::not_found("Vínculo usuário-agência"));
        }
        Ok(())
    }

    pub async fn list_user_supplies(
        &self,
        user_id: Option<Uuid>,
        supply_id: Option<Uuid>,
    ) -> Result<Vec<UserSupply>, AppError> {
        self.assignment_repo.list_user_supplies(user_id, supply_id).await
    }

    pub async fn unlink_user_from_supply(&self, id: Uuid) -> Result<(), AppError> {
        if !self.assignment_repo.delete_user_supply(id).await? {
            return Err(AppError::not_found("Vínculo usuário-fornitura"));
        }
        Ok(())
    }

    pub async fn link_user_to_supply(&self, user_id: Uuid, supply_id: Uuid) -> Result<UserSupply, AppError> {
        self.ensure_user(user_id).await?;
        self.supply_repo
            .find_by_id(&self.pool, supply_id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;
        self.assignment_repo.insert_user_supply(user_id, supply_id).await
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário"))?;
        Ok(())
    }

    async fn ensure_agency(&self, agency_id: Uuid) -> Result<(), AppError> {
        self.agency_repo
            .find_by_id(&self.pool, agency_id)
            .await?
            .ok_or_else(|| AppError::not_found("Agência"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(10, 10)]
    #[case(10, 1)]
    #[case(0, 0)]
    #[case(5, -3)] // devolução ao estoque
    fn accepts_requests_within_stock(#[case] available: i64, #[case] requested: i64) {
        assert!(ensure_available(available, requested).is_ok());
    }

    #[test]
    fn rejects_over_allocation() {
        match ensure_available(4, 5) {
            Err(AppError::InsufficientStock { available, requested }) => {
                assert_eq!(available, 4);
                assert_eq!(requested, 5);
            }
            other => panic!("esperava InsufficientStock, veio {other:?}"),
        }
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn rejects_non_positive_quantities(#[case] quantity: i32) {
        assert!(matches!(
            ensure_positive_quantity(quantity),
            Err(AppError::BadRequest(_))
        ));
    }
}
