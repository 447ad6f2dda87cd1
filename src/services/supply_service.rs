// src/services/supply_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::round_money},
    db::{supply_repo::SupplyFields, CategoryRepository, SupplyRepository},
    models::supply::{CmupGroup, SupplyView, SupplyWithCategory},
};

// ---
// CMUP (Custo Médio Unitário Ponderado)
// ---

/// CMUP = Σ(restante × preço) / Σ(restante). Zero quando não há restante.
pub fn weighted_average_cost<I>(lots: I) -> Decimal
where
    I: IntoIterator<Item = (i64, Decimal)>,
{
    let (total_qty, total_value) = lots
        .into_iter()
        .fold((0_i64, Decimal::ZERO), |(qty, value), (q, price)| {
            (qty + q, value + Decimal::from(q) * price)
        });

    if total_qty <= 0 {
        return Decimal::ZERO;
    }
    round_money(total_value / Decimal::from(total_qty))
}

/// Chave do grupo: nome sem espaços nas pontas e sem diferença de caixa + categoria.
pub fn group_key(name: &str, category_id: Uuid) -> (String, Uuid) {
    (name.trim().to_lowercase(), category_id)
}

/// Agrega os lotes por (nome, categoria). Ordenado pelo nome.
pub fn build_cmup_groups(rows: &[SupplyWithCategory]) -> Vec<CmupGroup> {
    let mut groups: BTreeMap<(String, Uuid), Vec<&SupplyWithCategory>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(group_key(&row.supply.name, row.supply.category_id))
            .or_default()
            .push(row);
    }

    groups
        .into_values()
        .filter_map(|lots| {
            let first = lots.first()?;
            let remaining_quantity: i64 = lots.iter().map(|l| i64::from(l.supply.remaining_quantity)).sum();
            let total_value = lots.iter().fold(Decimal::ZERO, |acc, l| {
                acc + Decimal::from(l.supply.remaining_quantity) * l.supply.unit_price
            });
            Some(CmupGroup {
                name: first.supply.name.trim().to_string(),
                category_id: first.supply.category_id,
                category_name: first.category_name.clone(),
                lots: lots.len(),
                total_quantity: lots.iter().map(|l| i64::from(l.supply.quantity)).sum(),
                remaining_quantity,
                total_value: round_money(total_value),
                cmup: weighted_average_cost(
                    lots.iter()
                        .map(|l| (i64::from(l.supply.remaining_quantity), l.supply.unit_price)),
                ),
            })
        })
        .collect()
}

/// Grupo CMUP de um lote, calculado com a mesma chave da listagem.
pub fn cmup_group_for(rows: &[SupplyWithCategory], name: &str, category_id: Uuid) -> Option<CmupGroup> {
    let key = group_key(name, category_id);
    let lots: Vec<SupplyWithCategory> = rows
        .iter()
        .filter(|row| group_key(&row.supply.name, row.supply.category_id) == key)
        .cloned()
        .collect();
    build_cmup_groups(&lots).into_iter().next()
}

fn to_view(row: SupplyWithCategory, cmup: Decimal) -> SupplyView {
    let stock_value = round_money(Decimal::from(row.supply.remaining_quantity) * row.supply.unit_price);
    SupplyView {
        supply: row.supply,
        category_name: row.category_name,
        cmup,
        stock_value,
    }
}

#[derive(Clone)]
pub struct SupplyService {
    pool: PgPool,
    supply_repo: SupplyRepository,
    category_repo: CategoryRepository,
}

impl SupplyService {
    pub fn new(pool: PgPool, supply_repo: SupplyRepository, category_repo: CategoryRepository) -> Self {
        Self { pool, supply_repo, category_repo }
    }

    /// Todas as fornituras, cada uma com o CMUP do seu grupo.
    pub async fn list(&self) -> Result<Vec<SupplyView>, AppError> {
        let rows = self.supply_repo.list_with_category().await?;
        let cmups: BTreeMap<(String, Uuid), Decimal> = build_cmup_groups(&rows)
            .into_iter()
            .map(|g| (group_key(&g.name, g.category_id), g.cmup))
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let cmup = cmups
                    .get(&group_key(&row.supply.name, row.supply.category_id))
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                to_view(row, cmup)
            })
            .collect())
    }

    pub async fn get(&self, id: Uuid) -> Result<SupplyView, AppError> {
        let row = self
            .supply_repo
            .find_with_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;
        let group = self.cmup_group_of(&row).await?;
        Ok(to_view(row, group.cmup))
    }

    pub async fn create(&self, fields: SupplyFields<'_>) -> Result<SupplyView, AppError> {
        self.ensure_category(fields.category_id).await?;
        let supply = self.supply_repo.create(&self.pool, &fields).await?;
        tracing::info!("📦 Fornitura '{}' criada com {} unidades.", supply.name, supply.quantity);
        self.get(supply.id).await
    }

    /// Atualiza o lote. A diferença de quantidade comprada é repassada ao
    /// restante; o total já distribuído às agências não pode ficar descoberto.
    pub async fn update(&self, id: Uuid, fields: SupplyFields<'_>) -> Result<SupplyView, AppError> {
        self.ensure_category(fields.category_id).await?;

        let mut tx = self.pool.begin().await?;

        let current = self
            .supply_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;

        let remaining = current.remaining_quantity + (fields.quantity - current.quantity);
        if remaining < 0 {
            let assigned = current.quantity - current.remaining_quantity;
            return Err(AppError::BadRequest(format!(
                "A quantidade não pode ser inferior ao total já distribuído às agências ({assigned})."
            )));
        }

        self.supply_repo.update(&mut *tx, id, &fields, remaining).await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.supply_repo.delete(id).await? {
            return Err(AppError::not_found("Fornitura"));
        }
        Ok(())
    }

    pub async fn cmup_groups(&self) -> Result<Vec<CmupGroup>, AppError> {
        let rows = self.supply_repo.list_with_category().await?;
        Ok(build_cmup_groups(&rows))
    }

    /// CMUP do grupo ao qual a fornitura `id` pertence.
    pub async fn cmup_for(&self, id: Uuid) -> Result<CmupGroup, AppError> {
        let row = self
            .supply_repo
            .find_with_category(id)
            .await?
            .ok_or_else(|| AppError::not_found("Fornitura"))?;
        self.cmup_group_of(&row).await
    }

    async fn cmup_group_of(&self, row: &SupplyWithCategory) -> Result<CmupGroup, AppError> {
        let rows = self.supply_repo.list_with_category().await?;
        cmup_group_for(&rows, &row.supply.name, row.supply.category_id)
            .ok_or_else(|| AppError::not_found("Fornitura"))
    }

    async fn ensure_category(&self, category_id: Uuid) -> Result<(), AppError> {
        self.category_repo
            .find_by_id(&self.pool, category_id)
            .await?
            .ok_or_else(|| AppError::not_found("Categoria"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::supply::Supply;
    use chrono::{NaiveDate, Utc};
    use rstest::rstest;

    fn lot(name: &str, category_id: Uuid, quantity: i32, remaining: i32, price: Decimal) -> SupplyWithCategory {
        SupplyWithCategory {
            supply: Supply {
                id: Uuid::new_v4(),
                name: name.to_string(),
                category_id,
                quantity,
                remaining_quantity: remaining,
                unit_price: price,
                purchase_date: NaiveDate::from_ymd_opt(2024, 1, 15).expect("date"),
                supplier: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            category_name: "Papeterie".to_string(),
        }
    }

    #[rstest]
    #[case(vec![(10, Decimal::new(2, 0)), (30, Decimal::new(4, 0))], Decimal::new(35, 1))]
    #[case(vec![(3, Decimal::new(1, 0)), (0, Decimal::new(99, 0))], Decimal::new(1, 0))]
    #[case(vec![(1, Decimal::new(1, 0)), (2, Decimal::new(2, 0))], Decimal::new(167, 2))]
    fn computes_weighted_average(#[case] lots: Vec<(i64, Decimal)>, #[case] expected: Decimal) {
        assert_eq!(weighted_average_cost(lots), expected);
    }

    #[test]
    fn zero_remaining_gives_zero_cmup() {
        assert_eq!(weighted_average_cost(vec![(0, Decimal::new(5, 0))]), Decimal::ZERO);
        assert_eq!(weighted_average_cost(Vec::<(i64, Decimal)>::new()), Decimal::ZERO);
    }

    #[test]
    fn groups_by_trimmed_case_insensitive_name_and_category() {
        let paper = Uuid::new_v4();
        let other = Uuid::new_v4();
        let rows = vec![
            lot("Ramette A4", paper, 10, 10, Decimal::new(2, 0)),
            lot(" ramette a4 ", paper, 30, 30, Decimal::new(4, 0)),
            lot("Ramette A4", other, 5, 5, Decimal::new(100, 0)),
        ];

        let groups = build_cmup_groups(&rows);
        assert_eq!(groups.len(), 2);

        let paper_group = groups
            .iter()
            .find(|g| g.category_id == paper)
            .expect("groupe papier");
        assert_eq!(paper_group.lots, 2);
        assert_eq!(paper_group.remaining_quantity, 40);
        assert_eq!(paper_group.total_value, Decimal::new(140, 0));
        assert_eq!(paper_group.cmup, Decimal::new(35, 1));

        let other_group = groups
            .iter()
            .find(|g| g.category_id == other)
            .expect("autre groupe");
        assert_eq!(other_group.cmup, Decimal::new(100, 0));
    }

    #[test]
    fn cmup_uses_remaining_not_purchased_quantity() {
        let cat = Uuid::new_v4();
        // O primeiro lote já saiu quase todo para as agências
        let rows = vec![
            lot("Stylo", cat, 100, 0, Decimal::new(1, 0)),
            lot("Stylo", cat, 10, 10, Decimal::new(3, 0)),
        ];
        let groups = build_cmup_groups(&rows);
        assert_eq!(groups[0].total_quantity, 110);
        assert_eq!(groups[0].cmup, Decimal::new(3, 0));
    }

    #[test]
    fn single_group_matches_the_listing_for_unicode_names() {
        let cat = Uuid::new_v4();
        let rows = vec![
            lot("ÉCRAN 24\"", cat, 4, 4, Decimal::new(150, 0)),
            lot("\técran 24\"\u{a0}", cat, 2, 2, Decimal::new(120, 0)),
            lot("Clavier", cat, 9, 9, Decimal::new(15, 0)),
        ];

        let single = cmup_group_for(&rows, "écran 24\"", cat).expect("grupo");
        let listed = build_cmup_groups(&rows)
            .into_iter()
            .find(|g| g.lots == 2)
            .expect("grupo listado");

        assert_eq!(single, listed);
        // (4 × 150 + 2 × 120) / 6 = 140
        assert_eq!(single.cmup, Decimal::new(140, 0));
        assert!(cmup_group_for(&rows, "Souris", cat).is_none());
    }
}
