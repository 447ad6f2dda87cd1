// src/services/depreciation_service.rs

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, money::round_money},
    db::{AssetRepository, DepreciationRepository},
    models::depreciation::{Depreciation, ScheduleLine, YearSummary},
};

// ---
// Cálculos (funções puras)
// ---

/// Limite da vida útil aceito em qualquer entrada (API ou planilha).
pub const MAX_USEFUL_LIFE_YEARS: i32 = 100;

pub fn useful_life_message() -> String {
    format!("A vida útil deve estar entre 1 e {MAX_USEFUL_LIFE_YEARS} anos.")
}

/// Fração do primeiro exercício: do dia da aquisição (inclusive) até 31/12,
/// sobre o número de dias do ano.
pub fn first_year_fraction(acquisition_date: NaiveDate) -> Decimal {
    let year = acquisition_date.year();
    let days_in_year = if NaiveDate::from_ymd_opt(year, 2, 29).is_some() { 366 } else { 365 };
    let days_held = NaiveDate::from_ymd_opt(year, 12, 31)
        .map(|end| (end - acquisition_date).num_days() + 1)
        .unwrap_or(days_in_year);
    Decimal::from(days_held) / Decimal::from(days_in_year)
}

/// Plano de amortização linear com prorata temporis no primeiro ano.
/// Aquisição em 1º de janeiro gera `useful_life_years` linhas; qualquer outra
/// data gera uma linha a mais. A última linha absorve o arredondamento.
pub fn linear_schedule(
    value: Decimal,
    acquisition_date: NaiveDate,
    useful_life_years: i32,
) -> Result<Vec<ScheduleLine>, AppError> {
    if !(1..=MAX_USEFUL_LIFE_YEARS).contains(&useful_life_years) {
        return Err(AppError::BadRequest(useful_life_message()));
    }
    if value <= Decimal::ZERO {
        return Ok(Vec::new());
    }

    let annual = value / Decimal::from(useful_life_years);
    let fraction = first_year_fraction(acquisition_date);
    let line_count = if fraction == Decimal::ONE {
        useful_life_years
    } else {
        useful_life_years + 1
    };

    let mut lines = Vec::with_capacity(line_count as usize);
    let mut accumulated = Decimal::ZERO;

    for i in 0..line_count {
        let remaining = value - accumulated;
        let amount = if i == line_count - 1 {
            remaining
        } else if i == 0 {
            round_money(annual * fraction).min(remaining)
        } else {
            round_money(annual).min(remaining)
        };

        accumulated += amount;
        lines.push(ScheduleLine {
            year: acquisition_date.year() + i,
            annual_amount: amount,
            accumulated_amount: accumulated,
            net_book_value: value - accumulated,
        });
    }

    Ok(lines)
}

/// Consolidação por ano de todas as linhas recebidas.
pub fn summarize_by_year(entries: &[Depreciation]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, YearSummary> = BTreeMap::new();
    for entry in entries {
        let summary = by_year.entry(entry.year).or_insert_with(|| YearSummary {
            year: entry.year,
            asset_count: 0,
            total_annual_amount: Decimal::ZERO,
            total_accumulated_amount: Decimal::ZERO,
            total_net_book_value: Decimal::ZERO,
        });
        summary.asset_count += 1;
        summary.total_annual_amount += entry.annual_amount;
        summary.total_accumulated_amount += entry.accumulated_amount;
        summary.total_net_book_value += entry.net_book_value;
    }
    by_year.into_values().collect()
}

/// (amortização acumulada, valor líquido contábil) ao fim de `year`.
pub fn book_values_at(entries: &[Depreciation], value: Decimal, year: i32) -> (Decimal, Decimal) {
    let accumulated = entries
        .iter()
        .filter(|e| e.year <= year)
        .fold(Decimal::ZERO, |acc, e| acc + e.annual_amount);
    (accumulated, value - accumulated)
}

#[derive(Clone)]
pub struct DepreciationService {
    pool: PgPool,
    depreciation_repo: DepreciationRepository,
    asset_repo: AssetRepository,
}

impl DepreciationService {
    pub fn new(
        pool: PgPool,
        depreciation_repo: DepreciationRepository,
        asset_repo: AssetRepository,
    ) -> Self {
        Self { pool, depreciation_repo, asset_repo }
    }

    pub async fn list(&self, asset_id: Option<Uuid>, year: Option<i32>) -> Result<Vec<Depreciation>, AppError> {
        self.depreciation_repo.list(asset_id, year).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Depreciation, AppError> {
        self.depreciation_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Amortização"))
    }

    /// Lançamento manual de uma anuidade. O acumulado é recalculado a partir
    /// dos anos anteriores e não pode ultrapassar o valor de aquisição.
    pub async fn create_manual(
        &self,
        asset_id: Uuid,
        year: i32,
        annual_amount: Decimal,
    ) -> Result<Depreciation, AppError> {
        let mut tx = self.pool.begin().await?;

        let asset = self
            .asset_repo
            .find_by_id_for_update(&mut *tx, asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        if year < asset.acquisition_date.year() {
            return Err(AppError::BadRequest(
                "O ano é anterior à data de aquisição.".to_string(),
            ));
        }

        let existing = self.depreciation_repo.list_for_asset(&mut *tx, asset_id).await?;
        if existing.iter().any(|e| e.year == year) {
            return Err(AppError::Conflict(
                "Já existe uma amortização para esta imobilização neste ano.".to_string(),
            ));
        }
        if existing.iter().any(|e| e.year > year) {
            return Err(AppError::BadRequest(
                "Existem amortizações posteriores a este ano; gere o plano novamente.".to_string(),
            ));
        }

        let before = self
            .depreciation_repo
            .accumulated_before(&mut *tx, asset_id, year)
            .await?;
        let accumulated = before + annual_amount;
        if accumulated > asset.acquisition_value {
            return Err(AppError::BadRequest(format!(
                "O acumulado ({accumulated}) ultrapassaria o valor de aquisição ({}).",
                asset.acquisition_value
            )));
        }

        let line = ScheduleLine {
            year,
            annual_amount,
            accumulated_amount: accumulated,
            net_book_value: asset.acquisition_value - accumulated,
        };
        let created = self.depreciation_repo.insert(&mut *tx, asset_id, &line).await?;

        tx.commit().await?;
        Ok(created)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.depreciation_repo.delete(id).await? {
            return Err(AppError::not_found("Amortização"));
        }
        Ok(())
    }

    /// Substitui o plano da imobilização pelo plano linear calculado.
    pub async fn generate(&self, asset_id: Uuid) -> Result<Vec<Depreciation>, AppError> {
        let mut tx = self.pool.begin().await?;

        let asset = self
            .asset_repo
            .find_by_id_for_update(&mut *tx, asset_id)
            .await?
            .ok_or_else(|| AppError::not_found("Imobilização"))?;

        let schedule = linear_schedule(
            asset.acquisition_value,
            asset.acquisition_date,
            asset.useful_life_years,
        )?;

        let removed = self.depreciation_repo.delete_for_asset(&mut *tx, asset_id).await?;

        let mut created = Vec::with_capacity(schedule.len());
        for line in &schedule {
            created.push(self.depreciation_repo.insert(&mut *tx, asset_id, line).await?);
        }

        tx.commit().await?;

        tracing::info!(
            "📉 Plano de amortização de '{}' gerado: {} linhas ({} substituídas).",
            asset.code,
            created.len(),
            removed
        );
        Ok(created)
    }

    pub async fn summary(&self, year: Option<i32>) -> Result<Vec<YearSummary>, AppError> {
        let entries = self.depreciation_repo.list(None, year).await?;
        Ok(summarize_by_year(&entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn amounts(lines: &[ScheduleLine]) -> Vec<Decimal> {
        lines.iter().map(|l| l.annual_amount).collect()
    }

    #[test]
    fn acquisition_on_first_of_january_has_no_prorata() {
        let lines = linear_schedule(Decimal::new(1200, 0), date(2024, 1, 1), 3).expect("schedule");
        assert_eq!(lines.len(), 3);
        assert_eq!(amounts(&lines), vec![Decimal::new(400, 0); 3]);
        assert_eq!(lines[0].year, 2024);
        assert_eq!(lines[2].year, 2026);
        assert_eq!(lines[2].net_book_value, Decimal::ZERO);
    }

    #[test]
    fn mid_year_acquisition_adds_a_final_partial_year() {
        // 184 dias de 366 em 2024
        let lines = linear_schedule(Decimal::new(1200, 0), date(2024, 7, 1), 3).expect("schedule");
        assert_eq!(lines.len(), 4);
        assert_eq!(
            amounts(&lines),
            vec![
                Decimal::new(20109, 2),
                Decimal::new(400, 0),
                Decimal::new(400, 0),
                Decimal::new(19891, 2),
            ]
        );
        assert_eq!(lines[3].year, 2027);
        assert_eq!(lines[3].accumulated_amount, Decimal::new(1200, 0));
    }

    #[test]
    fn last_line_absorbs_rounding() {
        let lines = linear_schedule(Decimal::new(1000, 0), date(2023, 1, 1), 3).expect("schedule");
        assert_eq!(
            amounts(&lines),
            vec![Decimal::new(33333, 2), Decimal::new(33333, 2), Decimal::new(33334, 2)]
        );
        assert_eq!(lines.last().map(|l| l.net_book_value), Some(Decimal::ZERO));
    }

    #[test]
    fn accumulated_and_net_book_value_stay_consistent() {
        let value = Decimal::new(987654, 2);
        let lines = linear_schedule(value, date(2022, 3, 17), 7).expect("schedule");
        let mut running = Decimal::ZERO;
        for line in &lines {
            running += line.annual_amount;
            assert_eq!(line.accumulated_amount, running);
            assert_eq!(line.net_book_value, value - running);
            assert!(line.annual_amount >= Decimal::ZERO);
        }
        assert_eq!(running, value);
    }

    #[rstest]
    #[case(0)]
    #[case(-2)]
    #[case(101)]
    #[case(i32::MAX)]
    fn rejects_useful_life_out_of_bounds(#[case] years: i32) {
        assert!(linear_schedule(Decimal::new(100, 0), date(2024, 1, 1), years).is_err());
    }

    #[test]
    fn zero_value_asset_has_empty_schedule() {
        let lines = linear_schedule(Decimal::ZERO, date(2024, 5, 1), 5).expect("schedule");
        assert!(lines.is_empty());
    }

    #[rstest]
    #[case(date(2024, 1, 1), Decimal::ONE)]
    #[case(date(2023, 12, 31), Decimal::from(1) / Decimal::from(365))]
    #[case(date(2024, 7, 1), Decimal::from(184) / Decimal::from(366))]
    fn first_year_fraction_counts_days_held(#[case] acquired: NaiveDate, #[case] expected: Decimal) {
        assert_eq!(first_year_fraction(acquired), expected);
    }

    fn entry(asset_id: Uuid, year: i32, annual: i64, accumulated: i64, nbv: i64) -> Depreciation {
        Depreciation {
            id: Uuid::new_v4(),
            asset_id,
            year,
            annual_amount: Decimal::from(annual),
            accumulated_amount: Decimal::from(accumulated),
            net_book_value: Decimal::from(nbv),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summarizes_all_assets_per_year() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let entries = vec![
            entry(a, 2024, 400, 400, 800),
            entry(a, 2025, 400, 800, 400),
            entry(b, 2024, 100, 100, 900),
        ];

        let summary = summarize_by_year(&entries);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].year, 2024);
        assert_eq!(summary[0].asset_count, 2);
        assert_eq!(summary[0].total_annual_amount, Decimal::from(500));
        assert_eq!(summary[0].total_net_book_value, Decimal::from(1700));
        assert_eq!(summary[1].asset_count, 1);
    }

    #[test]
    fn book_values_only_count_years_up_to_the_requested_one() {
        let a = Uuid::new_v4();
        let entries = vec![entry(a, 2024, 400, 400, 800), entry(a, 2025, 400, 800, 400)];
        let (acc, nbv) = book_values_at(&entries, Decimal::from(1200), 2024);
        assert_eq!(acc, Decimal::from(400));
        assert_eq!(nbv, Decimal::from(800));

        let (acc, _) = book_values_at(&entries, Decimal::from(1200), 2023);
        assert_eq!(acc, Decimal::ZERO);
    }
}
