// src/services/import_service.rs
// Importação em massa a partir de planilhas .xlsx. A primeira linha da
// primeira aba é o cabeçalho; cada linha seguinte é tratada isoladamente e os
// erros são acumulados no relatório em vez de abortar a importação.

use std::{collections::HashMap, io::Cursor, str::FromStr};

use calamine::{open_workbook_from_rs, Data, DataType, Range, Reader, Xlsx};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, money::round_money},
    db::{
        asset_repo::AssetFields, supply_repo::SupplyFields, AgencyRepository, AssetRepository,
        CategoryRepository, SupplyRepository,
    },
    models::{
        asset::AssetStatus,
        import::{ImportReport, RowError},
    },
    services::depreciation_service::{useful_life_message, MAX_USEFUL_LIFE_YEARS},
};

// ---
// Entidades importáveis e suas colunas
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportEntity {
    Agencies,
    Categories,
    Supplies,
    Assets,
}

impl ImportEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            ImportEntity::Agencies => "agencies",
            ImportEntity::Categories => "categories",
            ImportEntity::Supplies => "supplies",
            ImportEntity::Assets => "assets",
        }
    }

    pub fn required_columns(self) -> &'static [&'static str] {
        match self {
            ImportEntity::Agencies => &["NumeroAgence", "NomAgence"],
            ImportEntity::Categories => &["Nom"],
            ImportEntity::Supplies => &["Nom", "Categorie", "Quantite", "PrixUnitaire"],
            ImportEntity::Assets => &[
                "Code",
                "Designation",
                "ValeurAcquisition",
                "DateAcquisition",
                "DureeVie",
            ],
        }
    }
}

impl FromStr for ImportEntity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "agencies" | "agences" => Ok(ImportEntity::Agencies),
            "categories" => Ok(ImportEntity::Categories),
            "supplies" | "fournitures" => Ok(ImportEntity::Supplies),
            "assets" | "immobilisations" => Ok(ImportEntity::Assets),
            other => Err(AppError::BadRequest(format!(
                "Tipo de importação desconhecido: '{other}'."
            ))),
        }
    }
}

/// "Prix Unitaire", "prix_unitaire" e "PrixUnitaire" viram a mesma chave.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .map(|c| match c {
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'à' | 'â' | 'ä' => 'a',
            'î' | 'ï' => 'i',
            'ô' | 'ö' => 'o',
            'ù' | 'û' | 'ü' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

// ---
// Leitura da planilha
// ---

/// Abre o .xlsx em memória e devolve a primeira aba.
pub fn read_first_sheet(bytes: Vec<u8>) -> Result<Range<Data>, AppError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes))
        .map_err(|e| AppError::BadRequest(format!("Arquivo Excel inválido: {e}")))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::BadRequest("A planilha não contém nenhuma aba.".to_string()))?
        .map_err(|e| AppError::BadRequest(format!("Falha ao ler a aba: {e}")))
}

pub struct Sheet {
    columns: HashMap<String, usize>,
    rows: Vec<(usize, Vec<Data>)>, // (número da linha na planilha, células)
}

impl Sheet {
    pub fn from_range(range: &Range<Data>) -> Result<Self, AppError> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows();

        let header = rows
            .next()
            .ok_or_else(|| AppError::BadRequest("A planilha está vazia.".to_string()))?;

        let columns = header
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| text(cell).map(|h| (normalize_header(&h), i)))
            .collect();

        let rows = rows
            .enumerate()
            .filter(|(_, cells)| !cells.iter().all(is_blank))
            // +2: linhas da planilha começam em 1 e o cabeçalho ocupa a primeira
            .map(|(i, cells)| (first_row + i + 2, cells.to_vec()))
            .collect();

        Ok(Self { columns, rows })
    }

    pub fn missing_columns(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|c| !self.columns.contains_key(&normalize_header(c)))
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Aplica `parse` em cada linha, separando sucessos e erros.
    pub fn parse_rows<T, F>(&self, parse: F) -> (Vec<(usize, T)>, Vec<RowError>)
    where
        F: Fn(&RowReader<'_>) -> Result<T, String>,
    {
        let mut parsed = Vec::new();
        let mut errors = Vec::new();
        for (row, cells) in &self.rows {
            let reader = RowReader { columns: &self.columns, cells };
            match parse(&reader) {
                Ok(value) => parsed.push((*row, value)),
                Err(message) => errors.push(RowError { row: *row, message }),
            }
        }
        (parsed, errors)
    }
}

pub struct RowReader<'a> {
    columns: &'a HashMap<String, usize>,
    cells: &'a [Data],
}

impl RowReader<'_> {
    fn cell(&self, column: &str) -> Option<&Data> {
        self.columns
            .get(&normalize_header(column))
            .and_then(|i| self.cells.get(*i))
            .filter(|c| !is_blank(c))
    }

    pub fn optional_text(&self, column: &str) -> Option<String> {
        self.cell(column).and_then(text)
    }

    pub fn required_text(&self, column: &str) -> Result<String, String> {
        self.optional_text(column)
            .ok_or_else(|| format!("Coluna '{column}' vazia."))
    }

    pub fn optional_integer(&self, column: &str) -> Result<Option<i32>, String> {
        self.cell(column)
            .map(|c| integer(c).map_err(|e| format!("Coluna '{column}': {e}")))
            .transpose()
    }

    pub fn required_integer(&self, column: &str) -> Result<i32, String> {
        self.optional_integer(column)?
            .ok_or_else(|| format!("Coluna '{column}' vazia."))
    }

    pub fn required_decimal(&self, column: &str) -> Result<Decimal, String> {
        let cell = self
            .cell(column)
            .ok_or_else(|| format!("Coluna '{column}' vazia."))?;
        decimal(cell).map_err(|e| format!("Coluna '{column}': {e}"))
    }

    pub fn optional_date(&self, column: &str) -> Result<Option<NaiveDate>, String> {
        self.cell(column)
            .map(|c| date(c).map_err(|e| format!("Coluna '{column}': {e}")))
            .transpose()
    }

    pub fn required_date(&self, column: &str) -> Result<NaiveDate, String> {
        self.optional_date(column)?
            .ok_or_else(|| format!("Coluna '{column}' vazia."))
    }
}

// ---
// Conversão de células
// ---

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn text(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(d) => d.to_string(),
        Data::Error(_) | Data::Empty => String::new(),
    };
    (!value.is_empty()).then_some(value)
}

fn integer(cell: &Data) -> Result<i32, String> {
    match cell {
        Data::Int(i) => i32::try_from(*i).map_err(|_| "número fora do intervalo.".to_string()),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= f64::from(i32::MAX) => Ok(*f as i32),
        Data::String(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("'{}' não é um número inteiro.", s.trim())),
        _ => Err("valor não é um número inteiro.".to_string()),
    }
}

fn decimal(cell: &Data) -> Result<Decimal, String> {
    let value = match cell {
        Data::Int(i) => Decimal::from(*i),
        Data::Float(f) => Decimal::try_from(*f).map_err(|_| "número inválido.".to_string())?,
        Data::String(s) => {
            // Aceita "1 234,50" (formato francês) e "1234.50"
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '\u{a0}' && *c != '€')
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            Decimal::from_str(&cleaned).map_err(|_| format!("'{}' não é um valor numérico.", s.trim()))?
        }
        _ => return Err("valor não é numérico.".to_string()),
    };
    Ok(round_money(value))
}

fn date(cell: &Data) -> Result<NaiveDate, String> {
    if let Data::String(s) = cell {
        let s = s.trim();
        return ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
            .ok_or_else(|| format!("'{s}' não é uma data (use AAAA-MM-DD ou DD/MM/AAAA)."));
    }
    cell.as_date().ok_or_else(|| "valor não é uma data.".to_string())
}

// ---
// Rascunhos por entidade
// ---

#[derive(Debug, Clone, PartialEq)]
pub struct AgencyDraft {
    pub agency_number: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SupplyDraft {
    pub name: String,
    pub category: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub purchase_date: Option<NaiveDate>,
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetDraft {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub acquisition_value: Decimal,
    pub acquisition_date: NaiveDate,
    pub useful_life_years: i32,
    pub quantity: i32,
}

pub fn parse_agency(row: &RowReader<'_>) -> Result<AgencyDraft, String> {
    Ok(AgencyDraft {
        agency_number: row.required_text("NumeroAgence")?,
        name: row.required_text("NomAgence")?,
        address: row.optional_text("Adresse"),
        phone: row.optional_text("Telephone"),
    })
}

pub fn parse_category(row: &RowReader<'_>) -> Result<CategoryDraft, String> {
    Ok(CategoryDraft {
        name: row.required_text("Nom")?,
        description: row.optional_text("Description"),
        parent: row.optional_text("Parent"),
    })
}

pub fn parse_supply(row: &RowReader<'_>) -> Result<SupplyDraft, String> {
    let quantity = row.required_integer("Quantite")?;
    if quantity < 0 {
        return Err("A quantidade não pode ser negativa.".to_string());
    }
    let unit_price = row.required_decimal("PrixUnitaire")?;
    if unit_price.is_sign_negative() && !unit_price.is_zero() {
        return Err("O preço unitário não pode ser negativo.".to_string());
    }
    Ok(SupplyDraft {
        name: row.required_text("Nom")?,
        category: row.required_text("Categorie")?,
        quantity,
        unit_price,
        purchase_date: row.optional_date("DateAchat")?,
        supplier: row.optional_text("Fournisseur"),
    })
}

pub fn parse_asset(row: &RowReader<'_>) -> Result<AssetDraft, String> {
    let useful_life_years = row.required_integer("DureeVie")?;
    if !(1..=MAX_USEFUL_LIFE_YEARS).contains(&useful_life_years) {
        return Err(useful_life_message());
    }
    let acquisition_value = row.required_decimal("ValeurAcquisition")?;
    if acquisition_value.is_sign_negative() && !acquisition_value.is_zero() {
        return Err("O valor de aquisição não pode ser negativo.".to_string());
    }
    let quantity = row.optional_integer("Quantite")?.unwrap_or(1);
    if quantity < 0 {
        return Err("A quantidade não pode ser negativa.".to_string());
    }
    Ok(AssetDraft {
        code: row.required_text("Code")?,
        name: row.required_text("Designation")?,
        category: row.optional_text("Categorie"),
        acquisition_value,
        acquisition_date: row.required_date("DateAcquisition")?,
        useful_life_years,
        quantity,
    })
}

// Erros internos não vão para o relatório com detalhes
fn persist_error(row: usize, error: AppError) -> RowError {
    let message = if error.status_code().is_server_error() {
        tracing::error!("Falha ao gravar a linha {}: {}", row, error);
        "Erro inesperado ao gravar a linha.".to_string()
    } else {
        error.to_string()
    };
    RowError { row, message }
}

#[derive(Clone)]
pub struct ImportService {
    pool: PgPool,
    agency_repo: AgencyRepository,
    category_repo: CategoryRepository,
    supply_repo: SupplyRepository,
    asset_repo: AssetRepository,
}

impl ImportService {
    pub fn new(
        pool: PgPool,
        agency_repo: AgencyRepository,
        category_repo: CategoryRepository,
        supply_repo: SupplyRepository,
        asset_repo: AssetRepository,
    ) -> Self {
        Self { pool, agency_repo, category_repo, supply_repo, asset_repo }
    }

    pub async fn import(&self, entity: ImportEntity, bytes: Vec<u8>) -> Result<ImportReport, AppError> {
        // O parsing do zip/xml é CPU-bound: fica fora do executor assíncrono
        let range = tokio::task::spawn_blocking(move || read_first_sheet(bytes))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de leitura da planilha: {}", e))??;

        let sheet = Sheet::from_range(&range)?;

        let missing = sheet.missing_columns(entity.required_columns());
        if !missing.is_empty() {
            return Err(AppError::BadRequest(format!(
                "Colunas obrigatórias ausentes: {}.",
                missing.join(", ")
            )));
        }

        let (imported, errors) = match entity {
            ImportEntity::Agencies => self.import_agencies(&sheet).await?,
            ImportEntity::Categories => self.import_categories(&sheet).await?,
            ImportEntity::Supplies => self.import_supplies(&sheet).await?,
            ImportEntity::Assets => self.import_assets(&sheet).await?,
        };

        let mut errors = errors;
        errors.sort_by_key(|e| e.row);

        tracing::info!(
            "📥 Importação de {}: {} de {} linhas gravadas, {} erros.",
            entity.as_str(),
            imported,
            sheet.row_count(),
            errors.len()
        );

        Ok(ImportReport {
            entity: entity.as_str().to_string(),
            total_rows: sheet.row_count(),
            imported,
            errors,
        })
    }

    async fn import_agencies(&self, sheet: &Sheet) -> Result<(usize, Vec<RowError>), AppError> {
        let (drafts, mut errors) = sheet.parse_rows(parse_agency);
        let mut imported = 0;
        for (row, draft) in drafts {
            let result = self
                .agency_repo
                .create(
                    &self.pool,
                    &draft.agency_number,
                    &draft.name,
                    draft.address.as_deref(),
                    draft.phone.as_deref(),
                )
                .await;
            match result {
                Ok(_) => imported += 1,
                Err(e) => errors.push(persist_error(row, e)),
            }
        }
        Ok((imported, errors))
    }

    async fn import_categories(&self, sheet: &Sheet) -> Result<(usize, Vec<RowError>), AppError> {
        let (drafts, mut errors) = sheet.parse_rows(parse_category);
        let mut imported = 0;
        for (row, draft) in drafts {
            // O pai pode ter sido criado numa linha anterior do mesmo arquivo
            let parent_id = match &draft.parent {
                Some(parent) => match self.category_repo.find_by_name(parent).await? {
                    Some(category) => Some(category.id),
                    None => {
                        errors.push(RowError {
                            row,
                            message: format!("Categoria pai '{parent}' não encontrada."),
                        });
                        continue;
                    }
                },
                None => None,
            };

            match self
                .category_repo
                .create(&draft.name, draft.description.as_deref(), parent_id)
                .await
            {
                Ok(_) => imported += 1,
                Err(e) => errors.push(persist_error(row, e)),
            }
        }
        Ok((imported, errors))
    }

    async fn import_supplies(&self, sheet: &Sheet) -> Result<(usize, Vec<RowError>), AppError> {
        let (drafts, mut errors) = sheet.parse_rows(parse_supply);
        let today = Utc::now().date_naive();
        let mut imported = 0;
        for (row, draft) in drafts {
            let Some(category) = self.category_repo.find_by_name(&draft.category).await? else {
                errors.push(RowError {
                    row,
                    message: format!("Categoria '{}' não encontrada.", draft.category),
                });
                continue;
            };

            let fields = SupplyFields {
                name: &draft.name,
                category_id: category.id,
                quantity: draft.quantity,
                unit_price: draft.unit_price,
                purchase_date: draft.purchase_date.unwrap_or(today),
                supplier: draft.supplier.as_deref(),
            };
            match self.supply_repo.create(&self.pool, &fields).await {
                Ok(_) => imported += 1,
                Err(e) => errors.push(persist_error(row, e)),
            }
        }
        Ok((imported, errors))
    }

    async fn import_assets(&self, sheet: &Sheet) -> Result<(usize, Vec<RowError>), AppError> {
        let (drafts, mut errors) = sheet.parse_rows(parse_asset);
        let mut imported = 0;
        for (row, draft) in drafts {
            let category_id = match &draft.category {
                Some(name) => match self.category_repo.find_by_name(name).await? {
                    Some(category) => Some(category.id),
                    None => {
                        errors.push(RowError {
                            row,
                            message: format!("Categoria '{name}' não encontrada."),
                        });
                        continue;
                    }
                },
                None => None,
            };

            let fields = AssetFields {
                code: &draft.code,
                name: &draft.name,
                category_id,
                acquisition_value: draft.acquisition_value,
                acquisition_date: draft.acquisition_date,
                useful_life_years: draft.useful_life_years,
                quantity: draft.quantity,
                status: AssetStatus::InService,
            };
            match self.asset_repo.create(&self.pool, &fields).await {
                Ok(_) => imported += 1,
                Err(e) => errors.push(persist_error(row, e)),
            }
        }
        Ok((imported, errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn s(value: &str) -> Data {
        Data::String(value.to_string())
    }

    /// Monta uma aba a partir de linhas de células (a primeira é o cabeçalho).
    fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width - 1));
        for (r, cells) in rows.into_iter().enumerate() {
            for (c, cell) in cells.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[rstest]
    #[case("PrixUnitaire", "prixunitaire")]
    #[case(" Prix unitaire ", "prixunitaire")]
    #[case("prix_unitaire", "prixunitaire")]
    #[case("Quantité", "quantite")]
    #[case("Catégorie", "categorie")]
    fn normalizes_headers(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_header(raw), expected);
    }

    #[rstest]
    #[case("supplies", ImportEntity::Supplies)]
    #[case("Fournitures", ImportEntity::Supplies)]
    #[case("immobilisations", ImportEntity::Assets)]
    #[case("agencies", ImportEntity::Agencies)]
    fn parses_entity_names(#[case] raw: &str, #[case] expected: ImportEntity) {
        assert_eq!(raw.parse::<ImportEntity>().expect("entity"), expected);
    }

    #[test]
    fn unknown_entity_is_a_bad_request() {
        assert!(matches!(
            "users".parse::<ImportEntity>(),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn reports_missing_required_columns() {
        let sheet = Sheet::from_range(&range(vec![
            vec![s("Nom"), s("Quantité")],
            vec![s("Stylo"), Data::Float(3.0)],
        ]))
        .expect("sheet");

        assert_eq!(
            sheet.missing_columns(ImportEntity::Supplies.required_columns()),
            vec!["Categorie", "PrixUnitaire"]
        );
    }

    #[test]
    fn parses_supply_rows_and_collects_errors_per_row() {
        let sheet = Sheet::from_range(&range(vec![
            vec![s("Nom"), s("Catégorie"), s("Quantité"), s("Prix Unitaire"), s("DateAchat")],
            vec![s("Ramette A4"), s("Papeterie"), Data::Float(50.0), Data::Float(4.5), s("2024-03-15")],
            vec![s("Stylo"), s("Papeterie"), s("dix"), Data::Float(1.0), Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![s("Agrafeuse"), s("Bureau"), Data::Int(5), s("12,90"), s("15/01/2024")],
            vec![s("Classeur"), Data::Empty, Data::Int(5), Data::Float(2.0), Data::Empty],
        ]))
        .expect("sheet");

        // A linha em branco não conta
        assert_eq!(sheet.row_count(), 4);

        let (drafts, errors) = sheet.parse_rows(parse_supply);
        assert_eq!(drafts.len(), 2);

        let (row, first) = &drafts[0];
        assert_eq!(*row, 2);
        assert_eq!(first.name, "Ramette A4");
        assert_eq!(first.quantity, 50);
        assert_eq!(first.unit_price, Decimal::new(450, 2));
        assert_eq!(first.purchase_date, NaiveDate::from_ymd_opt(2024, 3, 15));

        let (row, second) = &drafts[1];
        assert_eq!(*row, 5);
        assert_eq!(second.unit_price, Decimal::new(1290, 2));
        assert_eq!(second.purchase_date, NaiveDate::from_ymd_opt(2024, 1, 15));

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].row, 3);
        assert!(errors[0].message.contains("Quantite"));
        assert_eq!(errors[1].row, 6);
        assert!(errors[1].message.contains("Categorie"));
    }

    #[test]
    fn parses_asset_rows_with_defaults() {
        let sheet = Sheet::from_range(&range(vec![
            vec![
                s("Code"),
                s("Désignation"),
                s("ValeurAcquisition"),
                s("DateAcquisition"),
                s("DureeVie"),
            ],
            vec![s("IMM-001"), s("Photocopieur"), Data::Float(1200.0), s("01/07/2024"), Data::Int(5)],
            vec![s("IMM-002"), s("Serveur"), Data::Float(900.0), s("2024-01-01"), Data::Int(0)],
            vec![s("IMM-003"), s("Armoire"), Data::Float(300.0), s("2024-01-01"), Data::Float(2147483647.0)],
        ]))
        .expect("sheet");

        let (drafts, errors) = sheet.parse_rows(parse_asset);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].1.quantity, 1);
        assert_eq!(drafts[0].1.category, None);
        assert_eq!(drafts[0].1.acquisition_date, NaiveDate::from_ymd_opt(2024, 7, 1).expect("date"));
        assert_eq!(
            errors,
            vec![
                RowError { row: 3, message: useful_life_message() },
                RowError { row: 4, message: useful_life_message() },
            ]
        );
    }

    #[test]
    fn numeric_agency_numbers_are_read_as_text() {
        let sheet = Sheet::from_range(&range(vec![
            vec![s("NumeroAgence"), s("NomAgence")],
            vec![Data::Float(101.0), s("Dakar Plateau")],
        ]))
        .expect("sheet");

        let (drafts, errors) = sheet.parse_rows(parse_agency);
        assert!(errors.is_empty());
        assert_eq!(drafts[0].1.agency_number, "101");
    }

    #[test]
    fn garbage_bytes_are_rejected_as_bad_request() {
        let result = read_first_sheet(b"isto nao e um xlsx".to_vec());
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
