// src/config.rs

use std::{env, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AgencyRepository, AssetRepository, AssignmentRepository, CategoryRepository,
        DepreciationRepository, SupplyRepository, UserRepository,
    },
    services::{
        agency_service::AgencyService, asset_service::AssetService,
        assignment_service::AssignmentService, auth::AuthService,
        category_service::CategoryService, depreciation_service::DepreciationService,
        import_service::ImportService, supply_service::SupplyService, user_service::UserService,
    },
};

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173,http://localhost:4200";

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub allowed_origins: Vec<String>,
    pub cookie_secure: bool,
    pub token_ttl_hours: i64,
    pub database_max_connections: u32,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let allowed_origins = parse_origins(
            &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ORIGINS.to_string()),
        );
        let cookie_secure = env::var("COOKIE_SECURE")
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        let token_ttl_hours = parse_or("TOKEN_TTL_HOURS", 8)?;
        let database_max_connections = parse_or("DATABASE_MAX_CONNECTIONS", 5)?;

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            allowed_origins,
            cookie_secure,
            token_ttl_hours,
            database_max_connections,
            admin_email: non_empty_var("ADMIN_EMAIL"),
            admin_password: non_empty_var("ADMIN_PASSWORD"),
        })
    }
}

pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

fn parse_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} inválido: '{raw}'")),
        Err(_) => Ok(default),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Settings,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub agency_service: AgencyService,
    pub category_service: CategoryService,
    pub supply_service: SupplyService,
    pub asset_service: AssetService,
    pub depreciation_service: DepreciationService,
    pub assignment_service: AssignmentService,
    pub import_service: ImportService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        let settings = Settings::from_env()?;

        let db_pool = PgPoolOptions::new()
            .max_connections(settings.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&settings.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_pool(db_pool, settings))
    }

    /// Monta o gráfico de dependências sobre um pool já existente.
    pub fn from_pool(db_pool: PgPool, settings: Settings) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let agency_repo = AgencyRepository::new(db_pool.clone());
        let category_repo = CategoryRepository::new(db_pool.clone());
        let supply_repo = SupplyRepository::new(db_pool.clone());
        let asset_repo = AssetRepository::new(db_pool.clone());
        let depreciation_repo = DepreciationRepository::new(db_pool.clone());
        let assignment_repo = AssignmentRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            settings.jwt_secret.clone(),
            settings.token_ttl_hours,
        );

        Self {
            user_service: UserService::new(user_repo.clone(), auth_service.clone()),
            agency_service: AgencyService::new(db_pool.clone(), agency_repo.clone()),
            category_service: CategoryService::new(db_pool.clone(), category_repo.clone()),
            supply_service: SupplyService::new(db_pool.clone(), supply_repo.clone(), category_repo.clone()),
            asset_service: AssetService::new(
                db_pool.clone(),
                asset_repo.clone(),
                category_repo.clone(),
                depreciation_repo.clone(),
            ),
            depreciation_service: DepreciationService::new(
                db_pool.clone(),
                depreciation_repo,
                asset_repo.clone(),
            ),
            assignment_service: AssignmentService::new(
                db_pool.clone(),
                assignment_repo,
                agency_repo.clone(),
                supply_repo.clone(),
                asset_repo.clone(),
                user_repo,
            ),
            import_service: ImportService::new(
                db_pool.clone(),
                agency_repo,
                category_repo,
                supply_repo,
                asset_repo,
            ),
            auth_service,
            db_pool,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.local , ,http://b.local,"),
            vec!["http://a.local".to_string(), "http://b.local".to_string()]
        );
    }
}
