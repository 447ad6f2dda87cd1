//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use gestion_stock::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG sobrescreve o filtro padrão
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new().await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if let (Some(email), Some(password)) = (
        app_state.settings.admin_email.clone(),
        app_state.settings.admin_password.clone(),
    ) {
        app_state.auth_service.bootstrap_admin(&email, &password).await?;
    }

    let addr = app_state.settings.server_addr.clone();
    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
