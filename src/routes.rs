// src/routes.rs

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

// Planilhas grandes passam do limite padrão de 2 MB do axum
const IMPORT_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// CORS por lista de origens. Como a sessão viaja num cookie, as credenciais
/// são permitidas e por isso nada de curingas.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Origem CORS inválida ignorada: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true)
}

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas de autenticação
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard)),
        );

    let agency_routes = Router::new()
        .route(
            "/",
            get(handlers::agencies::list_agencies).post(handlers::agencies::create_agency),
        )
        .route(
            "/{id}",
            get(handlers::agencies::get_agency)
                .put(handlers::agencies::update_agency)
                .delete(handlers::agencies::delete_agency),
        )
        .route("/{id}/inventory", get(handlers::agencies::get_agency_inventory));

    let user_routes = Router::new()
        .route("/", get(handlers::users::list_users).post(handlers::users::create_user))
        .route(
            "/{id}",
            get(handlers::users::get_user)
                .put(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        );

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::categories::list_categories).post(handlers::categories::create_category),
        )
        .route("/tree", get(handlers::categories::get_category_tree))
        .route(
            "/{id}",
            get(handlers::categories::get_category)
                .put(handlers::categories::update_category)
                .delete(handlers::categories::delete_category),
        );

    let supply_routes = Router::new()
        .route(
            "/",
            get(handlers::supplies::list_supplies).post(handlers::supplies::create_supply),
        )
        .route("/cmup", get(handlers::supplies::list_cmup))
        .route(
            "/{id}",
            get(handlers::supplies::get_supply)
                .put(handlers::supplies::update_supply)
                .delete(handlers::supplies::delete_supply),
        )
        .route("/{id}/cmup", get(handlers::supplies::get_supply_cmup));

    let asset_routes = Router::new()
        .route("/", get(handlers::assets::list_assets).post(handlers::assets::create_asset))
        .route(
            "/{id}",
            get(handlers::assets::get_asset)
                .put(handlers::assets::update_asset)
                .delete(handlers::assets::delete_asset),
        );

    let depreciation_routes = Router::new()
        .route(
            "/",
            get(handlers::depreciations::list_depreciations)
                .post(handlers::depreciations::create_depreciation),
        )
        .route("/summary", get(handlers::depreciations::get_summary))
        .route("/generate/{asset_id}", post(handlers::depreciations::generate_schedule))
        .route(
            "/{id}",
            get(handlers::depreciations::get_depreciation)
                .delete(handlers::depreciations::delete_depreciation),
        );

    let agency_supply_routes = Router::new()
        .route(
            "/",
            get(handlers::agency_supplies::list_agency_supplies)
                .post(handlers::agency_supplies::assign_supply),
        )
        .route(
            "/{id}",
            get(handlers::agency_supplies::get_agency_supply)
                .put(handlers::agency_supplies::update_agency_supply)
                .delete(handlers::agency_supplies::delete_agency_supply),
        );

    let agency_asset_routes = Router::new()
        .route(
            "/",
            get(handlers::agency_assets::list_agency_assets)
                .post(handlers::agency_assets::assign_asset),
        )
        .route(
            "/{id}",
            get(handlers::agency_assets::get_agency_asset)
                .put(handlers::agency_assets::update_agency_asset)
                .delete(handlers::agency_assets::delete_agency_asset),
        );

    let user_agency_routes = Router::new()
        .route(
            "/",
            get(handlers::user_agencies::list_user_agencies)
                .post(handlers::user_agencies::link_user_agency),
        )
        .route(
            "/{id}",
            get(handlers::user_agencies::get_user_agency)
                .put(handlers::user_agencies::move_user_agency)
                .delete(handlers::user_agencies::delete_user_agency),
        );

    let user_supply_routes = Router::new()
        .route(
            "/",
            get(handlers::user_supplies::list_user_supplies)
                .post(handlers::user_supplies::link_user_supply),
        )
        .route("/{id}", axum::routing::delete(handlers::user_supplies::delete_user_supply));

    let import_routes = Router::new()
        .route("/{entity}", post(handlers::imports::import_sheet))
        .layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT));

    // Tudo abaixo exige sessão válida
    let protected = Router::new()
        .nest("/Agencies", agency_routes)
        .nest("/Users", user_routes)
        .nest("/Categories", category_routes)
        .nest("/Supplies", supply_routes)
        .nest("/Assets", asset_routes)
        .nest("/Depreciations", depreciation_routes)
        .nest("/AgencySupplies", agency_supply_routes)
        .nest("/AgencyAssets", agency_asset_routes)
        .nest("/UserAgencies", user_agency_routes)
        .nest("/UserSupplies", user_supply_routes)
        .nest("/Import", import_routes)
        .route_layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let api = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/Auth", auth_routes)
        .merge(protected);

    let cors = cors_layer(&app_state.settings.allowed_origins);

    Router::new()
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}
