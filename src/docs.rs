// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::{handlers, models, services::auth::AUTH_COOKIE};

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Agencies ---
        handlers::agencies::list_agencies,
        handlers::agencies::get_agency,
        handlers::agencies::create_agency,
        handlers::agencies::update_agency,
        handlers::agencies::delete_agency,
        handlers::agencies::get_agency_inventory,

        // --- Categories ---
        handlers::categories::list_categories,
        handlers::categories::get_category_tree,
        handlers::categories::get_category,
        handlers::categories::create_category,
        handlers::categories::update_category,
        handlers::categories::delete_category,

        // --- Supplies ---
        handlers::supplies::list_supplies,
        handlers::supplies::get_supply,
        handlers::supplies::create_supply,
        handlers::supplies::update_supply,
        handlers::supplies::delete_supply,
        handlers::supplies::list_cmup,
        handlers::supplies::get_supply_cmup,

        // --- Assets ---
        handlers::assets::list_assets,
        handlers::assets::get_asset,
        handlers::assets::create_asset,
        handlers::assets::update_asset,
        handlers::assets::delete_asset,

        // --- Depreciations ---
        handlers::depreciations::list_depreciations,
        handlers::depreciations::get_depreciation,
        handlers::depreciations::create_depreciation,
        handlers::depreciations::delete_depreciation,
        handlers::depreciations::generate_schedule,
        handlers::depreciations::get_summary,

        // --- Assignments ---
        handlers::agency_supplies::list_agency_supplies,
        handlers::agency_supplies::get_agency_supply,
        handlers::agency_supplies::assign_supply,
        handlers::agency_supplies::update_agency_supply,
        handlers::agency_supplies::delete_agency_supply,
        handlers::agency_assets::list_agency_assets,
        handlers::agency_assets::get_agency_asset,
        handlers::agency_assets::assign_asset,
        handlers::agency_assets::update_agency_asset,
        handlers::agency_assets::delete_agency_asset,
        handlers::user_agencies::list_user_agencies,
        handlers::user_agencies::get_user_agency,
        handlers::user_agencies::link_user_agency,
        handlers::user_agencies::move_user_agency,
        handlers::user_agencies::delete_user_agency,
        handlers::user_supplies::list_user_supplies,
        handlers::user_supplies::link_user_supply,
        handlers::user_supplies::delete_user_supply,

        // --- Import ---
        handlers::imports::import_sheet,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            handlers::users::CreateUserPayload,
            handlers::users::UpdateUserPayload,

            // --- Agencies ---
            models::agency::Agency,
            models::agency::AgencyInventory,
            handlers::agencies::AgencyPayload,

            // --- Categories ---
            models::category::Category,
            models::category::CategoryNode,
            handlers::categories::CategoryPayload,

            // --- Supplies ---
            models::supply::Supply,
            models::supply::SupplyView,
            models::supply::CmupGroup,
            handlers::supplies::SupplyPayload,

            // --- Assets ---
            models::asset::AssetStatus,
            models::asset::Asset,
            models::asset::AssetDetail,
            handlers::assets::AssetPayload,

            // --- Depreciations ---
            models::depreciation::Depreciation,
            models::depreciation::YearSummary,
            handlers::depreciations::CreateDepreciationPayload,

            // --- Assignments ---
            models::assignment::AgencySupplyView,
            models::assignment::AgencyAssetView,
            models::assignment::UserAgency,
            models::assignment::UserSupply,
            handlers::agency_supplies::AssignSupplyPayload,
            handlers::agency_supplies::UpdateQuantityPayload,
            handlers::agency_assets::AssignAssetPayload,
            handlers::agency_assets::UpdateAssetAssignmentPayload,
            handlers::user_agencies::LinkUserAgencyPayload,
            handlers::user_agencies::MoveUserAgencyPayload,
            handlers::user_supplies::LinkUserSupplyPayload,

            // --- Import ---
            models::import::RowError,
            models::import::ImportReport,
            handlers::imports::ImportUpload,
        )
    ),
    tags(
        (name = "Auth", description = "Sessão, registro e login"),
        (name = "Users", description = "Gestão de usuários (administradores)"),
        (name = "Agencies", description = "Agências e seu inventário"),
        (name = "Categories", description = "Hierarquia de categorias"),
        (name = "Supplies", description = "Fornituras e CMUP"),
        (name = "Assets", description = "Imobilizações"),
        (name = "Depreciations", description = "Planos e lançamentos de amortização"),
        (name = "AgencySupplies", description = "Distribuição de fornituras às agências"),
        (name = "AgencyAssets", description = "Distribuição de imobilizações às agências"),
        (name = "UserAgencies", description = "Vínculo usuário-agência"),
        (name = "UserSupplies", description = "Vínculo usuário-fornitura"),
        (name = "Import", description = "Importação de planilhas Excel")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
        components.add_security_scheme(
            "cookie_auth",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTH_COOKIE))),
        );
    }
}
