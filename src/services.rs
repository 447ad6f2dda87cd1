pub mod agency_service;
pub mod asset_service;
pub mod assignment_service;
pub mod auth;
pub mod category_service;
pub mod depreciation_service;
pub mod import_service;
pub mod supply_service;
pub mod user_service;
