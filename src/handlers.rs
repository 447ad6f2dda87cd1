pub mod agencies;
pub mod agency_assets;
pub mod agency_supplies;
pub mod assets;
pub mod auth;
pub mod categories;
pub mod depreciations;
pub mod imports;
pub mod supplies;
pub mod user_agencies;
pub mod user_supplies;
pub mod users;
