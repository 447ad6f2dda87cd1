pub mod agency;
pub mod assignment;
pub mod asset;
pub mod auth;
pub mod category;
pub mod depreciation;
pub mod import;
pub mod supply;
