pub mod agency_repo;
pub use agency_repo::AgencyRepository;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod category_repo;
pub use category_repo::CategoryRepository;
pub mod supply_repo;
pub use supply_repo::SupplyRepository;
pub mod asset_repo;
pub use asset_repo::AssetRepository;
pub mod depreciation_repo;
pub use depreciation_repo::DepreciationRepository;
pub mod assignment_repo;
pub use assignment_repo::AssignmentRepository;
