//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Plain CRUD methods return
//! `sqlx::Error`; methods that enforce domain rules return
//! [`crate::RepoError`]. All stock-balance writes go through
//! [`LedgerRepo::apply`].

pub mod category_repo;
pub mod item_repo;
pub mod item_variant_repo;
pub mod ledger_repo;
pub mod member_repo;
pub mod stock_repo;
pub mod storage_location_repo;

pub use category_repo::CategoryRepo;
pub use item_repo::ItemRepo;
pub use item_variant_repo::ItemVariantRepo;
pub use ledger_repo::LedgerRepo;
pub use member_repo::MemberRepo;
pub use stock_repo::StockRepo;
pub use storage_location_repo::StorageLocationRepo;
