//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod listing_repo;
pub mod message_repo;
pub mod role_repo;
pub mod seller_application_repo;
pub mod session_repo;
pub mod suite_repo;
pub mod user_repo;

pub use listing_repo::ListingRepo;
pub use message_repo::MessageRepo;
pub use role_repo::RoleRepo;
pub use seller_application_repo::SellerApplicationRepo;
pub use session_repo::SessionRepo;
pub use suite_repo::SuiteRepo;
pub use user_repo::UserRepo;
