//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity supports editing

pub mod listing;
pub mod message;
pub mod role;
pub mod seller_application;
pub mod session;
pub mod status;
pub mod suite;
pub mod user;
