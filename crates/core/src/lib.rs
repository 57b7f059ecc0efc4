//! Fire Suite Exchange domain logic.
//!
//! Pure types, constants and validation with no I/O. The database and API
//! crates build on these so every layer agrees on statuses, roles, and the
//! listing lifecycle rules.

pub mod error;
pub mod listing;
pub mod messaging;
pub mod roles;
pub mod search;
pub mod status;
pub mod types;
pub mod verification;
