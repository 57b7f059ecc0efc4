//! Request extractors for authentication and role checks.
//!
//! - [`auth`] -- `AuthUser` from a Bearer JWT.
//! - [`rbac`] -- role-gated wrappers around `AuthUser`.

pub mod auth;
pub mod rbac;
