pub mod admin;
pub mod auth;
pub mod listing;
pub mod message;
pub mod seller_application;
pub mod suite;
