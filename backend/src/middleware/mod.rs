//! Request middleware

pub mod auth;

pub use auth::{require_admin, AuthUser, CurrentUser};
