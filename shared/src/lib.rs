//! Shared types and models for the Farm Market platform
//!
//! This crate contains the entities and transfer shapes exchanged between the
//! backend and its clients.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
