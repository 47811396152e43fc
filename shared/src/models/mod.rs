//! Domain models for the Farm Market platform

mod admin;
mod buyer;
mod farmer;
mod order;
mod product;
mod sales;

pub use admin::*;
pub use buyer::*;
pub use farmer::*;
pub use order::*;
pub use product::*;
pub use sales::*;
