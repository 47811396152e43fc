//! Business logic services for the Farm Market backend

pub mod admin;
pub mod auth;
pub mod buyer;
pub mod farmer;
pub mod order;
pub mod product;
pub mod sales;

pub use admin::AdminService;
pub use auth::AuthService;
pub use buyer::BuyerService;
pub use farmer::FarmerService;
pub use order::OrderService;
pub use product::ProductService;
pub use sales::SalesService;
