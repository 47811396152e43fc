//! Buyer account models

use serde::{Deserialize, Serialize};

/// A customer account that places orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Buyer {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(rename = "mobileno")]
    pub mobile_no: String,
    pub address: String,
}

#[derive(Debug, Clone)]
pub struct NewBuyer {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub mobile_no: String,
    pub address: String,
}
