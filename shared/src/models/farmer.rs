//! Farmer (seller) account models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A seller account. New farmers must be approved by an admin before they can sign in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Farmer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub username: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(rename = "mobileno")]
    pub mobile_no: String,
    #[serde(rename = "nationalidno")]
    pub national_id_no: String,
    pub location: String,
    pub status: FarmerStatus,
    /// SHA-256 digest of the outstanding password reset token
    #[serde(skip)]
    pub reset_token: Option<String>,
}

impl Farmer {
    pub fn is_approved(&self) -> bool {
        self.status == FarmerStatus::Approved
    }
}

/// Fields needed to insert a farmer; the id is assigned by the database
#[derive(Debug, Clone)]
pub struct NewFarmer {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub mobile_no: String,
    pub national_id_no: String,
    pub location: String,
    pub status: FarmerStatus,
}

/// Registration status of a farmer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum FarmerStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown farmer status: {0}")]
pub struct UnknownFarmerStatus(pub String);

impl FarmerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmerStatus::Pending => "Pending",
            FarmerStatus::Approved => "Approved",
            FarmerStatus::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for FarmerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FarmerStatus {
    type Err = UnknownFarmerStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [
            FarmerStatus::Pending,
            FarmerStatus::Approved,
            FarmerStatus::Rejected,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| UnknownFarmerStatus(s.to_string()))
    }
}
