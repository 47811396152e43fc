//! Common types used across the platform

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Account kinds that can sign in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Farmer,
    Buyer,
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Farmer => "farmer",
            AccountRole::Buyer => "buyer",
            AccountRole::Admin => "admin",
        }
    }
}

/// Granularity of a sales report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SalesPeriod {
    /// Seven one-day buckets ending today
    Daily,
    /// Twelve calendar-month buckets ending with the current month
    Monthly,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unsupported period '{0}', expected 'daily' or 'monthly'")]
pub struct UnknownPeriod(pub String);

impl SalesPeriod {
    /// Number of buckets a report of this period always contains
    pub fn bucket_count(&self) -> usize {
        match self {
            SalesPeriod::Daily => 7,
            SalesPeriod::Monthly => 12,
        }
    }
}

impl FromStr for SalesPeriod {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("daily") {
            Ok(SalesPeriod::Daily)
        } else if s.eq_ignore_ascii_case("monthly") {
            Ok(SalesPeriod::Monthly)
        } else {
            Err(UnknownPeriod(s.to_string()))
        }
    }
}

/// A calendar month, rendered as `YYYY-MM`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    /// 1-based month
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Step back `months` calendar months, crossing year boundaries as needed
    pub fn months_before(&self, months: u32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 - months as i32;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// First day of the month
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
