//! Sales report models

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::YearMonth;

/// Which slice of time a bucket covers
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum BucketLabel {
    #[serde(rename = "date")]
    Day(NaiveDate),
    #[serde(rename = "month")]
    Month(YearMonth),
}

impl BucketLabel {
    /// Text form used as a grouping key: `YYYY-MM-DD` or `YYYY-MM`
    pub fn key(&self) -> String {
        match self {
            BucketLabel::Day(date) => date.format("%Y-%m-%d").to_string(),
            BucketLabel::Month(month) => month.to_string(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            BucketLabel::Day(day) => *day == date,
            BucketLabel::Month(month) => month.contains(date),
        }
    }
}

/// One day or month of a sales report
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalesBucket {
    #[serde(flatten)]
    pub label: BucketLabel,
    /// Orders placed in the bucket, whatever their status
    pub order_count: i64,
    /// Amount over completed orders only
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
}

impl SalesBucket {
    pub fn empty(label: BucketLabel) -> Self {
        Self {
            label,
            order_count: 0,
            revenue: Decimal::ZERO,
        }
    }
}

/// Flat row used for CSV export
#[derive(Debug, Clone, Serialize)]
pub struct SalesCsvRow {
    pub period: String,
    pub order_count: i64,
    pub revenue: String,
}

impl From<&SalesBucket> for SalesCsvRow {
    fn from(bucket: &SalesBucket) -> Self {
        Self {
            period: bucket.label.key(),
            order_count: bucket.order_count,
            revenue: bucket.revenue.round_dp(2).to_string(),
        }
    }
}
