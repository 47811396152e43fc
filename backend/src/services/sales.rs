//! Sales reporting
//!
//! Reports are a fixed run of buckets ending today: seven days or twelve
//! months, oldest first, always fully populated. Figures come from a grouped
//! query; when that query fails the same buckets are recomputed from the raw
//! orders.

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use shared::models::{completed_revenue, BucketLabel, Order, SalesBucket, SalesCsvRow};
use shared::types::{SalesPeriod, YearMonth};

use crate::error::{AppError, AppResult};
use crate::repositories::{OrderRepository, Repositories, SalesRow};

/// Sales reporting service
#[derive(Clone)]
pub struct SalesService {
    orders: Arc<dyn OrderRepository>,
}

impl SalesService {
    pub fn new(repos: &Repositories) -> Self {
        Self {
            orders: repos.orders.clone(),
        }
    }

    /// Sales report ending today, platform-wide or for one farmer
    pub async fn sales_data(
        &self,
        period: SalesPeriod,
        farmer_id: Option<i64>,
    ) -> AppResult<Vec<SalesBucket>> {
        self.sales_data_on(period, farmer_id, Local::now().date_naive())
            .await
    }

    /// Sales report ending on `today`
    pub async fn sales_data_on(
        &self,
        period: SalesPeriod,
        farmer_id: Option<i64>,
        today: NaiveDate,
    ) -> AppResult<Vec<SalesBucket>> {
        let since = window_start(period, today)?;

        match self.orders.grouped_sales(period, since, farmer_id).await {
            Ok(rows) => Ok(merge_grouped_rows(period, today, &rows)),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    ?period,
                    ?farmer_id,
                    "Grouped sales query failed, recomputing from orders"
                );

                let orders = match farmer_id {
                    Some(id) => self.orders.find_by_farmer(id).await?,
                    None => self.orders.find_all().await?,
                };
                Ok(recompute_from_orders(period, today, &orders))
            }
        }
    }

    /// Export buckets as CSV
    pub fn export_to_csv(buckets: &[SalesBucket]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for bucket in buckets {
            wtr.serialize(SalesCsvRow::from(bucket))
                .map_err(|e| AppError::Internal(format!("CSV serialization error: {}", e)))?;
        }
        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::Internal(format!("CSV writer error: {}", e)))?,
        )
        .map_err(|e| AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}

/// Labels of every bucket in a report ending on `today`, oldest first
pub fn bucket_labels(period: SalesPeriod, today: NaiveDate) -> Vec<BucketLabel> {
    let count = period.bucket_count() as i64;
    match period {
        SalesPeriod::Daily => (0..count)
            .rev()
            .map(|back| BucketLabel::Day(today - Duration::days(back)))
            .collect(),
        SalesPeriod::Monthly => {
            let current = YearMonth::of(today);
            (0..count as u32)
                .rev()
                .map(|back| BucketLabel::Month(current.months_before(back)))
                .collect()
        }
    }
}

/// Midnight at the start of the oldest bucket
pub fn window_start(period: SalesPeriod, today: NaiveDate) -> AppResult<NaiveDateTime> {
    let first_day = match bucket_labels(period, today).first() {
        Some(BucketLabel::Day(day)) => Some(*day),
        Some(BucketLabel::Month(month)) => month.first_day(),
        None => None,
    }
    .ok_or_else(|| AppError::Internal(format!("No sales window for {}", today)))?;

    Ok(first_day.and_time(NaiveTime::MIN))
}

/// Place grouped query rows into the bucket skeleton; rows outside the window are ignored
pub fn merge_grouped_rows(
    period: SalesPeriod,
    today: NaiveDate,
    rows: &[SalesRow],
) -> Vec<SalesBucket> {
    bucket_labels(period, today)
        .into_iter()
        .map(|label| {
            let key = label.key();
            match rows.iter().find(|row| row.label == key) {
                Some(row) => SalesBucket {
                    label,
                    order_count: row.order_count,
                    revenue: row.revenue,
                },
                None => SalesBucket::empty(label),
            }
        })
        .collect()
}

/// Bucket raw orders: every order counts, only completed ones add revenue
pub fn recompute_from_orders(
    period: SalesPeriod,
    today: NaiveDate,
    orders: &[Order],
) -> Vec<SalesBucket> {
    bucket_labels(period, today)
        .into_iter()
        .map(|label| {
            let in_bucket: Vec<&Order> = orders
                .iter()
                .filter(|order| label.contains(order.order_date.date()))
                .collect();

            SalesBucket {
                label,
                order_count: in_bucket.len() as i64,
                revenue: completed_revenue(in_bucket.iter().copied()),
            }
        })
        .collect()
}
