//! Provider seam for fetching exchange rates and conversions.

use crate::error::RateError;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;

/// One fetched, timestamped set of rates for a base currency.
///
/// Immutable once constructed. `date` is the provider's calendar date and
/// is not validated locally; `retrieved_at` is stamped at capture time.
#[derive(Debug, Clone)]
pub struct RateSnapshot {
    pub base: String,
    pub date: String,
    pub retrieved_at: DateTime<Local>,
    pub rates: BTreeMap<String, f64>,
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest(&self, base: &str) -> Result<RateSnapshot, RateError>;

    async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError>;
}
