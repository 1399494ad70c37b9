use crate::error::RateError;
use crate::rate_provider::{RateProvider, RateSnapshot};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Issues rate lookups through a provider and records every successful
/// fetch in an append-only session history.
///
/// History is insertion-ordered and lives for the process lifetime only.
/// Appends go through a single lock so the order holds even if callers
/// ever overlap fetches.
pub struct RateTracker {
    provider: Arc<dyn RateProvider>,
    history: Mutex<Vec<RateSnapshot>>,
}

impl RateTracker {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        RateTracker {
            provider,
            history: Mutex::new(Vec::new()),
        }
    }

    /// Fetches the latest rates for `base` without touching history.
    pub async fn fetch_rates(&self, base: &str) -> Result<RateSnapshot, RateError> {
        self.provider.latest(base).await
    }

    /// Fetches the latest rates for `base` and appends the snapshot to
    /// history. Every user-triggered or scheduled refresh goes through
    /// this; a failed fetch leaves history untouched.
    pub async fn fetch_and_record(&self, base: &str) -> Result<RateSnapshot, RateError> {
        let snapshot = self.fetch_rates(base).await?;

        let mut history = self.history.lock().await;
        history.push(snapshot.clone());
        debug!(
            "Recorded snapshot {} for base {}",
            history.len(),
            snapshot.base
        );

        Ok(snapshot)
    }

    /// Converts `amount` from one currency to another.
    ///
    /// An identical pair short-circuits to `amount` without a request;
    /// the provider would answer with the same value.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> Result<f64, RateError> {
        if from == to {
            debug!("Identical currency pair {from}, skipping request");
            return Ok(amount);
        }
        self.provider.convert(amount, from, to).await
    }

    pub async fn history(&self) -> Vec<RateSnapshot> {
        self.history.lock().await.clone()
    }

    pub async fn latest_snapshot(&self) -> Option<RateSnapshot> {
        self.history.lock().await.last().cloned()
    }
}

/// Caller-side validation of conversion input. Rejects what should never
/// reach `RateTracker::convert`: a non-finite or negative amount, or an
/// identical from/to selection.
pub fn validate_conversion(amount: f64, from: &str, to: &str) -> Result<(), RateError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(RateError::Validation(format!(
            "amount must be a non-negative number, got {amount}"
        )));
    }
    if from == to {
        return Err(RateError::Validation(format!(
            "source and target currency are both {from}; pick two different currencies"
        )));
    }
    Ok(())
}
