//! The demand-analysis engine.
//!
//! Pure, stateless batch computation: given catalog items and their
//! inventory event histories, produce reorder recommendations. Stages run
//! per item with no shared state, so callers are free to fan items out
//! across tasks. Anything touching the database lives behind the
//! capability traits in [`resolve`] and [`history`]; everything else here
//! is plain functions over plain data.

use chrono::{DateTime, Duration, Utc};

use crate::entities::{inventory_event, item};

pub mod demand;
pub mod history;
pub mod reconstruct;
pub mod recommend;
pub mod resolve;
pub mod seasonality;
pub mod trend;

pub use recommend::OrderRecommendation;

/// Average Gregorian month length in days.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Tunables the business sets, not the algorithm.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisConfig {
    /// Months of demand a single order is sized to cover.
    pub order_cycle_months: f64,
    /// Months-of-stock threshold under which the stock-out note fires.
    pub urgent_months: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            order_cycle_months: 1.0,
            urgent_months: 0.5,
        }
    }
}

/// Runs the whole per-item pipeline: replay the ledger, estimate the
/// weighted rate, apply seasonality, check for a surge, and fold the lot
/// into a recommendation.
pub fn analyze_item(
    item: &item::Model,
    events: &[inventory_event::Model],
    as_of: DateTime<Utc>,
    config: &AnalysisConfig,
) -> OrderRecommendation {
    let history = reconstruct::replay(item.quantity_on_hand, events, as_of);
    let base_rate = demand::estimate(&history, as_of);
    let seasonal_factor = seasonality::factor(&history, as_of);
    let adjusted_rate = base_rate * seasonal_factor;
    let trend = trend::detect(&history, base_rate, as_of);
    recommend::synthesize(item, &history, adjusted_rate, seasonal_factor, &trend, config)
}

/// The instant `months` average months before `as_of`.
pub fn months_ago(as_of: DateTime<Utc>, months: f64) -> DateTime<Utc> {
    as_of - Duration::seconds((months * DAYS_PER_MONTH * 86_400.0).round() as i64)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
