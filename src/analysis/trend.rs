//! Short-term sales acceleration detection.

use chrono::{DateTime, Utc};

use super::demand::units_sold_between;
use super::months_ago;
use super::reconstruct::StockHistory;

/// Recent rate must reach this multiple of the prior rate.
pub const HOT_RATIO_THRESHOLD: f64 = 1.5;
/// And at least this many units must have sold in the trailing three
/// months, so one unit becoming two does not read as a surge.
pub const HOT_MIN_UNITS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSignal {
    pub hot: bool,
    /// Trailing three-month rate over the prior established rate.
    pub ratio: f64,
}

/// Compares the trailing three-month sales rate against the 6-12 month
/// window. When that prior window has no sales or history is too short to
/// reach it, the already-computed demand rate stands in as the baseline.
pub fn detect(history: &StockHistory, demand_rate: f64, as_of: DateTime<Utc>) -> TrendSignal {
    let recent_units = units_sold_between(&history.sales, months_ago(as_of, 3.0), as_of);
    let recent_span = history.total_months.min(3.0);
    let recent_rate = if recent_span > 0.0 {
        recent_units as f64 / recent_span
    } else {
        0.0
    };

    let prior_units =
        units_sold_between(&history.sales, months_ago(as_of, 12.0), months_ago(as_of, 6.0));
    let prior_span = (history.total_months - 6.0).max(0.0).min(6.0);
    let prior_rate = if prior_span > 0.0 && prior_units > 0 {
        prior_units as f64 / prior_span
    } else {
        demand_rate
    };

    let ratio = if prior_rate > 0.0 {
        recent_rate / prior_rate
    } else {
        1.0
    };

    TrendSignal {
        hot: is_hot(ratio, recent_units),
        ratio,
    }
}

fn is_hot(ratio: f64, recent_units: u64) -> bool {
    ratio >= HOT_RATIO_THRESHOLD && recent_units >= HOT_MIN_UNITS
}
