//! Recency-weighted monthly sales rate estimation.

use chrono::{DateTime, Utc};

use super::reconstruct::{SaleEvent, StockHistory};
use super::{months_ago, DAYS_PER_MONTH};

/// Trailing window over which recency weighting applies, in months.
const WEIGHTED_LOOKBACK_MONTHS: f64 = 12.0;

/// Converts extracted sales into an average monthly rate, before any
/// seasonal adjustment.
///
/// Three regimes, checked in order:
///
/// 1. Under three months of history there is nothing to weight, so the
///    lifetime total is divided by the span (floored at one month).
/// 2. Lifetime sales with none in the trailing twelve months means a stale
///    item. The lifetime total is divided by an effective in-stock day
///    count, floored at 90 days (or the full span when shorter) and at a
///    quarter of the span when five or fewer units ever sold, so one
///    ancient sale cannot masquerade as a healthy monthly rate.
/// 3. Otherwise the trailing year is split into 0-3, 3-6 and 6-12 month
///    windows weighted 3x, 2x and 1x, each window's month count prorated
///    when history is shorter than the window reaches back.
pub fn estimate(history: &StockHistory, as_of: DateTime<Utc>) -> f64 {
    let total_sold = history.total_units_sold();
    if total_sold == 0 {
        return 0.0;
    }

    let span_months = history.total_months;
    if span_months < 3.0 {
        return total_sold as f64 / span_months.max(1.0);
    }

    let trailing_year_start = months_ago(as_of, WEIGHTED_LOOKBACK_MONTHS);
    let sold_trailing_year = units_sold_between(&history.sales, trailing_year_start, as_of);
    if sold_trailing_year == 0 {
        let mut effective_days = history.in_stock_days().max(history.total_days.min(90.0));
        if total_sold <= 5 {
            effective_days = effective_days.max(0.25 * history.total_days);
        }
        return total_sold as f64 / effective_days * DAYS_PER_MONTH;
    }

    // (months back from as_of, window width in months, weight)
    const WINDOWS: [(f64, f64, f64); 3] = [(0.0, 3.0, 3.0), (3.0, 3.0, 2.0), (6.0, 6.0, 1.0)];

    let mut weighted_sales = 0.0;
    let mut weighted_months = 0.0;
    for (start, width, weight) in WINDOWS {
        let from = months_ago(as_of, start + width);
        let to = months_ago(as_of, start);
        let sold = units_sold_between(&history.sales, from, to);
        let applicable_months = (span_months - start).clamp(0.0, width);
        weighted_sales += weight * sold as f64;
        weighted_months += weight * applicable_months;
    }
    weighted_sales / weighted_months
}

/// Units sold in the half-open window `(from, to]`.
pub fn units_sold_between(sales: &[SaleEvent], from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    sales
        .iter()
        .filter(|sale| sale.occurred_at > from && sale.occurred_at <= to)
        .map(|sale| u64::from(sale.quantity))
        .sum()
}
