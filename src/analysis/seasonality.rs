//! Calendar-month seasonality adjustment.

use chrono::{DateTime, Datelike, Utc};

use super::reconstruct::StockHistory;

/// Minimum history span before seasonal math has any signal.
const MIN_HISTORY_MONTHS: f64 = 12.0;
/// Minimum lifetime units sold before seasonal math has any signal.
const MIN_LIFETIME_UNITS: u64 = 6;
/// Years of history at which the raw factor is trusted in full.
const FULL_CONFIDENCE_YEARS: f64 = 3.0;
const FACTOR_FLOOR: f64 = 0.3;
const FACTOR_CEILING: f64 = 3.0;

/// Multiplier capturing how the current and upcoming calendar months sell
/// versus the item's flat monthly average.
///
/// Sales are bucketed by calendar month across the whole history and each
/// bucket is normalized by how many times that month actually occurred in
/// the span, so a June observed three times is not triple-counted against a
/// June observed once. The current and next month's averages are blended
/// half and half because an order placed today mostly arrives and sells
/// into the following weeks. The raw ratio is pulled toward 1.0 when fewer
/// than three years of history back it, then clamped to `[0.3, 3.0]`.
///
/// Returns 1.0 whenever the item has under a year of history or fewer than
/// six lifetime units sold.
pub fn factor(history: &StockHistory, as_of: DateTime<Utc>) -> f64 {
    let total_sold = history.total_units_sold();
    if history.total_months < MIN_HISTORY_MONTHS || total_sold < MIN_LIFETIME_UNITS {
        return 1.0;
    }
    let Some(first_event_at) = history.first_event_at else {
        return 1.0;
    };

    let mut monthly_totals = [0.0f64; 12];
    for sale in &history.sales {
        monthly_totals[sale.occurred_at.month0() as usize] += f64::from(sale.quantity);
    }

    let occurrences = month_occurrences(first_event_at, as_of);
    let mut monthly_averages = [0.0f64; 12];
    for month in 0..12 {
        if occurrences[month] > 0 {
            monthly_averages[month] = monthly_totals[month] / f64::from(occurrences[month]);
        }
    }

    let current = as_of.month0() as usize;
    let next = (current + 1) % 12;
    let blended = (monthly_averages[current] + monthly_averages[next]) / 2.0;
    let lifetime_monthly_average = total_sold as f64 / history.total_months;
    let raw = blended / lifetime_monthly_average;

    let confidence = (history.total_months / 12.0 / FULL_CONFIDENCE_YEARS).min(1.0);
    (1.0 + (raw - 1.0) * confidence).clamp(FACTOR_FLOOR, FACTOR_CEILING)
}

/// How many times each calendar month occurred between the first event's
/// month and the analysis month, both inclusive.
fn month_occurrences(first_event_at: DateTime<Utc>, as_of: DateTime<Utc>) -> [u32; 12] {
    let mut occurrences = [0u32; 12];
    let mut year = first_event_at.year();
    let mut month0 = first_event_at.month0();
    let end = (as_of.year(), as_of.month0());
    while (year, month0) <= end {
        occurrences[month0 as usize] += 1;
        month0 += 1;
        if month0 == 12 {
            month0 = 0;
            year += 1;
        }
    }
    occurrences
}
