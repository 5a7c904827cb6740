//! Stock history reconstruction from the inventory event ledger.
//!
//! Quantity-on-hand is authoritative but only reflects the present. Replaying
//! the event ledger backwards out of it recovers what the engine actually
//! needs: the opening stock level, how long the item sat at or below zero,
//! and the subset of events that were genuine customer sales.

use chrono::{DateTime, Utc};

use crate::entities::inventory_event;

/// A customer sale extracted from the event ledger.
///
/// Only events whose reason is in the sale subset and whose delta is
/// negative qualify. Quantity is the magnitude of the delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaleEvent {
    pub occurred_at: DateTime<Utc>,
    pub quantity: u32,
}

/// Everything the downstream estimators need about one item's past.
#[derive(Debug, Clone, PartialEq)]
pub struct StockHistory {
    /// Stock level before the first recorded event, solved from the current
    /// quantity and the sum of all deltas. Never observed directly, and may
    /// be negative when the current quantity is itself negative.
    pub initial_stock: i64,
    /// Cumulative days the running stock level sat at or below zero.
    pub out_of_stock_days: f64,
    /// Customer sales in event order.
    pub sales: Vec<SaleEvent>,
    /// Days from the first event to the analysis instant.
    pub total_days: f64,
    /// `total_days` expressed in average-length months.
    pub total_months: f64,
    pub first_event_at: Option<DateTime<Utc>>,
}

impl StockHistory {
    pub fn total_units_sold(&self) -> u64 {
        self.sales.iter().map(|s| u64::from(s.quantity)).sum()
    }

    pub fn in_stock_days(&self) -> f64 {
        (self.total_days - self.out_of_stock_days).max(0.0)
    }
}

/// Replays one item's ordered event list against its current quantity.
///
/// The opening stock is `current_qty - sum(deltas)`, so the running counter
/// always lands back on `current_qty` after the last event. While walking,
/// any stretch where the counter was at or below zero accrues into the
/// out-of-stock total, including the stretch from the final event to
/// `as_of` when the item is still out. Events must already be in ascending
/// time order.
pub fn replay(
    current_qty: i32,
    events: &[inventory_event::Model],
    as_of: DateTime<Utc>,
) -> StockHistory {
    let delta_sum: i64 = events.iter().map(|e| i64::from(e.quantity_delta)).sum();
    let initial_stock = i64::from(current_qty) - delta_sum;

    let first_event_at = events.first().map(|e| e.occurred_at);
    let mut stock = initial_stock;
    let mut out_of_stock_days = 0.0;
    let mut prev_at = first_event_at;
    let mut sales = Vec::new();

    for event in events {
        if stock <= 0 {
            if let Some(prev) = prev_at {
                out_of_stock_days += days_between(prev, event.occurred_at);
            }
        }
        stock += i64::from(event.quantity_delta);
        if event.reason.is_sale() && event.quantity_delta < 0 {
            sales.push(SaleEvent {
                occurred_at: event.occurred_at,
                quantity: event.quantity_delta.unsigned_abs(),
            });
        }
        prev_at = Some(event.occurred_at);
    }

    if stock <= 0 {
        if let Some(last) = prev_at {
            out_of_stock_days += days_between(last, as_of);
        }
    }

    let total_days = first_event_at.map_or(0.0, |first| days_between(first, as_of));

    StockHistory {
        initial_stock,
        out_of_stock_days,
        sales,
        total_days,
        total_months: total_days / super::DAYS_PER_MONTH,
        first_event_at,
    }
}

fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_seconds() as f64 / 86_400.0).max(0.0)
}
