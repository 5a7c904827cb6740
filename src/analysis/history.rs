//! Event retrieval contract and per-item grouping.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::inventory_event;
use crate::errors::ServiceError;

/// Read access to the inventory event ledger.
///
/// Implementations must return every matching event, ascending by
/// occurrence time (ties broken stably), with no truncation. Stock
/// reconstruction sums deltas, so a silently short read does not degrade
/// the answer, it corrupts it. Any storage failure must surface as an
/// error rather than a partial list.
#[async_trait]
pub trait InventoryEventSource: Send + Sync {
    async fn events_for_items(
        &self,
        item_ids: &[String],
        location_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<inventory_event::Model>, ServiceError>;
}

/// Splits a time-ordered event list into per-item lists, preserving each
/// item's internal ordering. Items with no events are simply absent.
pub fn partition_by_item(
    events: Vec<inventory_event::Model>,
) -> HashMap<String, Vec<inventory_event::Model>> {
    let mut by_item: HashMap<String, Vec<inventory_event::Model>> = HashMap::new();
    for event in events {
        by_item.entry(event.item_id.clone()).or_default().push(event);
    }
    by_item
}
