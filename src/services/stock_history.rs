use crate::{
    analysis::history::InventoryEventSource,
    db::DbPool,
    entities::inventory_event::{self, Entity as InventoryEventEntity},
    errors::ServiceError,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::sync::Arc;
use tracing::{error, instrument};

/// Rows fetched per page when draining an item's event history.
const EVENT_PAGE_SIZE: u64 = 1_000;

/// Reads the append-only inventory event ledger.
#[derive(Clone)]
pub struct StockHistoryService {
    db_pool: Arc<DbPool>,
}

impl StockHistoryService {
    /// Creates a new stock history service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl InventoryEventSource for StockHistoryService {
    /// Drains every matching page before returning. Reconstruction sums
    /// deltas over the whole history, so a truncated read would produce a
    /// wrong answer rather than a degraded one; any page failure aborts
    /// the read instead.
    #[instrument(skip(self, item_ids), fields(item_count = item_ids.len(), location_id = %location_id))]
    async fn events_for_items(
        &self,
        item_ids: &[String],
        location_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<inventory_event::Model>, ServiceError> {
        if item_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = InventoryEventEntity::find()
            .filter(inventory_event::Column::ItemId.is_in(item_ids.iter().cloned()))
            .filter(inventory_event::Column::LocationId.eq(location_id))
            .order_by_asc(inventory_event::Column::OccurredAt)
            .order_by_asc(inventory_event::Column::Id);
        if let Some(since) = since {
            query = query.filter(inventory_event::Column::OccurredAt.gte(since));
        }

        let mut paginator = query.paginate(&*self.db_pool, EVENT_PAGE_SIZE);
        let mut events = Vec::new();
        loop {
            match paginator.fetch_and_next().await {
                Ok(Some(page)) => events.extend(page),
                Ok(None) => break,
                Err(e) => {
                    error!(error = %e, fetched_so_far = events.len(), "Failed to fetch inventory event page");
                    return Err(ServiceError::db_error(e));
                }
            }
        }
        Ok(events)
    }
}
