use crate::{
    analysis::resolve::CatalogSource,
    db::DbPool,
    entities::item::{self, Entity as ItemEntity},
    errors::ServiceError,
};
use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use std::sync::Arc;
use tracing::error;

/// Read-only access to the item catalog. Rows are written by the
/// point-of-sale sync; this service only ever looks them up.
#[derive(Clone)]
pub struct CatalogService {
    db_pool: Arc<DbPool>,
}

impl CatalogService {
    /// Creates a new catalog service instance
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    pub async fn get_item(&self, id: &str) -> Result<Option<item::Model>, ServiceError> {
        ItemEntity::find_by_id(id)
            .one(&*self.db_pool)
            .await
            .map_err(|e| {
                let msg = format!("Failed to load item: {}", e);
                error!(item_id = %id, error = %e, "Database error when fetching item");
                ServiceError::db_error(msg)
            })
    }
}

#[async_trait]
impl CatalogSource for CatalogService {
    async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<item::Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ItemEntity::find()
            .filter(item::Column::Id.is_in(ids.iter().cloned()))
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                let msg = format!("Failed to look up items by id: {}", e);
                error!(%msg);
                ServiceError::db_error(msg)
            })
    }

    async fn find_by_skus(&self, skus: &[String]) -> Result<Vec<item::Model>, ServiceError> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }
        ItemEntity::find()
            .filter(item::Column::Sku.is_in(skus.iter().cloned()))
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                let msg = format!("Failed to look up items by SKU: {}", e);
                error!(%msg);
                ServiceError::db_error(msg)
            })
    }

    async fn find_by_upcs(&self, upcs: &[String]) -> Result<Vec<item::Model>, ServiceError> {
        if upcs.is_empty() {
            return Ok(Vec::new());
        }
        ItemEntity::find()
            .filter(item::Column::Upc.is_in(upcs.iter().cloned()))
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                let msg = format!("Failed to look up items by UPC: {}", e);
                error!(%msg);
                ServiceError::db_error(msg)
            })
    }
}
