pub mod reorder;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub catalog: Arc<crate::services::catalog::CatalogService>,
    pub stock_history: Arc<crate::services::stock_history::StockHistoryService>,
    pub reorder: Arc<crate::services::reorder::ReorderService>,
}

impl AppServices {
    /// Build the AppServices container from the shared pool and config.
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>, config: &AppConfig) -> Self {
        let catalog = Arc::new(crate::services::catalog::CatalogService::new(
            db_pool.clone(),
        ));
        let stock_history = Arc::new(crate::services::stock_history::StockHistoryService::new(
            db_pool.clone(),
        ));

        let analysis_config = crate::analysis::AnalysisConfig {
            order_cycle_months: config.order_cycle_months,
            urgent_months: config.urgent_months,
        };
        let reorder = Arc::new(crate::services::reorder::ReorderService::new(
            catalog.clone(),
            stock_history.clone(),
            Some(event_sender),
            config.primary_location_id.clone(),
            analysis_config,
            config.default_lookback_months,
        ));

        Self {
            catalog,
            stock_history,
            reorder,
        }
    }
}
