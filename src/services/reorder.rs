use crate::{
    analysis::{
        analyze_item,
        history::{partition_by_item, InventoryEventSource},
        months_ago,
        recommend::{sort_recommendations, OrderRecommendation},
        resolve::{resolve_identifiers, CatalogSource, Resolution},
        AnalysisConfig,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Request/Response types for the reorder service
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReorderAnalysisRequest {
    /// Catalog ids, SKUs, UPCs, or scanned barcodes to analyze.
    #[validate(length(min = 1, message = "At least one identifier is required"))]
    pub identifiers: Vec<String>,
    /// Restrict the event history to this many months back. Omitted means
    /// the full ledger.
    #[validate(range(min = 1, message = "Lookback must be at least one month"))]
    pub lookback_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReorderSummary {
    pub items_analyzed: usize,
    pub items_needing_reorder: usize,
    pub items_urgent: usize,
    pub total_estimated_cost: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReorderReport {
    pub analysis_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub location_id: String,
    /// Most urgent first.
    pub recommendations: Vec<OrderRecommendation>,
    pub unmatched_identifiers: Vec<String>,
    pub summary: ReorderSummary,
}

/// Orchestrates a reorder analysis batch: resolve identifiers, pull each
/// item's event history, run the per-item pipeline concurrently, and
/// assemble the sorted report.
#[derive(Clone)]
pub struct ReorderService {
    catalog: Arc<dyn CatalogSource>,
    event_source: Arc<dyn InventoryEventSource>,
    event_sender: Option<Arc<EventSender>>,
    location_id: String,
    analysis_config: AnalysisConfig,
    default_lookback_months: Option<u32>,
}

impl ReorderService {
    /// Creates a new reorder service instance
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        event_source: Arc<dyn InventoryEventSource>,
        event_sender: Option<Arc<EventSender>>,
        location_id: String,
        analysis_config: AnalysisConfig,
        default_lookback_months: Option<u32>,
    ) -> Self {
        Self {
            catalog,
            event_source,
            event_sender,
            location_id,
            analysis_config,
            default_lookback_months,
        }
    }

    /// Runs a reorder analysis as of now.
    pub async fn analyze(&self, request: ReorderAnalysisRequest) -> Result<ReorderReport, ServiceError> {
        self.analyze_as_of(request, Utc::now()).await
    }

    /// Runs a reorder analysis against a fixed instant.
    ///
    /// Either the whole batch succeeds or the call fails: a storage error
    /// mid-read aborts everything rather than producing recommendations
    /// built on a partial event history.
    #[instrument(skip(self, request), fields(identifier_count = request.identifiers.len()))]
    pub async fn analyze_as_of(
        &self,
        request: ReorderAnalysisRequest,
        as_of: DateTime<Utc>,
    ) -> Result<ReorderReport, ServiceError> {
        request
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let analysis_id = Uuid::new_v4();
        let Resolution { items, unmatched } =
            resolve_identifiers(self.catalog.as_ref(), &request.identifiers).await?;

        let lookback = request.lookback_months.or(self.default_lookback_months);
        let since = lookback.map(|months| months_ago(as_of, f64::from(months)));

        let mut recommendations = Vec::with_capacity(items.len());
        if !items.is_empty() {
            let item_ids: Vec<String> = items.iter().map(|item| item.id.clone()).collect();
            let events = self
                .event_source
                .events_for_items(&item_ids, &self.location_id, since)
                .await?;
            let mut events_by_item = partition_by_item(events);

            // Per-item analysis is independent, so fan the items out.
            let mut tasks = Vec::with_capacity(items.len());
            for item in items {
                let events = events_by_item.remove(&item.id).unwrap_or_default();
                let config = self.analysis_config;
                tasks.push(tokio::spawn(async move {
                    analyze_item(&item, &events, as_of, &config)
                }));
            }
            for joined in join_all(tasks).await {
                recommendations.push(joined.map_err(|e| {
                    error!(error = %e, "Item analysis task failed");
                    ServiceError::InternalError(format!("item analysis task failed: {e}"))
                })?);
            }
        }
        sort_recommendations(&mut recommendations);

        let summary = ReorderSummary {
            items_analyzed: recommendations.len(),
            items_needing_reorder: recommendations.iter().filter(|r| r.needs_reorder()).count(),
            items_urgent: recommendations.iter().filter(|r| r.is_urgent()).count(),
            total_estimated_cost: recommendations
                .iter()
                .map(|r| r.estimated_order_cost)
                .sum(),
        };

        counter!("armory_reorder.analyses_total", 1);
        histogram!(
            "armory_reorder.items_analyzed",
            summary.items_analyzed as f64
        );
        if !unmatched.is_empty() {
            counter!(
                "armory_reorder.unmatched_identifiers",
                unmatched.len() as u64
            );
        }

        self.emit_events(analysis_id, &recommendations, &unmatched, &summary)
            .await?;

        info!(
            %analysis_id,
            items_analyzed = summary.items_analyzed,
            items_needing_reorder = summary.items_needing_reorder,
            items_urgent = summary.items_urgent,
            unmatched = unmatched.len(),
            "Reorder analysis completed"
        );

        Ok(ReorderReport {
            analysis_id,
            generated_at: as_of,
            location_id: self.location_id.clone(),
            recommendations,
            unmatched_identifiers: unmatched,
            summary,
        })
    }

    async fn emit_events(
        &self,
        analysis_id: Uuid,
        recommendations: &[OrderRecommendation],
        unmatched: &[String],
        summary: &ReorderSummary,
    ) -> Result<(), ServiceError> {
        let Some(sender) = &self.event_sender else {
            return Ok(());
        };

        if !unmatched.is_empty() {
            sender
                .send(Event::IdentifiersUnresolved {
                    analysis_id,
                    identifiers: unmatched.to_vec(),
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        for rec in recommendations.iter().filter(|r| r.is_urgent()) {
            sender
                .send(Event::StockOutRisk {
                    item_id: rec.item_id.clone(),
                    months_of_stock_left: rec.months_of_stock_left,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        sender
            .send(Event::ReorderAnalysisCompleted {
                analysis_id,
                items_analyzed: summary.items_analyzed,
                items_needing_reorder: summary.items_needing_reorder,
                items_urgent: summary.items_urgent,
                total_estimated_cost: summary.total_estimated_cost,
            })
            .await
            .map_err(ServiceError::EventError)
    }
}
