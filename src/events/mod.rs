use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

// Define the various events that can occur in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// A reorder analysis batch finished.
    ReorderAnalysisCompleted {
        analysis_id: Uuid,
        items_analyzed: usize,
        items_needing_reorder: usize,
        items_urgent: usize,
        total_estimated_cost: Decimal,
    },
    /// Identifier tokens that matched nothing in the catalog.
    IdentifiersUnresolved {
        analysis_id: Uuid,
        identifiers: Vec<String>,
    },
    /// An analyzed item is likely to run out before the next order cycle.
    StockOutRisk {
        item_id: String,
        months_of_stock_left: f64,
    },

    /// Generic event data
    Generic {
        message: String,
        timestamp: DateTime<Utc>,
        metadata: serde_json::Value,
    },
}

impl Event {
    /// Create a generic event with string data
    pub fn with_data(data: String) -> Self {
        Event::Generic {
            message: data,
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }
}

// Function to process incoming events. With no external consumers wired in,
// processing means structured logging; the channel still decouples analysis
// latency from whatever observers get attached later.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::ReorderAnalysisCompleted {
                analysis_id,
                items_analyzed,
                items_needing_reorder,
                items_urgent,
                total_estimated_cost,
            } => {
                info!(
                    %analysis_id,
                    items_analyzed,
                    items_needing_reorder,
                    items_urgent,
                    %total_estimated_cost,
                    "Reorder analysis completed"
                );
            }
            Event::IdentifiersUnresolved {
                analysis_id,
                identifiers,
            } => {
                warn!(
                    %analysis_id,
                    unmatched = identifiers.len(),
                    identifiers = ?identifiers,
                    "Identifiers could not be resolved to catalog items"
                );
            }
            Event::StockOutRisk {
                item_id,
                months_of_stock_left,
            } => {
                warn!(
                    %item_id,
                    months_of_stock_left,
                    "Item at risk of stocking out before the next order cycle"
                );
            }
            Event::Generic { message, .. } => {
                info!("Received event: {}", message);
            }
        }
    }

    warn!("Event processing loop has ended");
}
