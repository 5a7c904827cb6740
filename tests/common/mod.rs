use std::path::PathBuf;
use std::sync::Arc;

use armory_api::{
    analysis::months_ago,
    config::AppConfig,
    db,
    entities::{inventory_event, item},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};
use axum::{
    body::Body,
    http::{Method, Request},
    middleware, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

/// Helper harness for spinning up an application state backed by a SQLite
/// database file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    db_file: PathBuf,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        // One database file per app so parallel tests never share state.
        let db_file = std::env::temp_dir().join(format!("armory_test_{}.db", Uuid::new_v4()));
        let _ = std::fs::remove_file(&db_file);

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_file.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");

        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()), &cfg);

        let state = AppState {
            db: db_arc,
            config: cfg.clone(),
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api/v1", armory_api::api_v1_routes())
            .layer(middleware::from_fn(
                armory_api::tracing::request_id_middleware,
            ))
            .with_state(state.clone());

        Self {
            router,
            state,
            db_file,
            _event_task: event_task,
        }
    }

    /// Send a request against the router with an optional JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Insert a catalog item.
    pub async fn seed_item(
        &self,
        id: &str,
        name: &str,
        sku: Option<&str>,
        upc: Option<&str>,
        quantity_on_hand: i32,
        unit_cost: Decimal,
    ) -> item::Model {
        item::ActiveModel {
            id: Set(id.to_string()),
            name: Set(name.to_string()),
            sku: Set(sku.map(str::to_string)),
            upc: Set(upc.map(str::to_string)),
            unit_cost: Set(unit_cost),
            retail_price: Set(unit_cost * Decimal::from(2)),
            quantity_on_hand: Set(quantity_on_hand),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed item for tests")
    }

    /// Append a ledger event `months_back` average months before now, at the
    /// primary location.
    pub async fn seed_event(
        &self,
        item_id: &str,
        quantity_delta: i32,
        reason: inventory_event::ReasonCode,
        months_back: f64,
    ) -> inventory_event::Model {
        let location_id = self.state.config.primary_location_id.clone();
        inventory_event::ActiveModel {
            item_id: Set(item_id.to_string()),
            quantity_delta: Set(quantity_delta),
            reason: Set(reason),
            occurred_at: Set(months_ago(Utc::now(), months_back)),
            location_id: Set(location_id),
            ..Default::default()
        }
        .insert(&*self.state.db)
        .await
        .expect("seed inventory event for tests")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
        let _ = std::fs::remove_file(&self.db_file);
    }
}
