//! REST API for conference report statistics
//!
//! Exposes the tag/language frequency tables and speaker totals over HTTP.
//! Every request runs one aggregation to completion or fails as a whole.
//!
//! ```rust,no_run
//! use confeti_api::{router, AppState};
//! use confeti_processor::{MemoryReportStore, StatsConfig};
//! use std::time::Duration;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let state = AppState::from_store(MemoryReportStore::new(), StatsConfig::default());
//! let app = router(state, Duration::from_secs(30));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::{ApiError, ApiResult, ErrorResponse};

use axum::{routing::get, Router};
use confeti_processor::aggregation::HierarchicalAggregator;
use confeti_processor::config::StatsConfig;
use confeti_processor::lookup::{MemoryReportStore, ReportLookup, SpeakerStatsLookup};
use confeti_processor::reducer::StatsReducer;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::middleware::RequestTimeout;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub aggregator: HierarchicalAggregator<dyn ReportLookup>,
    pub speakers: Arc<dyn SpeakerStatsLookup>,
    pub reducer: StatsReducer,
    pub started: Instant,
}

impl AppState {
    pub fn new(
        reports: Arc<dyn ReportLookup>,
        speakers: Arc<dyn SpeakerStatsLookup>,
        config: StatsConfig,
    ) -> Self {
        Self {
            aggregator: HierarchicalAggregator::new(reports, config.clone()),
            speakers,
            reducer: StatsReducer::new(config),
            started: Instant::now(),
        }
    }

    /// State backed by one in-memory store for both lookups
    pub fn from_store(store: MemoryReportStore, config: StatsConfig) -> Self {
        Self::new(Arc::new(store.clone()), Arc::new(store), config)
    }
}

/// Build the application router
///
/// Layers run outermost first: request id, logging, then the timeout.
pub fn router(state: AppState, timeout: Duration) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .route("/health", get(routes::health::health))
        .layer(axum::middleware::from_fn_with_state(
            RequestTimeout(timeout),
            middleware::timeout_middleware,
        ))
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
