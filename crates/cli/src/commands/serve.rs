//! Serve command - run the REST API

use anyhow::Context;
use clap::Args;
use confeti_api::{router, AppState};
use confeti_config::ServiceSettings;
use confeti_processor::lookup::MemoryReportStore;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::load_store;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Reports file seeding the store (overrides `store.reports_path`)
    #[arg(long, value_name = "FILE")]
    pub reports: Option<PathBuf>,
}

impl ServeArgs {
    pub async fn execute(self, settings: ServiceSettings) -> anyhow::Result<()> {
        let store = match self.reports.or(settings.store.reports_path.clone()) {
            Some(path) => load_store(&path).await?,
            None => {
                warn!("No reports file configured, serving an empty store");
                MemoryReportStore::new()
            }
        };

        let state = AppState::from_store(store.clone(), settings.stats.clone());
        let app = router(state, settings.service.request_timeout());

        let address = settings.service.bind_address();
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("failed to bind {address}"))?;

        info!(
            service = %settings.service.name,
            "Statistics API listening on http://{}",
            listener.local_addr()?
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        let stats = store.stats().await;
        info!(
            lookups = stats.lookups,
            records_served = stats.records_served,
            "Statistics API stopped"
        );
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
