//! CLI command implementations

pub mod serve;
pub mod stat;

pub use serve::ServeArgs;
pub use stat::StatArgs;

use anyhow::Context;
use confeti_processor::lookup::MemoryReportStore;
use std::path::Path;

/// Seed an in-memory store from a JSON reports file
pub(crate) async fn load_store(path: &Path) -> anyhow::Result<MemoryReportStore> {
    MemoryReportStore::load_json_file(path)
        .await
        .with_context(|| format!("failed to load reports from {}", path.display()))
}
