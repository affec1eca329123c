//! Stat command - one offline aggregation over a reports file

use anyhow::Context;
use clap::{Args, ValueEnum};
use confeti_config::ServiceSettings;
use confeti_processor::aggregation::{HierarchicalAggregator, StatsQuery};
use confeti_processor::extractors::Dimension;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

use super::load_store;
use crate::output::{render_table, OutputFormat};

/// Category dimension to count
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatDimension {
    Tag,
    Language,
}

impl From<StatDimension> for Dimension {
    fn from(dimension: StatDimension) -> Self {
        match dimension {
            StatDimension::Tag => Dimension::Tag,
            StatDimension::Language => Dimension::Language,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct StatArgs {
    /// Dimension to count
    #[arg(value_enum)]
    pub dimension: StatDimension,

    /// Restrict to one conference
    #[arg(long, value_name = "NAME")]
    pub conference: Option<String>,

    /// Restrict to one year
    #[arg(long)]
    pub year: Option<i32>,

    /// Reports file (overrides `store.reports_path`)
    #[arg(long, value_name = "FILE")]
    pub reports: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

impl StatArgs {
    pub async fn execute(self, settings: ServiceSettings) -> anyhow::Result<()> {
        let path = self
            .reports
            .or(settings.store.reports_path)
            .context("no reports file given; pass --reports or set store.reports_path")?;
        let store = load_store(&path).await?;

        let aggregator = HierarchicalAggregator::new(Arc::new(store), settings.stats);
        let extractor = aggregator.extractor_for(self.dimension.into());
        let query = StatsQuery::new(self.conference, self.year);
        debug!(?query, dimension = ?self.dimension, "Running offline aggregation");

        let result = aggregator.query(&query, extractor.as_ref()).await?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
            OutputFormat::Table => print!("{}", render_table(&result.into_entries())),
        }
        Ok(())
    }
}
