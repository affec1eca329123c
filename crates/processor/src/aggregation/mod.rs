//! Aggregation module for counting report categories
//!
//! Two layers:
//!
//! - [`FrequencyAggregator`]: counts the categories one extractor yields over
//!   a set of reports. [`count_categories`] folds a lookup stream into one.
//! - [`HierarchicalAggregator`]: routes reports from a lookup into nested
//!   conference/year groups, one frequency aggregator per innermost group.
//!
//! # Examples
//!
//! ## Counting a stream
//!
//! ```rust
//! use confeti_processor::aggregation::count_categories;
//! use confeti_processor::extractors::TagExtractor;
//! use confeti_types::Report;
//! use futures::stream;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let reports = stream::iter(vec![
//!     Ok(Report::new("a").with_tags(["rust"])),
//!     Ok(Report::new("b").with_tags(["rust", "wasm"])),
//! ]);
//! let counts = count_categories(reports, &TagExtractor).await?;
//! assert_eq!(counts["rust"], 2);
//! assert_eq!(counts["wasm"], 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Querying a store
//!
//! ```rust
//! use confeti_processor::aggregation::HierarchicalAggregator;
//! use confeti_processor::config::StatsConfig;
//! use confeti_processor::extractors::Dimension;
//! use confeti_processor::lookup::MemoryReportStore;
//! use confeti_types::Report;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let store = MemoryReportStore::from_reports(vec![
//!     Report::new("Async in depth").with_tags(["rust"]).with_conference("RustConf", 2023),
//! ]);
//! let aggregator = HierarchicalAggregator::new(Arc::new(store), StatsConfig::default());
//! let tags = aggregator.extractor_for(Dimension::Tag);
//!
//! let response = aggregator.exact("RustConf", 2023, tags.as_ref()).await?;
//! assert_eq!(response.count(2023, "rust"), Some(1));
//! # Ok(())
//! # }
//! ```

mod count;
mod hierarchy;

pub use count::{count_categories, count_frequencies, FrequencyAggregator};
pub use hierarchy::{AggregateResult, HierarchicalAggregator, StatsQuery};
