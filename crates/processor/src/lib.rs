//! Statistics engine for conference reports
//!
//! This crate turns streams of report records into frequency tables grouped
//! by conference and year, and reduces precomputed speaker totals into
//! caller-defined shapes.

pub mod aggregation;
pub mod config;
pub mod error;
pub mod extractors;
pub mod lookup;
pub mod reducer;

// Re-export commonly used types
pub use aggregation::{
    count_categories, count_frequencies, AggregateResult, FrequencyAggregator,
    HierarchicalAggregator, StatsQuery,
};

pub use config::{MissingLanguagePolicy, StatsConfig};

pub use error::{
    AggregationError, BoxError, ConsistencyViolation, LookupError, LookupResult, ProcessorError,
    Result as ProcessorResult,
};

pub use extractors::{CategoryExtractor, Dimension, FnExtractor, LanguageExtractor, TagExtractor};

pub use lookup::{
    MemoryReportStore, MemoryStoreStats, ReportLookup, ReportStream, SpeakerStatsFilter,
    SpeakerStatsLookup, StatsStream,
};

pub use reducer::{group_by, Group, StatsReducer};
