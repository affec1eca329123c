//! Error types for the statistics processor
//!
//! Every failure aborts the whole request: the processor never returns a
//! partially aggregated result.

use thiserror::Error;
use uuid::Uuid;

/// Boxed error used for caller-supplied reducers and transforms
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Main processor error type
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// The report-lookup collaborator failed
    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    /// An internal contract was violated
    #[error("consistency violation: {0}")]
    Consistency(#[from] ConsistencyViolation),

    /// Counting failed
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// A caller-supplied reducer or transform failed
    #[error("transform error: {source}")]
    Transform { source: BoxError },

    /// Configuration errors
    #[error("configuration error: {source}")]
    Configuration { source: BoxError },
}

impl ProcessorError {
    /// Wrap a caller error raised by a reducer or transform
    pub fn transform(source: impl Into<BoxError>) -> Self {
        ProcessorError::Transform {
            source: source.into(),
        }
    }

    /// Short stable label for the error family
    pub fn kind(&self) -> &'static str {
        match self {
            ProcessorError::Lookup(_) => "lookup_error",
            ProcessorError::Consistency(_) => "consistency_violation",
            ProcessorError::Aggregation(_) => "aggregation_error",
            ProcessorError::Transform { .. } => "transform_error",
            ProcessorError::Configuration { .. } => "configuration_error",
        }
    }
}

/// Failures of the report-lookup collaborator
#[derive(Error, Debug)]
pub enum LookupError {
    /// Backing store unreachable
    #[error("{backend} unavailable: {details}")]
    Unavailable { backend: String, details: String },

    /// The query could not be executed as given
    #[error("malformed query: {reason}")]
    MalformedQuery { reason: String },

    /// Reading the backing file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored record could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Programming-contract failures detected while aggregating
#[derive(Error, Debug)]
pub enum ConsistencyViolation {
    /// An extractor produced an absent category value
    #[error("extractor '{extractor}' produced an absent category for report {report_id}")]
    MissingCategory { extractor: String, report_id: Uuid },

    /// A conference-scoped report does not carry exactly the scoped occurrence
    #[error("report {report_id} in scope '{conference}' carries {occurrences} conference occurrence(s), expected exactly one for that conference")]
    OccurrenceScope {
        report_id: Uuid,
        conference: String,
        occurrences: usize,
    },

    /// A key appeared more than once in a collect-to-map reduction
    #[error("duplicate key {key} in keyed reduction")]
    DuplicateKey { key: String },
}

/// Counting failures
#[derive(Error, Debug)]
pub enum AggregationError {
    /// A counter exceeded u64
    #[error("count overflow for category '{category}'")]
    CountOverflow { category: String },
}

/// Result type alias for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;

/// Result type alias for lookup operations
pub type LookupResult<T> = std::result::Result<T, LookupError>;
