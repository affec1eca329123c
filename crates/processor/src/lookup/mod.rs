//! Report lookup collaborators
//!
//! The statistics engine never owns report storage. It pulls report streams
//! from a [`ReportLookup`] and precomputed speaker totals from a
//! [`SpeakerStatsLookup`]. Streams may fail up front or mid-way; either
//! failure is terminal for the request.
//!
//! [`MemoryReportStore`] implements both traits over a concurrent map and is
//! used by the service binary and the tests.

mod memory;

pub use memory::{MemoryReportStore, MemoryStoreStats};

use crate::error::LookupResult;
use async_trait::async_trait;
use confeti_types::{Report, SpeakerConferenceTotal, SpeakerYearTotal};
use futures::stream::BoxStream;
use uuid::Uuid;

/// Asynchronous sequence of reports
pub type ReportStream = BoxStream<'static, LookupResult<Report>>;

/// Asynchronous sequence of precomputed statistics
pub type StatsStream<T> = BoxStream<'static, LookupResult<T>>;

/// Source of report records
///
/// Conference-scoped lookups hand out reports whose occurrence set holds only
/// the occurrence matching the scope. A report presented at the same
/// conference in several years is returned once per year.
#[async_trait]
pub trait ReportLookup: Send + Sync {
    /// Reports presented at one conference edition
    async fn find_by_conference_and_year(
        &self,
        conference_name: &str,
        year: i32,
    ) -> LookupResult<ReportStream>;

    /// Reports presented at a conference, in any year
    async fn find_by_conference(&self, conference_name: &str) -> LookupResult<ReportStream>;

    /// Every report, with all of its occurrences
    async fn find_all(&self) -> LookupResult<ReportStream>;
}

/// Filter for speaker totals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerStatsFilter {
    pub conference_name: Option<String>,
    pub year: Option<i32>,
}

impl SpeakerStatsFilter {
    pub fn new(conference_name: Option<String>, year: Option<i32>) -> Self {
        Self {
            conference_name,
            year,
        }
    }

    /// Whether an occurrence passes the filter
    pub fn matches(&self, conference_name: &str, year: i32) -> bool {
        self.conference_name
            .as_deref()
            .map_or(true, |name| name == conference_name)
            && self.year.map_or(true, |y| y == year)
    }
}

/// Source of precomputed per-speaker report totals
#[async_trait]
pub trait SpeakerStatsLookup: Send + Sync {
    /// One total per (speaker, conference, year) passing the filter
    async fn find_speaker_totals(
        &self,
        filter: &SpeakerStatsFilter,
    ) -> LookupResult<StatsStream<SpeakerConferenceTotal>>;

    /// One total per year the speaker presented in
    async fn find_yearly_totals(
        &self,
        speaker_id: Uuid,
    ) -> LookupResult<StatsStream<SpeakerYearTotal>>;
}
