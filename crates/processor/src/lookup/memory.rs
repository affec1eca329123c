//! In-memory report store
//!
//! Reports live in a DashMap keyed by report id. Every lookup snapshots the
//! matching records before handing out a stream, so no map shard lock is held
//! while a consumer awaits.

use async_trait::async_trait;
use dashmap::DashMap;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};
use uuid::Uuid;

use super::{ReportLookup, ReportStream, SpeakerStatsFilter, SpeakerStatsLookup, StatsStream};
use crate::error::{LookupError, LookupResult};
use confeti_types::{Report, SpeakerConferenceTotal, SpeakerYearTotal};

const BACKEND: &str = "memory report store";

/// Statistics about store usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStoreStats {
    /// Number of lookups served
    pub lookups: u64,
    /// Number of records handed out across all lookups
    pub records_served: u64,
}

/// In-memory report store using DashMap
///
/// ## Example
///
/// ```rust
/// use confeti_processor::lookup::{MemoryReportStore, ReportLookup};
/// use confeti_types::Report;
/// use futures::TryStreamExt;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let store = MemoryReportStore::new();
/// store.insert(Report::new("Loom").with_conference("JPoint", 2023));
///
/// let reports: Vec<Report> = store.find_by_conference("JPoint").await?.try_collect().await?;
/// assert_eq!(reports.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct MemoryReportStore {
    reports: Arc<DashMap<Uuid, Report>>,
    closed: Arc<AtomicBool>,
    stats: Arc<RwLock<MemoryStoreStats>>,
}

impl MemoryReportStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with reports
    pub fn from_reports<I>(reports: I) -> Self
    where
        I: IntoIterator<Item = Report>,
    {
        let store = Self::new();
        for report in reports {
            store.insert(report);
        }
        store
    }

    /// Load a store from a JSON array of reports
    pub async fn load_json_file(path: impl AsRef<Path>) -> LookupResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let reports: Vec<Report> = serde_json::from_slice(&bytes)?;
        let store = Self::from_reports(reports);

        info!(path = %path.display(), reports = store.len(), "Loaded report store");
        Ok(store)
    }

    /// Insert or replace a report
    pub fn insert(&self, report: Report) {
        trace!(report_id = %report.id, "Inserting report");
        self.reports.insert(report.id, report);
    }

    /// Number of stored reports
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Mark the store unavailable; subsequent lookups fail
    pub fn close(&self) {
        debug!("Closing report store");
        self.closed.store(true, Ordering::SeqCst);
    }

    /// Get current statistics
    pub async fn stats(&self) -> MemoryStoreStats {
        self.stats.read().await.clone()
    }

    fn ensure_open(&self) -> LookupResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LookupError::Unavailable {
                backend: BACKEND.to_string(),
                details: "store is closed".to_string(),
            });
        }
        Ok(())
    }

    fn validate_name(conference_name: &str) -> LookupResult<()> {
        if conference_name.trim().is_empty() {
            return Err(LookupError::MalformedQuery {
                reason: "conference name must not be blank".to_string(),
            });
        }
        Ok(())
    }

    /// Copy out every report occurrence selected by `keep`, one scoped
    /// report per matching occurrence
    fn snapshot_scoped<F>(&self, keep: F) -> Vec<Report>
    where
        F: Fn(&str, i32) -> bool,
    {
        self.reports
            .iter()
            .flat_map(|entry| {
                let report = entry.value();
                report
                    .conferences
                    .iter()
                    .filter(|c| keep(&c.name, c.year))
                    .map(|c| report.scoped(|other| other == c))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    async fn serve<T: Send + 'static>(&self, records: Vec<T>) -> StatsStream<T> {
        let mut stats = self.stats.write().await;
        stats.lookups += 1;
        stats.records_served += records.len() as u64;

        stream::iter(records.into_iter().map(Ok)).boxed()
    }
}

#[async_trait]
impl ReportLookup for MemoryReportStore {
    async fn find_by_conference_and_year(
        &self,
        conference_name: &str,
        year: i32,
    ) -> LookupResult<ReportStream> {
        self.ensure_open()?;
        Self::validate_name(conference_name)?;

        let reports = self.snapshot_scoped(|name, y| name == conference_name && y == year);
        debug!(conference = conference_name, year, reports = reports.len(), "Edition lookup");
        Ok(self.serve(reports).await)
    }

    async fn find_by_conference(&self, conference_name: &str) -> LookupResult<ReportStream> {
        self.ensure_open()?;
        Self::validate_name(conference_name)?;

        let reports = self.snapshot_scoped(|name, _| name == conference_name);
        debug!(conference = conference_name, reports = reports.len(), "Conference lookup");
        Ok(self.serve(reports).await)
    }

    async fn find_all(&self) -> LookupResult<ReportStream> {
        self.ensure_open()?;

        let reports: Vec<Report> = self.reports.iter().map(|e| e.value().clone()).collect();
        debug!(reports = reports.len(), "Full lookup");
        Ok(self.serve(reports).await)
    }
}

#[async_trait]
impl SpeakerStatsLookup for MemoryReportStore {
    async fn find_speaker_totals(
        &self,
        filter: &SpeakerStatsFilter,
    ) -> LookupResult<StatsStream<SpeakerConferenceTotal>> {
        self.ensure_open()?;

        let mut totals: HashMap<(Uuid, String, i32), u64> = HashMap::new();
        for entry in self.reports.iter() {
            let report = entry.value();
            for conference in &report.conferences {
                if !filter.matches(&conference.name, conference.year) {
                    continue;
                }
                for speaker_id in &report.speakers {
                    *totals
                        .entry((*speaker_id, conference.name.clone(), conference.year))
                        .or_insert(0) += 1;
                }
            }
        }

        let records: Vec<SpeakerConferenceTotal> = totals
            .into_iter()
            .map(|((speaker_id, conference_name, year), report_total)| SpeakerConferenceTotal {
                speaker_id,
                conference_name,
                year,
                report_total,
            })
            .collect();

        debug!(?filter, records = records.len(), "Speaker totals lookup");
        Ok(self.serve(records).await)
    }

    async fn find_yearly_totals(
        &self,
        speaker_id: Uuid,
    ) -> LookupResult<StatsStream<SpeakerYearTotal>> {
        self.ensure_open()?;

        // A talk repeated at two conferences in the same year counts once.
        let mut totals: HashMap<i32, u64> = HashMap::new();
        for entry in self.reports.iter() {
            let report = entry.value();
            if !report.speakers.contains(&speaker_id) {
                continue;
            }
            let years: HashSet<i32> = report.conferences.iter().map(|c| c.year).collect();
            for year in years {
                *totals.entry(year).or_insert(0) += 1;
            }
        }

        let records: Vec<SpeakerYearTotal> = totals
            .into_iter()
            .map(|(year, report_total)| SpeakerYearTotal {
                speaker_id,
                year,
                report_total,
            })
            .collect();

        debug!(%speaker_id, years = records.len(), "Yearly totals lookup");
        Ok(self.serve(records).await)
    }
}
