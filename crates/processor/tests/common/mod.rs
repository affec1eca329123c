//! Shared fixtures for processor integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use confeti_processor::error::{LookupError, LookupResult};
use confeti_processor::lookup::{MemoryReportStore, ReportLookup, ReportStream};
use confeti_types::Report;
use futures::stream::{self, StreamExt};

/// Reports `[{a,b}@(X,2023), {a}@(X,2023), {c}@(X,2024)]`
pub fn scenario_reports() -> Vec<Report> {
    vec![
        Report::new("r1").with_tags(["a", "b"]).with_conference("X", 2023),
        Report::new("r2").with_tags(["a"]).with_conference("X", 2023),
        Report::new("r3").with_tags(["c"]).with_conference("X", 2024),
    ]
}

pub fn scenario_store() -> MemoryReportStore {
    MemoryReportStore::from_reports(scenario_reports())
}

/// Where a [`FailingLookup`] fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Every lookup call is rejected before a stream exists
    Upfront,
    /// Streams yield `healthy` reports, then an error
    MidStream { healthy: usize },
}

/// Report lookup that fails on demand
pub struct FailingLookup {
    reports: Vec<Report>,
    mode: FailureMode,
}

impl FailingLookup {
    pub fn new(reports: Vec<Report>, mode: FailureMode) -> Self {
        Self { reports, mode }
    }

    fn stream(&self, keep: impl Fn(&Report) -> bool) -> LookupResult<ReportStream> {
        match self.mode {
            FailureMode::Upfront => Err(unavailable()),
            FailureMode::MidStream { healthy } => {
                let served: Vec<LookupResult<Report>> = self
                    .reports
                    .iter()
                    .filter(|r| keep(*r))
                    .take(healthy)
                    .cloned()
                    .map(Ok)
                    .chain(std::iter::once(Err(unavailable())))
                    .collect();
                Ok(stream::iter(served).boxed())
            }
        }
    }
}

fn unavailable() -> LookupError {
    LookupError::Unavailable {
        backend: "failing lookup".to_string(),
        details: "connection reset by peer".to_string(),
    }
}

#[async_trait]
impl ReportLookup for FailingLookup {
    async fn find_by_conference_and_year(
        &self,
        conference_name: &str,
        year: i32,
    ) -> LookupResult<ReportStream> {
        self.stream(|r| r.presented_at_edition(conference_name, year))
    }

    async fn find_by_conference(&self, conference_name: &str) -> LookupResult<ReportStream> {
        self.stream(|r| r.presented_at(conference_name))
    }

    async fn find_all(&self) -> LookupResult<ReportStream> {
        self.stream(|_| true)
    }
}

/// Lookup returning fixed streams verbatim, without scoping occurrences
pub struct RawLookup {
    reports: Vec<Report>,
}

impl RawLookup {
    pub fn new(reports: Vec<Report>) -> Self {
        Self { reports }
    }

    fn stream(&self) -> LookupResult<ReportStream> {
        let served: Vec<LookupResult<Report>> = self.reports.iter().cloned().map(Ok).collect();
        Ok(stream::iter(served).boxed())
    }
}

#[async_trait]
impl ReportLookup for RawLookup {
    async fn find_by_conference_and_year(&self, _: &str, _: i32) -> LookupResult<ReportStream> {
        self.stream()
    }

    async fn find_by_conference(&self, _: &str) -> LookupResult<ReportStream> {
        self.stream()
    }

    async fn find_all(&self) -> LookupResult<ReportStream> {
        self.stream()
    }
}
