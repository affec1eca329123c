//! Nested frequency tables over conference and year
//!
//! Each query shape is one pass over the lookup stream. A report is routed to
//! the group(s) named by the dimensions the query leaves unbound and folded
//! into that group's [`FrequencyAggregator`]. A group exists only once a
//! report lands in it, so empty (conference, year) combinations never appear
//! in the output.

use super::count::{count_frequencies, fold_reports, FrequencyAggregator};
use crate::config::StatsConfig;
use crate::error::{ConsistencyViolation, Result};
use crate::extractors::{CategoryExtractor, Dimension};
use crate::lookup::ReportLookup;

use confeti_types::{Report, ReportResponse, YearlyCounts};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Dimensions bound by a statistics query
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    pub conference_name: Option<String>,
    pub year: Option<i32>,
}

impl StatsQuery {
    pub fn new(conference_name: Option<String>, year: Option<i32>) -> Self {
        Self {
            conference_name,
            year,
        }
    }
}

/// Result of a statistics query
///
/// Conference-bound queries yield a single entry; unbound queries yield one
/// entry per conference, in no particular order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregateResult {
    Conference(ReportResponse),
    Global(Vec<ReportResponse>),
}

impl AggregateResult {
    /// Flatten into conference entries
    pub fn into_entries(self) -> Vec<ReportResponse> {
        match self {
            AggregateResult::Conference(response) => vec![response],
            AggregateResult::Global(responses) => responses,
        }
    }
}

/// Builds nested frequency tables from a [`ReportLookup`]
pub struct HierarchicalAggregator<L: ?Sized> {
    lookup: Arc<L>,
    config: StatsConfig,
}

impl<L: ?Sized> Clone for HierarchicalAggregator<L> {
    fn clone(&self) -> Self {
        Self {
            lookup: Arc::clone(&self.lookup),
            config: self.config.clone(),
        }
    }
}

impl<L> HierarchicalAggregator<L>
where
    L: ReportLookup + ?Sized,
{
    pub fn new(lookup: Arc<L>, config: StatsConfig) -> Self {
        Self { lookup, config }
    }

    /// Extractor for a dimension, honouring the configured policies
    pub fn extractor_for(&self, dimension: Dimension) -> Box<dyn CategoryExtractor> {
        dimension.extractor(&self.config.missing_language)
    }

    /// Dispatch a query to the shape matching its bound dimensions
    pub async fn query(
        &self,
        query: &StatsQuery,
        extractor: &dyn CategoryExtractor,
    ) -> Result<AggregateResult> {
        match (&query.conference_name, query.year) {
            (Some(conference), Some(year)) => self
                .exact(conference, year, extractor)
                .await
                .map(AggregateResult::Conference),
            (Some(conference), None) => self
                .by_conference(conference, extractor)
                .await
                .map(AggregateResult::Conference),
            (None, year) => self.global(year, extractor).await.map(AggregateResult::Global),
        }
    }

    /// Counts for one conference edition
    ///
    /// An edition without reports yields an empty `data` table.
    #[instrument(skip(self, extractor), fields(extractor = extractor.name()))]
    pub async fn exact(
        &self,
        conference_name: &str,
        year: i32,
        extractor: &dyn CategoryExtractor,
    ) -> Result<ReportResponse> {
        let reports = self
            .lookup
            .find_by_conference_and_year(conference_name, year)
            .await?;

        let group = count_frequencies(reports, extractor).await?;

        let mut response = ReportResponse::empty(conference_name);
        if group.reports_seen() > 0 {
            debug!(reports = group.reports_seen(), "Counted conference edition");
            response.data.insert(year, group.into_counts());
        }
        Ok(response)
    }

    /// Counts for every year of one conference
    ///
    /// Every report in the stream must carry exactly one occurrence, of this
    /// conference; anything else fails with
    /// [`ConsistencyViolation::OccurrenceScope`].
    #[instrument(skip(self, extractor), fields(extractor = extractor.name()))]
    pub async fn by_conference(
        &self,
        conference_name: &str,
        extractor: &dyn CategoryExtractor,
    ) -> Result<ReportResponse> {
        let reports = self.lookup.find_by_conference(conference_name).await?;

        let groups = fold_reports(
            reports,
            HashMap::<i32, FrequencyAggregator<'_>>::new(),
            |groups, report| {
                let year = scoped_year(report, conference_name)?;
                groups
                    .entry(year)
                    .or_insert_with(|| FrequencyAggregator::new(extractor))
                    .observe(report)
            },
        )
        .await?;

        debug!(years = groups.len(), "Counted conference");
        Ok(ReportResponse::new(conference_name, finish_years(groups)))
    }

    /// Counts for every conference, optionally restricted to one year
    ///
    /// A report presented at several conferences is counted under each of
    /// them.
    #[instrument(skip(self, extractor), fields(extractor = extractor.name()))]
    pub async fn global(
        &self,
        year: Option<i32>,
        extractor: &dyn CategoryExtractor,
    ) -> Result<Vec<ReportResponse>> {
        let reports = self.lookup.find_all().await?;

        let groups = fold_reports(
            reports,
            HashMap::<String, HashMap<i32, FrequencyAggregator<'_>>>::new(),
            |groups, report| {
                let occurrences = report
                    .conferences
                    .iter()
                    .filter(|c| year.map_or(true, |y| c.year == y));
                for conference in occurrences {
                    groups
                        .entry(conference.name.clone())
                        .or_default()
                        .entry(conference.year)
                        .or_insert_with(|| FrequencyAggregator::new(extractor))
                        .observe(report)?;
                }
                Ok(())
            },
        )
        .await?;

        debug!(conferences = groups.len(), "Counted all conferences");
        Ok(groups
            .into_iter()
            .map(|(conference, years)| ReportResponse::new(conference, finish_years(years)))
            .collect())
    }
}

/// Year of the single occurrence a conference-scoped report must carry
fn scoped_year(report: &Report, conference_name: &str) -> Result<i32> {
    match report.single_conference() {
        Some(conference) if conference.name == conference_name => Ok(conference.year),
        _ => Err(ConsistencyViolation::OccurrenceScope {
            report_id: report.id,
            conference: conference_name.to_string(),
            occurrences: report.conferences.len(),
        }
        .into()),
    }
}

fn finish_years(groups: HashMap<i32, FrequencyAggregator<'_>>) -> YearlyCounts {
    groups
        .into_iter()
        .map(|(year, group)| (year, group.into_counts()))
        .collect()
}
