use crate::error::{AggregationError, ConsistencyViolation, LookupResult, ProcessorError, Result};
use crate::extractors::CategoryExtractor;

use confeti_types::{CategoryCounts, Report};
use futures::future;
use futures::{Stream, TryStreamExt};
use std::fmt;

/// Frequency aggregator - counts category occurrences across reports
///
/// Each (report, category) pair adds one to that category, so a report with
/// two tags contributes to two counts. A report whose extraction is empty is
/// still recorded in [`FrequencyAggregator::reports_seen`] but adds no count.
///
/// # Examples
///
/// ```
/// use confeti_processor::aggregation::FrequencyAggregator;
/// use confeti_processor::extractors::TagExtractor;
/// use confeti_types::Report;
///
/// let mut agg = FrequencyAggregator::new(&TagExtractor);
/// agg.observe(&Report::new("a").with_tags(["rust", "async"])).unwrap();
/// agg.observe(&Report::new("b").with_tags(["rust"])).unwrap();
///
/// let counts = agg.into_counts();
/// assert_eq!(counts["rust"], 2);
/// assert_eq!(counts["async"], 1);
/// ```
pub struct FrequencyAggregator<'e> {
    extractor: &'e dyn CategoryExtractor,
    reports: u64,
    counts: CategoryCounts,
}

impl<'e> FrequencyAggregator<'e> {
    /// Create a new frequency aggregator driven by `extractor`
    pub fn new(extractor: &'e dyn CategoryExtractor) -> Self {
        Self {
            extractor,
            reports: 0,
            counts: CategoryCounts::new(),
        }
    }

    /// Fold one report into the counts
    pub fn observe(&mut self, report: &Report) -> Result<()> {
        self.reports += 1;
        for category in self.extractor.extract(report) {
            let category = category.ok_or_else(|| ConsistencyViolation::MissingCategory {
                extractor: self.extractor.name().to_string(),
                report_id: report.id,
            })?;
            self.increment(category)?;
        }
        Ok(())
    }

    /// Number of reports folded in, including ones without categories
    pub fn reports_seen(&self) -> u64 {
        self.reports
    }

    /// Total number of (report, category) pairs counted
    pub fn occurrences(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Consume the aggregator and return its counts
    pub fn into_counts(self) -> CategoryCounts {
        self.counts
    }

    fn increment(&mut self, category: String) -> Result<()> {
        match self.counts.get_mut(&category) {
            Some(count) => {
                *count = count
                    .checked_add(1)
                    .ok_or(AggregationError::CountOverflow { category })?;
            }
            None => {
                self.counts.insert(category, 1);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for FrequencyAggregator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyAggregator")
            .field("extractor", &self.extractor.name())
            .field("reports", &self.reports)
            .field("categories", &self.counts.len())
            .finish()
    }
}

/// Fold a report stream into `state` one report at a time
///
/// Every counting path goes through here, whether it keeps one aggregator or
/// routes reports into keyed groups of them. The first lookup error or
/// failing `step` aborts the fold.
pub(crate) async fn fold_reports<S, A, F>(reports: S, state: A, mut step: F) -> Result<A>
where
    S: Stream<Item = LookupResult<Report>>,
    F: FnMut(&mut A, &Report) -> Result<()>,
{
    reports
        .map_err(ProcessorError::from)
        .try_fold(state, |mut state, report| {
            future::ready(step(&mut state, &report).map(|()| state))
        })
        .await
}

/// Count categories over a report stream, keeping the report tally
pub async fn count_frequencies<'e, S>(
    reports: S,
    extractor: &'e dyn CategoryExtractor,
) -> Result<FrequencyAggregator<'e>>
where
    S: Stream<Item = LookupResult<Report>>,
{
    fold_reports(reports, FrequencyAggregator::new(extractor), |agg, report| {
        agg.observe(report)
    })
    .await
}

/// Count categories over a report stream
///
/// The stream is folded as it arrives; reports are never buffered. The first
/// lookup or consistency error aborts the count.
pub async fn count_categories<S>(
    reports: S,
    extractor: &dyn CategoryExtractor,
) -> Result<CategoryCounts>
where
    S: Stream<Item = LookupResult<Report>>,
{
    Ok(count_frequencies(reports, extractor).await?.into_counts())
}
