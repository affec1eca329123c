//! Generic reduction over precomputed statistics
//!
//! [`StatsReducer`] does not know what its items mean. Callers supply the
//! grouping key and the final shape; the reducer only owns collection,
//! grouping and the bounded fan-out of per-group work.

use crate::config::StatsConfig;
use crate::error::{BoxError, ConsistencyViolation, LookupResult, ProcessorError, Result};

use confeti_types::ReportStats;
use futures::future;
use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use tracing::{debug, instrument};

/// Items sharing one grouping key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<K, T> {
    pub key: K,
    pub items: Vec<T>,
}

impl<K, T> Group<K, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, T: ReportStats> Group<K, T> {
    /// Sum of the report totals in the group
    pub fn total(&self) -> u64 {
        self.items.iter().map(ReportStats::report_total).sum()
    }
}

/// Fold a stream into groups keyed by `key_fn`
///
/// Items keep their stream order inside a group.
pub async fn group_by<T, K, S, KF>(items: S, key_fn: KF) -> Result<HashMap<K, Vec<T>>>
where
    S: Stream<Item = LookupResult<T>>,
    K: Eq + Hash,
    KF: Fn(&T) -> K,
{
    items
        .map_err(ProcessorError::from)
        .try_fold(HashMap::<K, Vec<T>>::new(), |mut groups, item| {
            groups.entry(key_fn(&item)).or_default().push(item);
            future::ready(Ok(groups))
        })
        .await
}

/// Dimension-agnostic reducer over [`ReportStats`] streams
#[derive(Debug, Clone, Default)]
pub struct StatsReducer {
    config: StatsConfig,
}

impl StatsReducer {
    pub fn new(config: StatsConfig) -> Self {
        Self { config }
    }

    /// Collect every item, without grouping
    pub async fn collect_all<T, S>(&self, items: S) -> Result<Vec<T>>
    where
        S: Stream<Item = LookupResult<T>>,
    {
        let collected: Vec<T> = items.map_err(ProcessorError::from).try_collect().await?;
        debug!(items = collected.len(), "Collected statistics");
        Ok(collected)
    }

    /// Map each key to its item's report total, then transform the map
    ///
    /// Keys must be unique in the stream. A repeated key fails with
    /// [`ConsistencyViolation::DuplicateKey`]; totals are never summed.
    #[instrument(skip_all)]
    pub async fn reduce_by_key<T, K, R, E, S, KF, TF>(
        &self,
        items: S,
        key_fn: KF,
        transform: TF,
    ) -> Result<R>
    where
        T: ReportStats,
        K: Eq + Hash + Debug,
        E: Into<BoxError>,
        S: Stream<Item = LookupResult<T>>,
        KF: Fn(&T) -> K,
        TF: FnOnce(HashMap<K, u64>) -> std::result::Result<R, E>,
    {
        let totals = items
            .map_err(ProcessorError::from)
            .try_fold(HashMap::<K, u64>::new(), |mut totals, item| {
                let key = key_fn(&item);
                let outcome: Result<HashMap<K, u64>> = if totals.contains_key(&key) {
                    Err(ConsistencyViolation::DuplicateKey {
                        key: format!("{key:?}"),
                    }
                    .into())
                } else {
                    totals.insert(key, item.report_total());
                    Ok(totals)
                };
                future::ready(outcome)
            })
            .await?;

        debug!(keys = totals.len(), "Reduced statistics by key");
        transform(totals).map_err(ProcessorError::transform)
    }

    /// Group by key, reduce every group asynchronously, then transform each
    /// summary together with its key
    ///
    /// At most `max_concurrency` group reductions are in flight. The first
    /// failure cancels the remaining ones. Output order is unspecified.
    #[instrument(skip_all, fields(max_concurrency = self.config.max_concurrency))]
    pub async fn reduce_groups<T, K, S, KF, RF, Fut, M, E1, R, E2, TF>(
        &self,
        items: S,
        key_fn: KF,
        reducer: RF,
        transform: TF,
    ) -> Result<Vec<R>>
    where
        K: Eq + Hash + Clone,
        S: Stream<Item = LookupResult<T>>,
        KF: Fn(&T) -> K,
        RF: Fn(Group<K, T>) -> Fut,
        Fut: Future<Output = std::result::Result<M, E1>>,
        E1: Into<BoxError>,
        TF: Fn(M, K) -> std::result::Result<R, E2>,
        E2: Into<BoxError>,
    {
        let groups = group_by(items, key_fn).await?;
        debug!(groups = groups.len(), "Reducing statistic groups");

        let pending = groups.into_iter().map(|(key, items)| {
            let summary = reducer(Group {
                key: key.clone(),
                items,
            });
            async move {
                summary
                    .await
                    .map(|summary| (summary, key))
                    .map_err(ProcessorError::transform)
            }
        });

        stream::iter(pending)
            .buffer_unordered(self.config.max_concurrency.max(1))
            .and_then(|(summary, key)| {
                future::ready(transform(summary, key).map_err(ProcessorError::transform))
            })
            .try_collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LookupError;
    use confeti_types::{SpeakerConferenceTotal, SpeakerYearTotal};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn yearly(speaker_id: Uuid, year: i32, report_total: u64) -> LookupResult<SpeakerYearTotal> {
        Ok(SpeakerYearTotal {
            speaker_id,
            year,
            report_total,
        })
    }

    fn edition(
        speaker_id: Uuid,
        year: i32,
        report_total: u64,
    ) -> LookupResult<SpeakerConferenceTotal> {
        Ok(SpeakerConferenceTotal {
            speaker_id,
            conference_name: "Joker".to_string(),
            year,
            report_total,
        })
    }

    #[tokio::test]
    async fn test_collect_all() {
        let speaker = Uuid::new_v4();
        let reducer = StatsReducer::default();

        let items = reducer
            .collect_all(stream::iter(vec![yearly(speaker, 2020, 1), yearly(speaker, 2021, 2)]))
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        let empty: Vec<SpeakerYearTotal> = reducer.collect_all(stream::iter(vec![])).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_reduce_by_key() {
        let speaker = Uuid::new_v4();
        let reducer = StatsReducer::default();

        let years = reducer
            .reduce_by_key(
                stream::iter(vec![yearly(speaker, 2020, 3), yearly(speaker, 2021, 1)]),
                |item| item.year,
                |totals| Ok::<_, BoxError>(totals),
            )
            .await
            .unwrap();

        assert_eq!(years.len(), 2);
        assert_eq!(years[&2020], 3);
        assert_eq!(years[&2021], 1);
    }

    #[tokio::test]
    async fn test_reduce_by_key_duplicate() {
        let speaker = Uuid::new_v4();
        let reducer = StatsReducer::default();

        let err = reducer
            .reduce_by_key(
                stream::iter(vec![yearly(speaker, 2020, 3), yearly(speaker, 2020, 1)]),
                |item| item.year,
                |totals| Ok::<_, BoxError>(totals),
            )
            .await
            .unwrap_err();

        match err {
            ProcessorError::Consistency(ConsistencyViolation::DuplicateKey { key }) => {
                assert_eq!(key, "2020");
            }
            other => panic!("Expected DuplicateKey, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reduce_by_key_transform_failure() {
        let speaker = Uuid::new_v4();
        let err = StatsReducer::default()
            .reduce_by_key(
                stream::iter(vec![yearly(speaker, 2020, 3)]),
                |item| item.year,
                |_| Err::<(), _>("no such speaker"),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "transform_error");
        assert!(err.to_string().contains("no such speaker"));
    }

    #[tokio::test]
    async fn test_reduce_groups() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let items = stream::iter(vec![
            edition(alice, 2020, 2),
            edition(bob, 2020, 1),
            edition(alice, 2021, 1),
        ]);

        let mut totals = StatsReducer::default()
            .reduce_groups(
                items,
                |item| item.speaker_id,
                |group| async move { Ok::<_, BoxError>(group.total()) },
                |total, speaker| Ok::<_, BoxError>((speaker, total)),
            )
            .await
            .unwrap();
        totals.sort_by_key(|(_, total)| *total);

        assert_eq!(totals, vec![(bob, 1), (alice, 3)]);
    }

    #[tokio::test]
    async fn test_reduce_groups_reducer_failure() {
        let speaker = Uuid::new_v4();
        let err = StatsReducer::default()
            .reduce_groups(
                stream::iter(vec![edition(speaker, 2020, 1)]),
                |item| item.speaker_id,
                |_group| async move { Err::<u64, _>("speaker service timed out") },
                |total, _| Ok::<_, BoxError>(total),
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("speaker service timed out"));
    }

    #[tokio::test]
    async fn test_reduce_groups_lookup_failure() {
        let items = stream::iter(vec![
            edition(Uuid::new_v4(), 2020, 1),
            Err(LookupError::Unavailable {
                backend: "memory".to_string(),
                details: "closed".to_string(),
            }),
        ]);
        let err = StatsReducer::default()
            .reduce_groups(
                items,
                |item| item.speaker_id,
                |group| async move { Ok::<_, BoxError>(group.total()) },
                |total, _| Ok::<_, BoxError>(total),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ProcessorError::Lookup(_)));
    }

    #[tokio::test]
    async fn test_reduce_groups_respects_concurrency_bound() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let reducer = StatsReducer::new(StatsConfig::default().with_max_concurrency(2));

        let items = stream::iter((0..8).map(|_| edition(Uuid::new_v4(), 2020, 1)));
        let results = reducer
            .reduce_groups(
                items,
                |item| item.speaker_id,
                |group| {
                    let in_flight = Arc::clone(&in_flight);
                    let peak = Arc::clone(&peak);
                    async move {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(5)).await;
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                        Ok::<_, BoxError>(group.total())
                    }
                },
                |total, _| Ok::<_, BoxError>(total),
            )
            .await
            .unwrap();

        assert_eq!(results.len(), 8);
        let peak = peak.load(Ordering::SeqCst);
        assert!((1..=2).contains(&peak), "peak concurrency was {peak}");
    }

    #[tokio::test]
    async fn test_group_total_and_len() {
        let speaker = Uuid::new_v4();
        let groups = group_by(
            stream::iter(vec![edition(speaker, 2020, 2), edition(speaker, 2021, 5)]),
            |item| item.speaker_id,
        )
        .await
        .unwrap();

        let group = Group {
            key: speaker,
            items: groups[&speaker].clone(),
        };
        assert_eq!(group.len(), 2);
        assert!(!group.is_empty());
        assert_eq!(group.total(), 7);
    }
}
