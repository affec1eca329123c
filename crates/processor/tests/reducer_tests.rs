//! Stats reducer driven by the in-memory speaker totals
//!
//! These tests build the same shapes the speaker endpoints serve:
//! per-speaker yearly maps from both the keyed and the grouped reductions.

use confeti_processor::config::StatsConfig;
use confeti_processor::error::{BoxError, ProcessorError};
use confeti_processor::lookup::{MemoryReportStore, SpeakerStatsFilter, SpeakerStatsLookup};
use confeti_processor::reducer::{Group, StatsReducer};
use confeti_types::{Report, SpeakerConferenceTotal, SpeakerStatResponseByYear};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

struct Fixture {
    store: MemoryReportStore,
    alice: Uuid,
    bob: Uuid,
}

fn fixture() -> Fixture {
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    let store = MemoryReportStore::from_reports(vec![
        Report::new("Loom")
            .with_conference("Joker", 2022)
            .with_conference("JPoint", 2022)
            .with_speaker(alice),
        Report::new("Valhalla").with_conference("Joker", 2023).with_speaker(alice),
        Report::new("GraalVM")
            .with_conference("Joker", 2023)
            .with_speaker(alice)
            .with_speaker(bob),
        Report::new("Kotlin").with_conference("JPoint", 2023).with_speaker(bob),
    ]);
    Fixture { store, alice, bob }
}

/// Sum a speaker's per-edition totals into a per-year map
async fn years_of(
    group: Group<Uuid, SpeakerConferenceTotal>,
) -> Result<HashMap<i32, u64>, BoxError> {
    let mut years = HashMap::new();
    for item in group.items {
        *years.entry(item.year).or_insert(0) += item.report_total;
    }
    Ok(years)
}

#[tokio::test]
async fn yearly_totals_by_key_for_one_speaker() {
    let Fixture { store, alice, .. } = fixture();
    let reducer = StatsReducer::default();

    let response = reducer
        .reduce_by_key(
            store.find_yearly_totals(alice).await.unwrap(),
            |item| item.year,
            |years| Ok::<_, BoxError>(SpeakerStatResponseByYear::new(alice, years)),
        )
        .await
        .unwrap();

    assert_eq!(response.id, alice);
    assert_eq!(response.years[&2022], 1);
    assert_eq!(response.years[&2023], 2);
}

#[tokio::test]
async fn unknown_speaker_has_no_years() {
    let Fixture { store, .. } = fixture();
    let stranger = Uuid::new_v4();

    let response = StatsReducer::default()
        .reduce_by_key(
            store.find_yearly_totals(stranger).await.unwrap(),
            |item| item.year,
            |years| Ok::<_, BoxError>(SpeakerStatResponseByYear::new(stranger, years)),
        )
        .await
        .unwrap();

    assert!(response.years.is_empty());
}

#[tokio::test]
async fn grouped_totals_per_speaker() {
    let Fixture { store, alice, bob } = fixture();
    let reducer = StatsReducer::new(StatsConfig::default().with_max_concurrency(1));

    let responses = reducer
        .reduce_groups(
            store
                .find_speaker_totals(&SpeakerStatsFilter::default())
                .await
                .unwrap(),
            |item| item.speaker_id,
            years_of,
            |years, id| Ok::<_, BoxError>(SpeakerStatResponseByYear::new(id, years)),
        )
        .await
        .unwrap();

    let by_id: HashMap<Uuid, HashMap<i32, u64>> =
        responses.into_iter().map(|r| (r.id, r.years)).collect();

    assert_eq!(by_id.len(), 2);
    // Loom counts once for Joker and once for JPoint in 2022.
    assert_eq!(by_id[&alice][&2022], 2);
    assert_eq!(by_id[&alice][&2023], 2);
    assert_eq!(by_id[&bob][&2023], 2);
    assert!(!by_id[&bob].contains_key(&2022));
}

#[tokio::test]
async fn grouped_totals_respect_filter() {
    let Fixture { store, alice, bob } = fixture();
    let filter = SpeakerStatsFilter::new(Some("Joker".to_string()), Some(2023));

    let responses = StatsReducer::default()
        .reduce_groups(
            store.find_speaker_totals(&filter).await.unwrap(),
            |item| item.speaker_id,
            years_of,
            |years, id| Ok::<_, BoxError>(SpeakerStatResponseByYear::new(id, years)),
        )
        .await
        .unwrap();

    let by_id: HashMap<Uuid, HashMap<i32, u64>> =
        responses.into_iter().map(|r| (r.id, r.years)).collect();
    assert_eq!(by_id[&alice], HashMap::from([(2023, 2)]));
    assert_eq!(by_id[&bob], HashMap::from([(2023, 1)]));
}

#[tokio::test]
async fn collect_all_returns_flat_entries() {
    let Fixture { store, .. } = fixture();
    let filter = SpeakerStatsFilter::new(Some("JPoint".to_string()), None);

    let mut entries = StatsReducer::default()
        .collect_all(store.find_speaker_totals(&filter).await.unwrap())
        .await
        .unwrap();
    entries.sort_by_key(|e| e.year);

    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.conference_name == "JPoint"));
    assert_eq!(entries[0].year, 2022);
    assert_eq!(entries[1].year, 2023);
}

#[tokio::test]
async fn transform_failure_aborts_grouped_reduction() {
    let Fixture { store, alice, .. } = fixture();

    let err = StatsReducer::default()
        .reduce_groups(
            store
                .find_speaker_totals(&SpeakerStatsFilter::default())
                .await
                .unwrap(),
            |item| item.speaker_id,
            years_of,
            |years, id| {
                if id == alice {
                    Err(format!("speaker {id} is archived"))
                } else {
                    Ok(SpeakerStatResponseByYear::new(id, years))
                }
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessorError::Transform { .. }));
    assert!(err.to_string().contains("is archived"));
}

#[tokio::test]
async fn dropped_reduction_cancels_in_flight_groups() {
    let Fixture { store, .. } = fixture();
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let delivered = AtomicUsize::new(0);
    let reducer = StatsReducer::new(StatsConfig::default().with_max_concurrency(2));

    let reduction = reducer.reduce_groups(
        store
            .find_speaker_totals(&SpeakerStatsFilter::default())
            .await
            .unwrap(),
        |item| item.speaker_id,
        |group| {
            let started = Arc::clone(&started);
            let finished = Arc::clone(&finished);
            async move {
                started.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(200)).await;
                finished.fetch_add(1, Ordering::SeqCst);
                years_of(group).await
            }
        },
        |years, id| {
            delivered.fetch_add(1, Ordering::SeqCst);
            Ok::<_, BoxError>(SpeakerStatResponseByYear::new(id, years))
        },
    );

    let outcome = tokio::time::timeout(Duration::from_millis(20), reduction).await;
    assert!(outcome.is_err());
    assert_eq!(started.load(Ordering::SeqCst), 2);

    // Outlive the reducers' sleep; a surviving reducer would finish by now.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 0);
    assert_eq!(delivered.load(Ordering::SeqCst), 0);
}
