//! Speaker statistics endpoints

use axum::{extract::State, Json};
use confeti_processor::error::BoxError;
use confeti_processor::lookup::SpeakerStatsFilter;
use confeti_processor::reducer::Group;
use confeti_types::{SpeakerConferenceTotal, SpeakerStatResponseByYear, SpeakerYearTotal};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::{ApiPath, ApiQuery};
use crate::models::StatParams;
use crate::AppState;

/// `GET /speaker/stat/:id`: report totals of one speaker per year
pub async fn speaker_years(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SpeakerStatResponseByYear>> {
    let totals = state.speakers.find_yearly_totals(id).await?;
    let response = state
        .reducer
        .reduce_by_key(totals, year_of, |years| {
            Ok::<_, BoxError>(SpeakerStatResponseByYear::new(id, years))
        })
        .await?;
    Ok(Json(response))
}

/// `GET /speaker/stat`: per-year report totals of every matching speaker
pub async fn speaker_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatParams>,
) -> ApiResult<Json<Vec<SpeakerStatResponseByYear>>> {
    let filter = SpeakerStatsFilter::from(params);
    debug!(?filter, "Speaker statistics requested");

    let totals = state.speakers.find_speaker_totals(&filter).await?;
    let responses = state
        .reducer
        .reduce_groups(totals, speaker_of, years_by_speaker, |years, id| {
            Ok::<_, BoxError>(SpeakerStatResponseByYear::new(id, years))
        })
        .await?;
    Ok(Json(responses))
}

/// `GET /speaker/stat/entries`: raw per-edition totals
pub async fn speaker_entries(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatParams>,
) -> ApiResult<Json<Vec<SpeakerConferenceTotal>>> {
    let filter = SpeakerStatsFilter::from(params);
    let totals = state.speakers.find_speaker_totals(&filter).await?;
    let entries = state.reducer.collect_all(totals).await?;
    Ok(Json(entries))
}

fn year_of(total: &SpeakerYearTotal) -> i32 {
    total.year
}

fn speaker_of(total: &SpeakerConferenceTotal) -> Uuid {
    total.speaker_id
}

/// Fold one speaker's per-edition totals into per-year totals
async fn years_by_speaker(
    group: Group<Uuid, SpeakerConferenceTotal>,
) -> Result<HashMap<i32, u64>, BoxError> {
    let mut years: HashMap<i32, u64> = HashMap::new();
    for total in group.items {
        let year = years.entry(total.year).or_insert(0);
        *year = year.checked_add(total.report_total).ok_or_else(|| {
            format!("report total overflow for speaker {} in {}", group.key, total.year)
        })?;
    }
    Ok(years)
}
