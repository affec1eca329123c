//! Report statistics endpoints

use axum::{extract::State, Json};
use confeti_processor::aggregation::{AggregateResult, StatsQuery};
use confeti_processor::extractors::Dimension;
use tracing::debug;

use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::models::StatParams;
use crate::AppState;

/// `GET /report/stat/tag`
pub async fn tag_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatParams>,
) -> ApiResult<Json<AggregateResult>> {
    report_stats(&state, Dimension::Tag, params.into()).await
}

/// `GET /report/stat/language`
pub async fn language_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<StatParams>,
) -> ApiResult<Json<AggregateResult>> {
    report_stats(&state, Dimension::Language, params.into()).await
}

async fn report_stats(
    state: &AppState,
    dimension: Dimension,
    query: StatsQuery,
) -> ApiResult<Json<AggregateResult>> {
    debug!(%dimension, ?query, "Report statistics requested");

    let extractor = state.aggregator.extractor_for(dimension);
    let result = state.aggregator.query(&query, extractor.as_ref()).await?;
    Ok(Json(result))
}
