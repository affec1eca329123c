//! Request/response models

use confeti_processor::aggregation::StatsQuery;
use confeti_processor::lookup::SpeakerStatsFilter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Query parameters shared by the statistics endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatParams {
    /// Conference to restrict to
    pub conference_name: Option<String>,
    /// Year to restrict to
    pub year: Option<i32>,
}

impl From<StatParams> for StatsQuery {
    fn from(params: StatParams) -> Self {
        StatsQuery::new(params.conference_name, params.year)
    }
}

impl From<StatParams> for SpeakerStatsFilter {
    fn from(params: StatParams) -> Self {
        SpeakerStatsFilter::new(params.conference_name, params.year)
    }
}

/// Health status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

impl HealthStatus {
    pub fn ok(uptime: Duration) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime.as_secs(),
        }
    }
}
