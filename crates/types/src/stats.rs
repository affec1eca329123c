//! Precomputed per-group totals

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An entity that already carries a per-group report total
///
/// The generic reducer only needs the total; grouping keys are supplied by
/// the caller as key functions.
pub trait ReportStats {
    /// Number of reports this entity stands for
    fn report_total(&self) -> u64;
}

/// Total reports of one speaker in one year, across conferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerYearTotal {
    pub speaker_id: Uuid,
    pub year: i32,
    pub report_total: u64,
}

impl ReportStats for SpeakerYearTotal {
    fn report_total(&self) -> u64 {
        self.report_total
    }
}

/// Total reports of one speaker at one conference edition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerConferenceTotal {
    pub speaker_id: Uuid,
    pub conference_name: String,
    pub year: i32,
    pub report_total: u64,
}

impl ReportStats for SpeakerConferenceTotal {
    fn report_total(&self) -> u64 {
        self.report_total
    }
}
