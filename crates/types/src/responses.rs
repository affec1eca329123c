//! Aggregate result shapes handed to the serialization layer

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Category value -> occurrence count
pub type CategoryCounts = HashMap<String, u64>;

/// Year -> category counts
pub type YearlyCounts = HashMap<i32, CategoryCounts>;

/// Frequency tables for one conference, keyed by year
///
/// Serialized as `{ "conferenceName": .., "data": { "2023": { "rust": 2 } } }`.
/// Years with no reports are absent rather than mapped to an empty table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponse {
    pub conference_name: String,
    pub data: YearlyCounts,
}

impl ReportResponse {
    /// Create a response with no years
    pub fn empty(conference_name: impl Into<String>) -> Self {
        Self {
            conference_name: conference_name.into(),
            data: YearlyCounts::new(),
        }
    }

    /// Create a response from collected year tables
    pub fn new(conference_name: impl Into<String>, data: YearlyCounts) -> Self {
        Self {
            conference_name: conference_name.into(),
            data,
        }
    }

    /// Whether no year has any report
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Count for a category in a year, if the year is present
    pub fn count(&self, year: i32, category: &str) -> Option<u64> {
        self.data.get(&year)?.get(category).copied()
    }
}

/// Report totals of one speaker, keyed by year
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeakerStatResponseByYear {
    pub id: Uuid,
    pub years: HashMap<i32, u64>,
}

impl SpeakerStatResponseByYear {
    pub fn new(id: Uuid, years: HashMap<i32, u64>) -> Self {
        Self { id, years }
    }
}
