//! Core types and data models for conference report statistics
//!
//! This crate provides the records the statistics engine consumes and the
//! result shapes it produces.

pub mod reports;
pub mod responses;
pub mod stats;

pub use reports::{Conference, Report};
pub use responses::{CategoryCounts, ReportResponse, SpeakerStatResponseByYear, YearlyCounts};
pub use stats::{ReportStats, SpeakerConferenceTotal, SpeakerYearTotal};
