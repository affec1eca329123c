//! Report records and their conference occurrences

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

/// A (conference name, year) pair under which a report was presented
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Conference {
    /// Conference name, e.g. "JPoint"
    pub name: String,
    /// Edition year
    pub year: i32,
}

impl Conference {
    /// Create a new conference occurrence
    pub fn new(name: impl Into<String>, year: i32) -> Self {
        Self {
            name: name.into(),
            year,
        }
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.year)
    }
}

/// A single conference talk record
///
/// `tags` distinguishes an absent tag set from an empty one only for
/// serialization fidelity; both count as "no tags".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    /// Unique identifier for the report
    pub id: Uuid,
    /// Talk title
    #[serde(default)]
    pub title: String,
    /// Topic tags
    #[serde(default)]
    pub tags: Option<HashSet<String>>,
    /// Language the talk was given in
    #[serde(default)]
    pub language: Option<String>,
    /// Conferences the talk was presented at
    pub conferences: HashSet<Conference>,
    /// Speakers presenting the talk
    #[serde(default)]
    pub speakers: HashSet<Uuid>,
}

impl Report {
    /// Create a new report with a fresh id and no tags, language or speakers
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            tags: None,
            language: None,
            conferences: HashSet::new(),
            speakers: HashSet::new(),
        }
    }

    /// Set the tag set
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Add a conference occurrence
    pub fn with_conference(mut self, name: impl Into<String>, year: i32) -> Self {
        self.conferences.insert(Conference::new(name, year));
        self
    }

    /// Add a speaker
    pub fn with_speaker(mut self, speaker_id: Uuid) -> Self {
        self.speakers.insert(speaker_id);
        self
    }

    /// Whether the report was presented at the given conference
    pub fn presented_at(&self, name: &str) -> bool {
        self.conferences.iter().any(|c| c.name == name)
    }

    /// Whether the report was presented at the given conference edition
    pub fn presented_at_edition(&self, name: &str, year: i32) -> bool {
        self.conferences
            .iter()
            .any(|c| c.name == name && c.year == year)
    }

    /// The sole conference occurrence, if there is exactly one
    pub fn single_conference(&self) -> Option<&Conference> {
        let mut iter = self.conferences.iter();
        match (iter.next(), iter.next()) {
            (Some(conference), None) => Some(conference),
            _ => None,
        }
    }

    /// Narrow the occurrence set to the ones matching `keep`
    ///
    /// Scoped lookups use this to hand out reports that carry only the
    /// occurrence the query asked for.
    pub fn scoped<F>(&self, keep: F) -> Self
    where
        F: Fn(&Conference) -> bool,
    {
        Self {
            conferences: self.conferences.iter().filter(|c| keep(c)).cloned().collect(),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_builder() {
        let report = Report::new("Loom in practice")
            .with_tags(["java", "concurrency"])
            .with_language("en")
            .with_conference("JPoint", 2023);

        assert_eq!(report.tags.as_ref().map(HashSet::len), Some(2));
        assert_eq!(report.language.as_deref(), Some("en"));
        assert!(report.presented_at("JPoint"));
        assert!(report.presented_at_edition("JPoint", 2023));
        assert!(!report.presented_at_edition("JPoint", 2022));
    }

    #[test]
    fn test_single_conference() {
        let report = Report::new("a").with_conference("X", 2023);
        assert_eq!(report.single_conference(), Some(&Conference::new("X", 2023)));

        let report = report.with_conference("Y", 2023);
        assert!(report.single_conference().is_none());

        assert!(Report::new("b").single_conference().is_none());
    }

    #[test]
    fn test_scoped_keeps_matching_occurrences() {
        let report = Report::new("a")
            .with_conference("X", 2023)
            .with_conference("Y", 2024);

        let scoped = report.scoped(|c| c.name == "Y");
        assert_eq!(scoped.id, report.id);
        assert_eq!(scoped.single_conference(), Some(&Conference::new("Y", 2024)));
    }

    #[test]
    fn test_report_deserializes_without_optional_fields() {
        let json = serde_json::json!({
            "id": "6f1c1e2a-9d1b-4c55-9a57-1b2a4b7f0c11",
            "conferences": [{ "name": "Joker", "year": 2021 }]
        });

        let report: Report = serde_json::from_value(json).unwrap();
        assert!(report.tags.is_none());
        assert!(report.language.is_none());
        assert!(report.speakers.is_empty());
        assert_eq!(report.conferences.len(), 1);
    }

    #[test]
    fn test_conference_display() {
        assert_eq!(Conference::new("Joker", 2021).to_string(), "Joker@2021");
    }
}
