//! Category extraction strategies
//!
//! An extractor maps one report to the category values it is counted under.
//! A report may yield zero, one or many categories. `None` entries mark an
//! absent value; extractors may produce them, the counter rejects them.

use crate::config::MissingLanguagePolicy;
use confeti_types::Report;
use std::fmt;
use std::sync::Arc;

/// Trait for extracting grouping categories from reports
pub trait CategoryExtractor: Send + Sync {
    /// Extract the categories a report contributes to
    fn extract(&self, report: &Report) -> Vec<Option<String>>;

    /// Extractor name, used in error messages and logs
    fn name(&self) -> &str;
}

/// Groups reports by their tags
///
/// An absent tag set is treated as empty.
#[derive(Debug, Clone, Default)]
pub struct TagExtractor;

impl CategoryExtractor for TagExtractor {
    fn extract(&self, report: &Report) -> Vec<Option<String>> {
        report
            .tags
            .iter()
            .flatten()
            .map(|tag| Some(tag.clone()))
            .collect()
    }

    fn name(&self) -> &str {
        "tag"
    }
}

/// Groups reports by their single language
#[derive(Debug, Clone, Default)]
pub struct LanguageExtractor {
    missing: MissingLanguagePolicy,
}

impl LanguageExtractor {
    /// Create a language extractor with the given missing-language policy
    pub fn new(missing: MissingLanguagePolicy) -> Self {
        Self { missing }
    }
}

impl CategoryExtractor for LanguageExtractor {
    fn extract(&self, report: &Report) -> Vec<Option<String>> {
        match (&report.language, &self.missing) {
            (Some(language), _) => vec![Some(language.clone())],
            (None, MissingLanguagePolicy::Reject) => vec![None],
            (None, MissingLanguagePolicy::Skip) => Vec::new(),
            (None, MissingLanguagePolicy::Label(label)) => vec![Some(label.clone())],
        }
    }

    fn name(&self) -> &str {
        "language"
    }
}

/// Extractor backed by a closure
#[derive(Clone)]
pub struct FnExtractor {
    name: String,
    func: Arc<dyn Fn(&Report) -> Vec<Option<String>> + Send + Sync>,
}

impl FnExtractor {
    pub fn new<S, F>(name: S, func: F) -> Self
    where
        S: Into<String>,
        F: Fn(&Report) -> Vec<Option<String>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for FnExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnExtractor")
            .field("name", &self.name)
            .finish()
    }
}

impl CategoryExtractor for FnExtractor {
    fn extract(&self, report: &Report) -> Vec<Option<String>> {
        (self.func)(report)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Dimension a statistics query groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Tag,
    Language,
}

impl Dimension {
    /// Build the extractor for this dimension
    pub fn extractor(self, missing_language: &MissingLanguagePolicy) -> Box<dyn CategoryExtractor> {
        match self {
            Dimension::Tag => Box::new(TagExtractor),
            Dimension::Language => Box::new(LanguageExtractor::new(missing_language.clone())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Tag => "tag",
            Dimension::Language => "language",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
