//! Configuration types for the statistics processor

use crate::error::{ProcessorError, Result};
use serde::{Deserialize, Serialize};

/// Processor configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsConfig {
    /// Maximum number of group reductions in flight at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// How the language extractor treats reports without a language
    #[serde(default)]
    pub missing_language: MissingLanguagePolicy,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            missing_language: MissingLanguagePolicy::default(),
        }
    }
}

impl StatsConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == 0 {
            return Err(ProcessorError::Configuration {
                source: "max_concurrency must be greater than 0".into(),
            });
        }

        if let MissingLanguagePolicy::Label(label) = &self.missing_language {
            if label.trim().is_empty() {
                return Err(ProcessorError::Configuration {
                    source: "missing_language label must not be blank".into(),
                });
            }
        }

        Ok(())
    }

    /// Set the concurrency bound
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Set the missing-language policy
    pub fn with_missing_language(mut self, policy: MissingLanguagePolicy) -> Self {
        self.missing_language = policy;
        self
    }
}

/// Treatment of reports whose language is absent
///
/// `Reject` keeps the historical behaviour: the absent value reaches the
/// counter, which fails the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingLanguagePolicy {
    /// Fail the request with a consistency violation
    #[default]
    Reject,
    /// Leave the report out of the language counts
    Skip,
    /// Count the report under the given category
    Label(String),
}

fn default_max_concurrency() -> usize {
    16
}
