// Interface to the external checkers that produce raw findings for a chunk.
// Implementations return loosely-typed JSON records; `finding::normalize_findings` validates them.

use crate::chunker::Chunk;
use crate::config::{CheckerKind, Config};
use crate::error::{CheckerError, ConfigError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod dictionary;
pub mod llm;

pub use dictionary::DictionaryChecker;
pub use llm::LlmChecker;

/// How much a checker should look for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    /// Spelling and obvious typos only
    Minimal,
    /// Spelling, grammar and punctuation corrections plus clarity suggestions
    #[default]
    Standard,
    /// Everything in `Standard` plus style suggestions
    Thorough,
}

impl fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckLevel::Minimal => "minimal",
            CheckLevel::Standard => "standard",
            CheckLevel::Thorough => "thorough",
        };
        f.write_str(name)
    }
}

impl FromStr for CheckLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(CheckLevel::Minimal),
            "standard" => Ok(CheckLevel::Standard),
            "thorough" => Ok(CheckLevel::Thorough),
            _ => Err(ConfigError::InvalidValue {
                key: "level".to_string(),
                value: s.to_string(),
                reason: "expected minimal, standard or thorough".to_string(),
            }),
        }
    }
}

/// A source of findings for one chunk of text.
///
/// Line numbers in the returned records must be absolute: the chunk's first line is
/// `chunk.start_line`.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Short identifier used in logs and reports
    fn name(&self) -> &str;

    async fn check(&self, chunk: &Chunk<'_>, level: CheckLevel) -> Result<Vec<Value>, CheckerError>;
}

#[async_trait]
impl<T: Checker + ?Sized> Checker for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn check(&self, chunk: &Chunk<'_>, level: CheckLevel) -> Result<Vec<Value>, CheckerError> {
        (**self).check(chunk, level).await
    }
}

/// Builds the configured checker; fails before any document is touched
pub fn build_checker(kind: CheckerKind, config: &Config) -> anyhow::Result<Box<dyn Checker>> {
    config.validate_for(kind)?;
    let checker: Box<dyn Checker> = match kind {
        CheckerKind::Llm => Box::new(LlmChecker::new(config)?),
        CheckerKind::Dictionary => Box::new(DictionaryChecker::new(config)?),
    };
    Ok(checker)
}
