// Process configuration, loaded once at startup and passed explicitly to checker constructors.
// Nothing below `main` reads the environment directly.

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_DICTIONARY_COMMAND: &str = "aspell";
pub const DEFAULT_DICTIONARY_LANG: &str = "en";

/// Which external checker produces findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckerKind {
    /// AI model behind an OpenAI-compatible chat-completions API
    #[default]
    Llm,
    /// ispell-compatible spell-check binary
    Dictionary,
}

impl fmt::Display for CheckerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckerKind::Llm => "llm",
            CheckerKind::Dictionary => "dictionary",
        })
    }
}

impl FromStr for CheckerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llm" | "ai" => Ok(CheckerKind::Llm),
            "dictionary" | "dict" | "aspell" => Ok(CheckerKind::Dictionary),
            _ => Err(ConfigError::InvalidValue {
                key: "checker".to_string(),
                value: s.to_string(),
                reason: "expected llm or dictionary".to_string(),
            }),
        }
    }
}

/// Settings for the external checkers
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub request_timeout: Duration,
    pub dictionary_command: String,
    pub dictionary_lang: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dictionary_command: DEFAULT_DICTIONARY_COMMAND.to_string(),
            dictionary_lang: DEFAULT_DICTIONARY_LANG.to_string(),
        }
    }
}

// Hand-written so the API key never lands in logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("request_timeout", &self.request_timeout)
            .field("dictionary_command", &self.dictionary_command)
            .field("dictionary_lang", &self.dictionary_lang)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let request_timeout = match get("PROOFMARK_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "PROOFMARK_TIMEOUT_SECS".to_string(),
                        value: raw,
                        reason: "expected a positive number of seconds".to_string(),
                    })
                }
            },
            None => defaults.request_timeout,
        };

        Ok(Self {
            api_key: get("PROOFMARK_API_KEY").or_else(|| get("OPENAI_API_KEY")),
            model: get("PROOFMARK_MODEL").unwrap_or(defaults.model),
            api_base: get("PROOFMARK_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            request_timeout,
            dictionary_command: get("PROOFMARK_ASPELL").unwrap_or(defaults.dictionary_command),
            dictionary_lang: get("PROOFMARK_LANG").unwrap_or(defaults.dictionary_lang),
        })
    }

    /// Fails when the chosen checker is missing a setting it cannot run without
    pub fn validate_for(&self, kind: CheckerKind) -> Result<(), ConfigError> {
        match kind {
            CheckerKind::Llm if self.api_key.is_none() => Err(ConfigError::MissingApiKey {
                checker: kind.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
