// Error taxonomy for the proofreading pipeline.
// Per-unit failures (one chunk, one finding, one marker) are recovered where they occur;
// only configuration, usage and I/O errors reach the top level.

use thiserror::Error;

/// Missing or invalid configuration, reported before any document is read
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key configured for the {checker} checker (set PROOFMARK_API_KEY or OPENAI_API_KEY)")]
    MissingApiKey { checker: String },

    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("spell-check binary `{command}` not found on PATH")]
    MissingBinary { command: String },
}

/// Failure of a single checker call; the pipeline treats it as zero findings for that chunk
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("checker API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("malformed checker response: {0}")]
    MalformedResponse(String),

    #[error("failed to run spell-check process: {0}")]
    Process(#[from] std::io::Error),
}

/// A suggestion that cannot be written as a marker without losing round-trip fidelity
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MarkerError {
    #[error("{field} contains the marker terminator `-->`")]
    ContainsTerminator { field: &'static str },

    #[error("{field} contains a marker opener `<!-- [S`")]
    ContainsOpener { field: &'static str },

    #[error("{field} spans more than one line")]
    Multiline { field: &'static str },

    #[error("description contains the reserved separator ` Suggested: \"`")]
    ReservedSeparator,

    #[error("invalid suggestion id {0:?}")]
    InvalidId(String),
}

/// Bad command-line input, detected before any file I/O
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("no suggestion ids given (pass ids like S1 S3, or `all`)")]
    NoIds,

    #[error("invalid suggestion id {0:?} (expected S<n> or `all`)")]
    InvalidId(String),
}
