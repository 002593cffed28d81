pub mod annotator;
pub mod checker;
pub mod chunker;
pub mod config;
pub mod corrector;
pub mod document;
pub mod error;
pub mod finding;
pub mod marker;
pub mod naming;
pub mod pipeline;
pub mod reader;
pub mod report;
pub mod resolver;

// Re-export the two-pass workflow types for convenient access
pub use checker::{build_checker, CheckLevel, Checker};
pub use config::{CheckerKind, Config};
pub use document::Document;
pub use finding::{Correction, CorrectionKind, Suggestion, SuggestionKind};
pub use pipeline::{PipelineOptions, ProofreadOutcome, Proofreader};
pub use resolver::{resolve, scan_markers, Resolution, Resolved};

// Re-export naming convention helpers used by external tooling
pub use naming::{final_path, intermediate_path};
