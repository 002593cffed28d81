// Structured result payloads printed on stdout as JSON.
// Diagnostics never go here; they go to the tracing subscriber on stderr.

use crate::finding::{Correction, Suggestion, SuggestionDraft};
use crate::pipeline::ProofreadOutcome;
use crate::resolver::{PendingMarker, Resolved};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result of a `proofread` run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProofreadReport {
    /// Source document
    pub input: String,
    /// Corrected and annotated document
    pub output: String,
    /// Checker that produced the findings
    pub checker: String,
    pub level: String,
    /// Corrections written into the output
    pub corrections: Vec<Correction>,
    /// Corrections whose text was not found on their line
    pub corrections_skipped: usize,
    /// Suggestions embedded as markers, awaiting review
    pub suggestions: Vec<Suggestion>,
    /// Suggestions that could not be embedded; they were given no id
    pub unplaced: Vec<SuggestionDraft>,
    pub chunks_total: usize,
    pub chunks_failed: usize,
    /// Malformed checker records that were discarded
    pub findings_dropped: usize,
    pub processing_time_ms: u64,
}

impl ProofreadReport {
    pub fn new(input: &Path, output: &Path, checker: &str, level: &str, outcome: ProofreadOutcome) -> Self {
        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            checker: checker.to_string(),
            level: level.to_string(),
            corrections: outcome.applied_corrections,
            corrections_skipped: outcome.skipped_corrections.len(),
            suggestions: outcome.suggestions,
            unplaced: outcome.unplaced,
            chunks_total: outcome.chunks_total,
            chunks_failed: outcome.chunks_failed,
            findings_dropped: outcome.findings_dropped,
            processing_time_ms: outcome.duration_ms,
        }
    }
}

/// Result of a `resolve` run
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolveReport {
    pub input: String,
    pub output: String,
    /// Accepted suggestion ids, in document order
    pub applied: Vec<String>,
    /// Rejected suggestion ids, in document order
    pub removed: Vec<String>,
}

impl ResolveReport {
    pub fn new(input: &Path, output: &Path, resolved: &Resolved) -> Self {
        Self {
            input: input.display().to_string(),
            output: output.display().to_string(),
            applied: resolved.applied.clone(),
            removed: resolved.removed.clone(),
        }
    }
}

/// Result of a `pending` listing
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PendingReport {
    pub input: String,
    pub pending: Vec<PendingMarker>,
}
