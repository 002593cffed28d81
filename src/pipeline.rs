//! First pass of the proofreading workflow.
//!
//! The document is chunked, each chunk goes to the checker in document order, the raw
//! findings are normalized and de-duplicated, suggestions get run-wide ids `S1, S2, ...`,
//! corrections are applied to the original text and the suggestions are annotated onto
//! the corrected text as markers.
//!
//! A failing checker call costs only its own chunk: it is logged and treated as
//! "no findings", and everything found in earlier chunks is kept.

use crate::annotator::annotate;
use crate::checker::{CheckLevel, Checker};
use crate::chunker::{Chunker, DEFAULT_MAX_CHUNK_TOKENS};
use crate::corrector::apply_corrections;
use crate::document::Document;
use crate::finding::{
    dedup_findings, normalize_findings, suggestion_id, Correction, Suggestion, SuggestionDraft,
};
use crate::marker::check_content;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Knobs for a proofreading run
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub level: CheckLevel,
    /// Chunk budget in estimated tokens
    pub max_chunk_tokens: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            level: CheckLevel::default(),
            max_chunk_tokens: DEFAULT_MAX_CHUNK_TOKENS,
            show_progress: false,
        }
    }
}

/// Findings gathered from every chunk, de-duplicated, with ids assigned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFindings {
    pub corrections: Vec<Correction>,
    pub suggestions: Vec<Suggestion>,
    /// Suggestions that cannot be written as markers; they never receive an id
    pub unplaced: Vec<SuggestionDraft>,
    pub chunks_total: usize,
    pub chunks_failed: usize,
    pub findings_dropped: usize,
}

/// Result of the first pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofreadOutcome {
    /// Corrected and annotated document
    pub document: Document,
    pub applied_corrections: Vec<Correction>,
    pub skipped_corrections: Vec<Correction>,
    /// Suggestions written into the document as markers
    pub suggestions: Vec<Suggestion>,
    /// Suggestions that could not be written (bad line or unencodable text)
    pub unplaced: Vec<SuggestionDraft>,
    pub chunks_total: usize,
    pub chunks_failed: usize,
    pub findings_dropped: usize,
    pub duration_ms: u64,
}

/// Assigns `S1, S2, ...` in the order the drafts are given
pub fn assign_ids(drafts: Vec<SuggestionDraft>) -> Vec<Suggestion> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(idx, draft)| draft.with_id(suggestion_id(idx + 1)))
        .collect()
}

/// Splits drafts into those a marker can carry and those it cannot, keeping order
fn partition_placeable(
    document: &Document,
    drafts: Vec<SuggestionDraft>,
) -> (Vec<SuggestionDraft>, Vec<SuggestionDraft>) {
    drafts.into_iter().partition(|draft| {
        if !document.contains_line(draft.line) {
            warn!("Suggestion for line {} is outside the document, not annotating", draft.line);
            return false;
        }
        match check_content(&draft.text, draft.suggested.as_deref()) {
            Ok(()) => true,
            Err(e) => {
                warn!("Suggestion for line {} cannot be written as a marker: {}", draft.line, e);
                false
            }
        }
    })
}

/// Drives a checker over a document
pub struct Proofreader {
    checker: Box<dyn Checker>,
    options: PipelineOptions,
}

impl Proofreader {
    pub fn new(checker: Box<dyn Checker>, options: PipelineOptions) -> Self {
        Self { checker, options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Runs the checker over every chunk, strictly one after another in document order
    pub async fn collect_findings(&self, document: &Document) -> CollectedFindings {
        let chunks_total = Chunker::new(document, self.options.max_chunk_tokens).count();
        let progress = self.progress_bar(chunks_total);

        let mut corrections = Vec::new();
        let mut drafts = Vec::new();
        let mut chunks_failed = 0;
        let mut findings_dropped = 0;

        for chunk in Chunker::new(document, self.options.max_chunk_tokens) {
            progress.inc(1);
            if chunk.is_blank() {
                continue;
            }

            debug!(
                "Checking lines {}-{} (~{} tokens) with {}",
                chunk.start_line,
                chunk.end_line(),
                chunk.estimated_tokens(),
                self.checker.name()
            );

            let raw = match self.checker.check(&chunk, self.options.level).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        "Checker failed on lines {}-{}, continuing without findings: {}",
                        chunk.start_line,
                        chunk.end_line(),
                        e
                    );
                    chunks_failed += 1;
                    continue;
                }
            };

            let normalized = normalize_findings(&raw);
            if normalized.dropped > 0 {
                warn!(
                    "Dropped {} malformed findings for lines {}-{}",
                    normalized.dropped,
                    chunk.start_line,
                    chunk.end_line()
                );
            }
            findings_dropped += normalized.dropped;
            corrections.extend(normalized.corrections);
            drafts.extend(normalized.suggestions);
        }
        progress.finish_and_clear();

        let (corrections, drafts) = dedup_findings(corrections, drafts);
        let (placeable, unplaced) = partition_placeable(document, drafts);

        CollectedFindings {
            corrections,
            suggestions: assign_ids(placeable),
            unplaced,
            chunks_total,
            chunks_failed,
            findings_dropped,
        }
    }

    /// Produces the corrected and annotated document
    pub async fn proofread(&self, text: &str) -> ProofreadOutcome {
        let start_time = Instant::now();
        let original = Document::parse(text);

        info!(
            "Proofreading {} lines with the {} checker at {} level",
            original.line_count(),
            self.checker.name(),
            self.options.level
        );

        let collected = self.collect_findings(&original).await;
        let corrected = apply_corrections(&original, &collected.corrections);
        let annotation = annotate(&corrected.document, &collected.suggestions);

        // placement was checked before ids were assigned, so every suggestion should land
        if !annotation.out_of_range.is_empty() || !annotation.rejected.is_empty() {
            warn!(
                "Annotator skipped {} suggestions after placement checks",
                annotation.out_of_range.len() + annotation.rejected.len()
            );
        }
        let suggestions: Vec<Suggestion> = collected
            .suggestions
            .into_iter()
            .filter(|s| annotation.annotated.contains(&s.id))
            .collect();

        let outcome = ProofreadOutcome {
            document: annotation.document,
            applied_corrections: corrected.applied,
            skipped_corrections: corrected.skipped,
            suggestions,
            unplaced: collected.unplaced,
            chunks_total: collected.chunks_total,
            chunks_failed: collected.chunks_failed,
            findings_dropped: collected.findings_dropped,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Proofreading finished: {} corrections applied, {} suggestions annotated, {}/{} chunks failed in {}ms",
            outcome.applied_corrections.len(),
            outcome.suggestions.len(),
            outcome.chunks_failed,
            outcome.chunks_total,
            outcome.duration_ms
        );

        outcome
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.options.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] chunk {pos}/{len} | ETA: {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        ProgressBar::new(len as u64).with_style(style)
    }
}
