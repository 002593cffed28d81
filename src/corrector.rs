// Applies auto-corrections to a document by exact substring replacement on their target line.

use crate::document::Document;
use crate::finding::Correction;
use tracing::debug;

/// Outcome of applying a batch of corrections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionResult {
    pub document: Document,
    /// Corrections that changed the document, in the order they were applied
    pub applied: Vec<Correction>,
    /// Corrections whose target line or `from` text was not found
    pub skipped: Vec<Correction>,
}

/// Applies every correction whose `from` text occurs on its target line.
///
/// Corrections are processed in descending line order; corrections sharing a line
/// run last-listed-first. Only the first occurrence of `from` on the line is replaced.
/// A correction whose `from` is absent from the original line, or whose line is out of
/// range, is skipped without touching the document.
pub fn apply_corrections(original: &Document, corrections: &[Correction]) -> CorrectionResult {
    let mut document = original.clone();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();

    let mut ordered: Vec<&Correction> = corrections.iter().rev().collect();
    // WHY: stable sort keeps the reversed listing order among corrections on the same line
    ordered.sort_by(|a, b| b.line.cmp(&a.line));

    for correction in ordered {
        let present_in_original = original
            .line(correction.line)
            .is_some_and(|line| line.contains(&correction.from));

        let replaced = present_in_original
            && document
                .line_mut(correction.line)
                .is_some_and(|line| replace_first(line, &correction.from, &correction.to));

        if replaced {
            applied.push(correction.clone());
        } else {
            debug!(
                "Skipping correction on line {}: {:?} not found",
                correction.line, correction.from
            );
            skipped.push(correction.clone());
        }
    }

    CorrectionResult {
        document,
        applied,
        skipped,
    }
}

fn replace_first(line: &mut String, from: &str, to: &str) -> bool {
    if from.is_empty() {
        return false;
    }
    match line.find(from) {
        Some(start) => {
            line.replace_range(start..start + from.len(), to);
            true
        }
        None => false,
    }
}
