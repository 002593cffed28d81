// Appends suggestion markers to the lines they concern.

use crate::document::Document;
use crate::error::MarkerError;
use crate::finding::Suggestion;
use crate::marker::Marker;
use tracing::{debug, warn};

/// Outcome of annotating a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub document: Document,
    /// Ids of suggestions written as markers
    pub annotated: Vec<String>,
    /// Ids of suggestions whose line is outside the document
    pub out_of_range: Vec<String>,
    /// Suggestions whose content cannot be encoded as a marker
    pub rejected: Vec<(String, MarkerError)>,
}

/// Appends one marker per suggestion to the end of its target line.
///
/// Each marker is separated from what precedes it by a single space. Markers sharing
/// a line keep the order the suggestions were given in.
pub fn annotate(document: &Document, suggestions: &[Suggestion]) -> Annotation {
    let mut annotated_doc = document.clone();
    let mut annotated = Vec::new();
    let mut out_of_range = Vec::new();
    let mut rejected = Vec::new();

    for suggestion in suggestions {
        let Some(line) = annotated_doc.line_mut(suggestion.line) else {
            debug!(
                "Dropping suggestion {}: line {} is out of range",
                suggestion.id, suggestion.line
            );
            out_of_range.push(suggestion.id.clone());
            continue;
        };

        match Marker::from_suggestion(suggestion).encode() {
            Ok(encoded) => {
                // a CRLF line keeps its carriage return at the very end
                let insert_at = line.strip_suffix('\r').map_or(line.len(), str::len);
                line.insert_str(insert_at, &format!(" {encoded}"));
                annotated.push(suggestion.id.clone());
            }
            Err(e) => {
                warn!("Cannot write marker for suggestion {}: {}", suggestion.id, e);
                rejected.push((suggestion.id.clone(), e));
            }
        }
    }

    Annotation {
        document: annotated_doc,
        annotated,
        out_of_range,
        rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::SuggestionKind;

    fn suggestion(id: &str, line: usize, text: &str, suggested: Option<&str>) -> Suggestion {
        Suggestion {
            id: id.into(),
            line,
            kind: SuggestionKind::Style,
            text: text.into(),
            suggested: suggested.map(str::to_owned),
            context: None,
        }
    }

    #[test]
    fn test_marker_appended_after_single_space() {
        let doc = Document::parse("# Heading\nA sentence that rambles.\n");
        let result = annotate(&doc, &[suggestion("S1", 2, "Too wordy", Some("A short sentence."))]);

        assert_eq!(
            result.document.to_text(),
            "# Heading\nA sentence that rambles. <!-- [S1] REVIEW: Too wordy Suggested: \"A short sentence.\" -->\n"
        );
        assert_eq!(result.annotated, vec!["S1".to_string()]);
    }

    #[test]
    fn test_multiple_markers_keep_insertion_order() {
        let doc = Document::parse("Line one.");
        let result = annotate(
            &doc,
            &[suggestion("S1", 1, "First", None), suggestion("S2", 1, "Second", None)],
        );

        assert_eq!(
            result.document.line(1),
            Some("Line one. <!-- [S1] REVIEW: First --> <!-- [S2] REVIEW: Second -->")
        );
    }

    #[test]
    fn test_out_of_range_suggestions_are_dropped() {
        let doc = Document::parse("only\nlines");
        let result = annotate(
            &doc,
            &[suggestion("S1", 3, "Past the end", None), suggestion("S2", 0, "Before start", None)],
        );

        assert_eq!(result.document, doc);
        assert_eq!(result.out_of_range, vec!["S1".to_string(), "S2".to_string()]);
    }

    #[test]
    fn test_unencodable_suggestion_is_rejected_not_written() {
        let doc = Document::parse("text");
        let result = annotate(&doc, &[suggestion("S1", 1, "bad --> text", None)]);

        assert_eq!(result.document, doc);
        assert_eq!(result.rejected.len(), 1);
        assert_eq!(result.rejected[0].0, "S1");

        let copy = result.clone();
        assert_eq!(
            copy.rejected[0].1,
            MarkerError::ContainsTerminator { field: "description" }
        );
    }

    #[test]
    fn test_crlf_line_keeps_carriage_return_last() {
        let doc = Document::parse("first\r\nsecond\r\n");
        let result = annotate(&doc, &[suggestion("S1", 1, "Note", None)]);
        assert_eq!(
            result.document.to_text(),
            "first <!-- [S1] REVIEW: Note -->\r\nsecond\r\n"
        );
    }

    #[test]
    fn test_no_suggestions_leaves_document_identical() {
        let doc = Document::parse("a\r\nb\n");
        let result = annotate(&doc, &[]);
        assert_eq!(result.document.to_text(), "a\r\nb\n");
    }
}
