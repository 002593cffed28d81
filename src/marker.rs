//! Marker wire format.
//!
//! A suggestion is embedded in a document as an HTML comment appended to its line:
//!
//! ```text
//! <!-- [S<n>] REVIEW: <description>[ Suggested: "<replacement>"] -->
//! ```
//!
//! Markdown renderers ignore the comment, so the rendered document is unchanged.
//! Several markers may share a line; [`find_markers`] returns every non-overlapping
//! occurrence with its byte range. Text that cannot be decoded unambiguously is
//! refused by [`Marker::encode`] instead of being escaped.

use crate::error::MarkerError;
use crate::finding::Suggestion;
use serde::Serialize;
use std::ops::Range;

const OPEN: &str = "<!-- [S";
const REVIEW_TAG: &str = "] REVIEW: ";
const SUGGESTED_SEPARATOR: &str = " Suggested: \"";
const CLOSE: &str = "-->";

/// Decoded content of one marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub id: String,
    pub text: String,
    pub suggested: Option<String>,
}

/// A marker found on a line, with the byte range it occupies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
    pub range: Range<usize>,
    pub marker: Marker,
}

impl Marker {
    pub fn new(id: impl Into<String>, text: impl Into<String>, suggested: Option<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            suggested,
        }
    }

    pub fn from_suggestion(suggestion: &Suggestion) -> Self {
        Self::new(
            suggestion.id.clone(),
            suggestion.text.clone(),
            suggestion.suggested.clone(),
        )
    }

    /// Renders the marker, refusing content that would not decode back to the same fields
    pub fn encode(&self) -> Result<String, MarkerError> {
        if !is_suggestion_id(&self.id) {
            return Err(MarkerError::InvalidId(self.id.clone()));
        }
        check_content(&self.text, self.suggested.as_deref())?;

        let mut encoded = format!("<!-- [{}] REVIEW: {}", self.id, self.text);
        if let Some(suggested) = &self.suggested {
            encoded.push_str(SUGGESTED_SEPARATOR);
            encoded.push_str(suggested);
            encoded.push('"');
        }
        encoded.push(' ');
        encoded.push_str(CLOSE);
        Ok(encoded)
    }
}

/// Checks that a description and replacement can be carried by a marker, whatever its id
pub fn check_content(text: &str, suggested: Option<&str>) -> Result<(), MarkerError> {
    check_field("description", text)?;
    if text.contains(SUGGESTED_SEPARATOR) {
        return Err(MarkerError::ReservedSeparator);
    }
    if let Some(suggested) = suggested {
        check_field("suggested text", suggested)?;
    }
    Ok(())
}

fn check_field(field: &'static str, value: &str) -> Result<(), MarkerError> {
    if value.contains(CLOSE) {
        return Err(MarkerError::ContainsTerminator { field });
    }
    if value.contains(OPEN) {
        return Err(MarkerError::ContainsOpener { field });
    }
    if value.contains(['\n', '\r']) {
        return Err(MarkerError::Multiline { field });
    }
    Ok(())
}

/// True for `S<n>` with `n` a positive integer without leading zeros
pub fn is_suggestion_id(id: &str) -> bool {
    id.strip_prefix('S').is_some_and(valid_number)
}

fn valid_number(digits: &str) -> bool {
    !digits.is_empty() && !digits.starts_with('0') && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Finds every non-overlapping marker on a single line, left to right
pub fn find_markers(line: &str) -> Vec<MarkerMatch> {
    let mut matches = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = line[cursor..].find(OPEN) {
        let start = cursor + offset;
        match parse_marker_at(line, start) {
            Some(found) => {
                cursor = found.range.end;
                matches.push(found);
            }
            None => {
                // WHY: skip past this `<` only, a real marker may start inside the rejected text
                cursor = start + 1;
            }
        }
    }

    matches
}

fn parse_marker_at(line: &str, start: usize) -> Option<MarkerMatch> {
    let digits_start = start + OPEN.len();
    let digits_len = line[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let digits = &line[digits_start..digits_start + digits_len];
    if !valid_number(digits) {
        return None;
    }

    let tag_start = digits_start + digits_len;
    if !line[tag_start..].starts_with(REVIEW_TAG) {
        return None;
    }

    let body_start = tag_start + REVIEW_TAG.len();
    let close = body_start + line[body_start..].find(CLOSE)?;
    let body = line[body_start..close].strip_suffix(' ')?;
    // an unclosed opener before a real marker is ordinary text; the inner marker wins
    if body.contains(OPEN) {
        return None;
    }
    let (text, suggested) = split_body(body);

    Some(MarkerMatch {
        range: start..close + CLOSE.len(),
        marker: Marker {
            id: format!("S{digits}"),
            text: text.to_string(),
            suggested: suggested.map(str::to_string),
        },
    })
}

fn split_body(body: &str) -> (&str, Option<&str>) {
    if let Some(idx) = body.find(SUGGESTED_SEPARATOR) {
        let value_start = idx + SUGGESTED_SEPARATOR.len();
        if body.len() > value_start && body.ends_with('"') {
            return (&body[..idx], Some(&body[value_start..body.len() - 1]));
        }
    }
    (body, None)
}
