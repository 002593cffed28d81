// Second pass: strips suggestion markers from an annotated document and sorts their ids
// into applied and removed according to the caller's resolution set.

use crate::document::Document;
use crate::error::CliError;
use crate::marker::{find_markers, is_suggestion_id, Marker};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Which suggestions the reviewer accepts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every marker found counts as applied
    All,
    /// Only these ids (uppercase, `S<n>`) count as applied
    Only(BTreeSet<String>),
}

impl Resolution {
    /// Builds a resolution set from user tokens.
    ///
    /// Tokens are case-insensitive; `s1` becomes `S1`. Any token equal to `all` selects
    /// [`Resolution::All`]. Blank tokens are ignored.
    pub fn from_tokens<I, S>(tokens: I) -> Result<Self, CliError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ids = BTreeSet::new();
        let mut accept_all = false;

        for token in tokens {
            let token = token.as_ref().trim();
            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case("all") {
                accept_all = true;
                continue;
            }
            let id = token.to_ascii_uppercase();
            if !is_suggestion_id(&id) {
                return Err(CliError::InvalidId(token.to_string()));
            }
            ids.insert(id);
        }

        if accept_all {
            Ok(Resolution::All)
        } else if ids.is_empty() {
            Err(CliError::NoIds)
        } else {
            Ok(Resolution::Only(ids))
        }
    }

    pub fn accepts(&self, id: &str) -> bool {
        match self {
            Resolution::All => true,
            Resolution::Only(ids) => ids.contains(id),
        }
    }
}

/// Final document plus the fate of every marker id found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub document: Document,
    /// Ids in the resolution set, in document order
    pub applied: Vec<String>,
    /// Ids not in the resolution set, in document order
    pub removed: Vec<String>,
}

/// A marker still waiting for review, with the line it sits on
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMarker {
    pub line: usize,
    #[serde(flatten)]
    pub marker: Marker,
}

/// Removes every marker from the document and classifies each marker's id.
///
/// Lines without markers are passed through byte-for-byte. On lines with markers,
/// each marker is cut together with one preceding space, then trailing whitespace
/// is trimmed (a trailing carriage return is preserved).
pub fn resolve(document: &Document, resolution: &Resolution) -> Resolved {
    let mut lines = Vec::with_capacity(document.line_count());
    let mut seen = HashSet::new();
    let mut applied = Vec::new();
    let mut removed = Vec::new();

    for line in document.lines() {
        let matches = find_markers(line);
        if matches.is_empty() {
            lines.push(line.clone());
            continue;
        }

        for found in &matches {
            let id = &found.marker.id;
            if !seen.insert(id.clone()) {
                continue;
            }
            if resolution.accepts(id) {
                applied.push(id.clone());
            } else {
                removed.push(id.clone());
            }
        }

        let ranges: Vec<_> = matches.into_iter().map(|m| m.range).collect();
        lines.push(strip_ranges(line, &ranges));
    }

    Resolved {
        document: Document::from_lines(lines),
        applied,
        removed,
    }
}

/// Lists every marker in the document without modifying it
pub fn scan_markers(document: &Document) -> Vec<PendingMarker> {
    document
        .lines()
        .iter()
        .enumerate()
        .flat_map(|(idx, line)| {
            find_markers(line).into_iter().map(move |found| PendingMarker {
                line: idx + 1,
                marker: found.marker,
            })
        })
        .collect()
}

fn strip_ranges(line: &str, ranges: &[std::ops::Range<usize>]) -> String {
    let (body, carriage_return) = match line.strip_suffix('\r') {
        Some(body) => (body, "\r"),
        None => (line, ""),
    };

    let mut cleaned = String::with_capacity(body.len());
    let mut cursor = 0;
    for range in ranges {
        let mut kept = &body[cursor..range.start];
        kept = kept.strip_suffix(' ').unwrap_or(kept);
        cleaned.push_str(kept);
        cursor = range.end;
    }
    cleaned.push_str(&body[cursor..]);

    let trimmed_len = cleaned.trim_end().len();
    cleaned.truncate(trimmed_len);
    cleaned.push_str(carriage_return);
    cleaned
}
