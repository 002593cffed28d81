// Typed findings and the normalizer that turns loosely-typed checker output into them.
// Malformed records are dropped one at a time; they never abort the chunk or the run.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use tracing::debug;

/// Class of an auto-applied correction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectionKind {
    Spelling,
    Grammar,
    Punctuation,
}

/// Class of a reviewable suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Style,
    Clarity,
    Spelling,
}

/// Substitution that is safe to apply without review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub line: usize,
    pub kind: CorrectionKind,
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Suggestion as reported by a checker, before the run assigns it an id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDraft {
    pub line: usize,
    pub kind: SuggestionKind,
    pub text: String,
    pub suggested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl SuggestionDraft {
    pub fn with_id(self, id: String) -> Suggestion {
        Suggestion {
            id,
            line: self.line,
            kind: self.kind,
            text: self.text,
            suggested: self.suggested,
            context: self.context,
        }
    }
}

/// Reviewable suggestion with its run-unique id (`S1`, `S2`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: String,
    pub line: usize,
    pub kind: SuggestionKind,
    pub text: String,
    pub suggested: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Formats the id for the `n`th suggestion of a run (1-based)
pub fn suggestion_id(n: usize) -> String {
    format!("S{n}")
}

/// Output of normalizing one chunk's raw findings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedFindings {
    pub corrections: Vec<Correction>,
    pub suggestions: Vec<SuggestionDraft>,
    /// Records that were malformed or unrecognized
    pub dropped: usize,
}

impl NormalizedFindings {
    pub fn is_empty(&self) -> bool {
        self.corrections.is_empty() && self.suggestions.is_empty()
    }
}

/// Wire shape accepted from checkers; aliases cover the spellings models tend to produce
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawFinding {
    #[serde(rename = "correction", alias = "auto", alias = "fix", alias = "auto-correction")]
    Correction {
        #[serde(deserialize_with = "line_number")]
        line: usize,
        #[serde(default)]
        kind: Option<CorrectionKind>,
        #[serde(alias = "original")]
        from: String,
        #[serde(alias = "replacement")]
        to: String,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        context: Option<String>,
    },
    #[serde(rename = "suggestion", alias = "suggest", alias = "review")]
    Suggestion {
        #[serde(deserialize_with = "line_number")]
        line: usize,
        #[serde(default)]
        kind: Option<SuggestionKind>,
        #[serde(default)]
        text: Option<String>,
        #[serde(default)]
        description: Option<String>,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default, alias = "replacement", alias = "to")]
        suggested: Option<String>,
        #[serde(default)]
        context: Option<String>,
    },
}

/// Accepts a positive integer or a numeric string
fn line_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Value::deserialize(deserializer)?;
    let parsed = match &value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n >= 1 => usize::try_from(n).map_err(D::Error::custom),
        _ => Err(D::Error::custom(format!("invalid line number {value}"))),
    }
}

enum Classified {
    Correction(Correction),
    Suggestion(SuggestionDraft),
}

fn classify(value: &Value) -> Option<Classified> {
    let raw: RawFinding = match serde_json::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Dropping malformed finding: {}", e);
            return None;
        }
    };

    match raw {
        RawFinding::Correction { line, kind, from, to, reason, context } => {
            if from.is_empty() || from == to {
                debug!("Dropping no-op correction on line {}", line);
                return None;
            }
            Some(Classified::Correction(Correction {
                line,
                kind: kind.unwrap_or(CorrectionKind::Grammar),
                from,
                to,
                context: context.or(reason),
            }))
        }
        RawFinding::Suggestion { line, kind, text, description, reason, suggested, context } => {
            let text = text
                .or(description)
                .or(reason)
                .map(|t| t.trim().to_string())
                .unwrap_or_default();
            if text.is_empty() {
                debug!("Dropping suggestion without description on line {}", line);
                return None;
            }
            Some(Classified::Suggestion(SuggestionDraft {
                line,
                kind: kind.unwrap_or(SuggestionKind::Style),
                text,
                suggested,
                context,
            }))
        }
    }
}

/// Partitions one chunk's raw findings into corrections and id-less suggestions
pub fn normalize_findings(raw: &[Value]) -> NormalizedFindings {
    let mut normalized = NormalizedFindings::default();

    for value in raw {
        match classify(value) {
            Some(Classified::Correction(c)) => normalized.corrections.push(c),
            Some(Classified::Suggestion(s)) => normalized.suggestions.push(s),
            None => normalized.dropped += 1,
        }
    }

    normalized
}

/// Removes duplicate findings collected across a run, keeping first-seen order.
///
/// Corrections collapse on `(line, from, to)`. Suggestions collapse on
/// `(line, text, suggested)`, and a suggestion is also dropped when a correction
/// on the same line already proposes the same replacement.
pub fn dedup_findings(
    corrections: Vec<Correction>,
    suggestions: Vec<SuggestionDraft>,
) -> (Vec<Correction>, Vec<SuggestionDraft>) {
    let mut seen_corrections = HashSet::new();
    let corrections: Vec<Correction> = corrections
        .into_iter()
        .filter(|c| seen_corrections.insert((c.line, c.from.clone(), c.to.clone())))
        .collect();

    let replacements: HashSet<(usize, &str)> = corrections
        .iter()
        .map(|c| (c.line, c.to.as_str()))
        .collect();

    let mut seen_suggestions = HashSet::new();
    let suggestions = suggestions
        .into_iter()
        .filter(|s| {
            if let Some(suggested) = s.suggested.as_deref() {
                if replacements.contains(&(s.line, suggested)) {
                    return false;
                }
            }
            seen_suggestions.insert((s.line, s.text.clone(), s.suggested.clone()))
        })
        .collect();

    (corrections, suggestions)
}
