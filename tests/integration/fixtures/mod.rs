// Test fixtures: documents and the checker replies that go with them
// WHY: golden-file testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

use serde_json::{json, Value};

/// Markdown document with a few planted mistakes
pub const ESSAY: &str = "# On Proofreading\n\
\n\
Teh first paragraph introduces the topic.\n\
This line has no problems at all.\n\
It were a dark and stormy night.\n\
\n\
- A list item that is fine\n\
- Another item whose phrasing could be much more concise than it currently is\n";

/// Findings a checker would report for ESSAY when it is sent as one chunk
pub fn essay_findings() -> Vec<Value> {
    vec![
        json!({"type": "correction", "kind": "spelling", "line": 3, "from": "Teh", "to": "The", "reason": "typo"}),
        json!({"type": "suggestion", "kind": "clarity", "line": 5, "text": "Cliched opening", "suggested": "The night was dark and stormy."}),
        json!({"type": "correction", "kind": "grammar", "line": 5, "from": "It were", "to": "It was"}),
        json!({"type": "suggestion", "kind": "style", "line": 8, "text": "Wordy list item", "suggested": "Another, shorter item"}),
        json!({"type": "suggestion", "kind": "style", "line": 8, "text": "Consider parallel structure", "suggested": null}),
    ]
}

/// Expected intermediate document for ESSAY + essay_findings()
pub const ESSAY_PROOFREAD: &str = "# On Proofreading\n\
\n\
The first paragraph introduces the topic.\n\
This line has no problems at all.\n\
It was a dark and stormy night. <!-- [S1] REVIEW: Cliched opening Suggested: \"The night was dark and stormy.\" -->\n\
\n\
- A list item that is fine\n\
- Another item whose phrasing could be much more concise than it currently is <!-- [S2] REVIEW: Wordy list item Suggested: \"Another, shorter item\" --> <!-- [S3] REVIEW: Consider parallel structure -->\n";

/// Expected final document for ESSAY_PROOFREAD with any resolution set
pub const ESSAY_FINAL: &str = "# On Proofreading\n\
\n\
The first paragraph introduces the topic.\n\
This line has no problems at all.\n\
It was a dark and stormy night.\n\
\n\
- A list item that is fine\n\
- Another item whose phrasing could be much more concise than it currently is\n";
