//! AI-model checker speaking the OpenAI-compatible chat-completions protocol.
//!
//! The model receives the chunk with every line prefixed by its absolute line number
//! and is asked for a JSON array of findings. Replies wrapped in Markdown fences or
//! surrounded by prose are tolerated; anything without a JSON array is a
//! [`CheckerError::MalformedResponse`].

use super::{CheckLevel, Checker};
use crate::chunker::Chunk;
use crate::config::Config;
use crate::error::CheckerError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

const BASE_INSTRUCTIONS: &str = r#"You are a meticulous proofreader for Markdown documents.
Report problems as a JSON array and nothing else. Each element is one of:
{"type": "correction", "kind": "spelling"|"grammar"|"punctuation", "line": <number>, "from": "<exact text on that line>", "to": "<replacement>", "reason": "<short reason>"}
{"type": "suggestion", "kind": "style"|"clarity"|"spelling", "line": <number>, "text": "<short description>", "suggested": "<replacement text>" or null}
Rules:
- "line" is the number shown before the `|` on the input line.
- "from" must be copied exactly from that line, without the number prefix.
- Use corrections only for unambiguous mistakes; anything debatable is a suggestion.
- Never change code blocks, inline code, URLs or Markdown syntax.
- Descriptions and replacements must be single-line and must not contain "-->".
- Return [] when there is nothing to report."#;

/// Checker backed by a chat-completions endpoint
pub struct LlmChecker {
    api_key: String,
    model: String,
    endpoint: String,
    client: Client,
}

impl LlmChecker {
    /// Builds the HTTP client from configuration; the API key must already be validated
    pub fn new(config: &Config) -> Result<Self, CheckerError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;

        Ok(Self {
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model.clone(),
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            client,
        })
    }
}

/// System prompt for the given level
pub fn system_prompt(level: CheckLevel) -> String {
    let scope = match level {
        CheckLevel::Minimal => {
            "Scope: spelling mistakes and obvious typos only. Do not report grammar, punctuation or style."
        }
        CheckLevel::Standard => {
            "Scope: spelling, grammar and punctuation corrections, plus clarity suggestions. Do not report style preferences."
        }
        CheckLevel::Thorough => {
            "Scope: spelling, grammar and punctuation corrections, plus clarity and style suggestions."
        }
    };
    format!("{BASE_INSTRUCTIONS}\n{scope}")
}

/// User message: the chunk with absolute line numbers
pub fn user_prompt(chunk: &Chunk<'_>) -> String {
    let mut prompt = format!(
        "Proofread the following text. Line numbering starts at {}.\n\n",
        chunk.start_line
    );
    for (number, line) in chunk.numbered_lines() {
        prompt.push_str(&format!("{number}| {line}\n"));
    }
    prompt
}

/// Pulls the findings array out of a model reply
pub fn extract_findings(content: &str) -> Result<Vec<Value>, CheckerError> {
    let trimmed = content.trim();

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        match value {
            Value::Array(items) => return Ok(items),
            Value::Object(mut map) => {
                if let Some(Value::Array(items)) = map.remove("findings") {
                    return Ok(items);
                }
            }
            _ => {}
        }
    }

    let (Some(open), Some(close)) = (trimmed.find('['), trimmed.rfind(']')) else {
        return Err(CheckerError::MalformedResponse(preview(trimmed)));
    };
    if close < open {
        return Err(CheckerError::MalformedResponse(preview(trimmed)));
    }

    serde_json::from_str::<Vec<Value>>(&trimmed[open..=close])
        .map_err(|e| CheckerError::MalformedResponse(format!("{e}: {}", preview(trimmed))))
}

fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[async_trait]
impl Checker for LlmChecker {
    fn name(&self) -> &str {
        "llm"
    }

    async fn check(&self, chunk: &Chunk<'_>, level: CheckLevel) -> Result<Vec<Value>, CheckerError> {
        let body = json!({
            "model": self.model,
            "temperature": 0,
            "messages": [
                {"role": "system", "content": system_prompt(level)},
                {"role": "user", "content": user_prompt(chunk)},
            ],
        });

        debug!(
            "Requesting findings for lines {}-{} from {}",
            chunk.start_line,
            chunk.end_line(),
            self.model
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CheckerError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| CheckerError::MalformedResponse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| CheckerError::MalformedResponse("missing message content".to_string()))?;

        extract_findings(content)
    }
}
