// Dictionary checker driving an ispell-compatible binary (aspell, hunspell) in pipe mode.
// Every unknown word becomes a spelling suggestion; nothing is auto-corrected.

use super::{CheckLevel, Checker};
use crate::chunker::Chunk;
use crate::config::Config;
use crate::error::{CheckerError, ConfigError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Spell checker speaking the `-a` pipe protocol
pub struct DictionaryChecker {
    program: PathBuf,
    lang: String,
}

impl DictionaryChecker {
    /// Resolves the configured binary on PATH; a missing binary is a configuration error
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let program = which::which(&config.dictionary_command).map_err(|_| ConfigError::MissingBinary {
            command: config.dictionary_command.clone(),
        })?;

        Ok(Self {
            program,
            lang: config.dictionary_lang.clone(),
        })
    }

    fn pipe_input(chunk: &Chunk<'_>) -> String {
        let mut input = String::new();
        for line in chunk.lines {
            // WHY: `^` stops a leading character from being read as a pipe-mode command
            input.push('^');
            input.push_str(line.trim_end_matches('\r'));
            input.push('\n');
        }
        input
    }
}

/// Turns pipe-mode output into suggestion records with absolute line numbers.
///
/// Each input line produces zero or more result lines followed by a blank line.
/// `&` lines carry candidates, `#` lines mark words with none; `*`, `-` and `+`
/// lines are accepted words.
pub fn parse_pipe_output(output: &str, chunk: &Chunk<'_>) -> Vec<Value> {
    let mut findings = Vec::new();
    let mut index = 0usize;

    for result in output.lines() {
        if result.starts_with("@(#)") {
            continue;
        }
        if result.trim().is_empty() {
            index += 1;
            continue;
        }
        if index >= chunk.line_count() {
            break;
        }

        let line = chunk.start_line + index;
        let (word, candidates) = match result.chars().next() {
            Some('&') => {
                // & <word> <count> <offset>: <candidate>, <candidate>, ...
                let (head, tail) = result.split_once(':').unwrap_or((result, ""));
                let word = head.split_whitespace().nth(1);
                let candidates: Vec<&str> = tail
                    .split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .collect();
                (word, candidates)
            }
            // # <word> <offset>
            Some('#') => (result.split_whitespace().nth(1), Vec::new()),
            _ => continue,
        };

        let Some(word) = word else {
            debug!("Ignoring unparseable spell-check line: {}", result);
            continue;
        };

        findings.push(json!({
            "type": "suggestion",
            "kind": "spelling",
            "line": line,
            "text": format!("Possible misspelling of '{word}'"),
            "suggested": candidates.first(),
            "context": word,
        }));
    }

    findings
}

#[async_trait]
impl Checker for DictionaryChecker {
    fn name(&self) -> &str {
        "dictionary"
    }

    async fn check(&self, chunk: &Chunk<'_>, _level: CheckLevel) -> Result<Vec<Value>, CheckerError> {
        let mut child = Command::new(&self.program)
            .arg("-a")
            .arg(format!("--lang={}", self.lang))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let input = Self::pipe_input(chunk);
        let writer = child.stdin.take().map(|mut stdin| {
            // WHY: feed stdin from its own task so a full stdout pipe cannot stall the write;
            // dropping stdin at the end of the task signals end of input
            tokio::spawn(async move { stdin.write_all(input.as_bytes()).await })
        });

        let output = child.wait_with_output().await?;
        if let Some(writer) = writer {
            writer
                .await
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
        }
        if !output.status.success() {
            return Err(CheckerError::MalformedResponse(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_pipe_output(&stdout, chunk))
    }
}
