// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use proofmark::chunker::Chunk;
use proofmark::error::CheckerError;
use proofmark::{CheckLevel, Checker};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Test fixture helper for creating temporary directories with documents
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Create a document with given content
    pub fn create_document<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    pub fn read<P: AsRef<Path>>(&self, relative_path: P) -> String {
        fs::read_to_string(self.root_path.join(relative_path)).expect("Failed to read output file")
    }

    pub fn exists<P: AsRef<Path>>(&self, relative_path: P) -> bool {
        self.root_path.join(relative_path).exists()
    }
}

/// Checker returning canned findings per chunk start line; unknown chunks get none
pub struct StubChecker {
    replies: Vec<(usize, Result<Vec<Value>, String>)>,
    pub calls: Mutex<Vec<(usize, usize)>>,
}

impl StubChecker {
    pub fn new(replies: Vec<(usize, Result<Vec<Value>, String>)>) -> Self {
        Self {
            replies,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Same findings for whichever chunk starts at line 1
    pub fn single_chunk(findings: Vec<Value>) -> Self {
        Self::new(vec![(1, Ok(findings))])
    }
}

#[async_trait]
impl Checker for StubChecker {
    fn name(&self) -> &str {
        "stub"
    }

    async fn check(&self, chunk: &Chunk<'_>, _level: CheckLevel) -> Result<Vec<Value>, CheckerError> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((chunk.start_line, chunk.end_line()));
        match self.replies.iter().find(|(start, _)| *start == chunk.start_line) {
            Some((_, Ok(findings))) => Ok(findings.clone()),
            Some((_, Err(message))) => Err(CheckerError::MalformedResponse(message.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Compare two strings line by line, providing detailed diff on mismatch
pub fn assert_golden_file(actual: &str, expected: &str, context: &str) {
    let actual_lines: Vec<&str> = actual.split('\n').collect();
    let expected_lines: Vec<&str> = expected.split('\n').collect();

    for (i, (actual_line, expected_line)) in actual_lines.iter().zip(expected_lines.iter()).enumerate() {
        if actual_line != expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {:?}\nActual:   {:?}",
                context, i + 1, expected_line, actual_line
            );
        }
    }

    if actual_lines.len() != expected_lines.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context, expected_lines.len(), actual_lines.len()
        );
    }
}
