// Integration tests for the proofmark binary: exit codes, output files and stdout payloads
// WHY: callers script against the exit status and the JSON on stdout, so both are contract

#[path = "integration/mod.rs"]
mod test_utils;

#[path = "integration/fixtures/mod.rs"]
mod fixtures;

use fixtures::{ESSAY_FINAL, ESSAY_PROOFREAD};
use serde_json::{json, Value};
use std::process::{Command, Output};
use test_utils::{assert_golden_file, TestFixture};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY_VARS: [&str; 2] = ["PROOFMARK_API_KEY", "OPENAI_API_KEY"];

/// Command for the built binary, isolated from the caller's environment and .env files
fn proofmark(fixture: &TestFixture) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_proofmark"));
    cmd.current_dir(&fixture.root_path).env("RUST_LOG", "warn");
    for var in KEY_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON payload")
}

#[test]
fn test_resolve_without_ids_is_usage_error() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.proofread.md", ESSAY_PROOFREAD);

    let output = proofmark(&fixture)
        .args(["resolve", "notes.proofread.md"])
        .output()
        .expect("Failed to run proofmark");

    assert_eq!(output.status.code(), Some(2));
    assert!(!fixture.exists("notes.final.md"));
}

#[test]
fn test_resolve_with_bad_id_is_usage_error_and_writes_nothing() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.proofread.md", ESSAY_PROOFREAD);

    let output = proofmark(&fixture)
        .args(["resolve", "notes.proofread.md", "S1", "banana"])
        .output()
        .expect("Failed to run proofmark");

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("banana"), "stderr should name the bad id: {stderr}");
    assert!(!fixture.exists("notes.final.md"));
}

#[test]
fn test_resolve_writes_final_document_and_reports_ids() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.proofread.md", ESSAY_PROOFREAD);

    let output = proofmark(&fixture)
        .args(["resolve", "notes.proofread.md", "s2"])
        .output()
        .expect("Failed to run proofmark");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_golden_file(&fixture.read("notes.final.md"), ESSAY_FINAL, "resolved file");
    assert_eq!(fixture.read("notes.proofread.md"), ESSAY_PROOFREAD);

    let report = stdout_json(&output);
    assert_eq!(report["applied"], json!(["S2"]));
    assert_eq!(report["removed"], json!(["S1", "S3"]));
}

#[test]
fn test_resolve_missing_input_is_runtime_failure() {
    let fixture = TestFixture::new();

    let output = proofmark(&fixture)
        .args(["resolve", "absent.proofread.md", "all"])
        .output()
        .expect("Failed to run proofmark");

    assert_eq!(output.status.code(), Some(1));
    assert!(!fixture.exists("absent.final.md"));
}

#[test]
fn test_pending_lists_markers_in_document_order() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.proofread.md", ESSAY_PROOFREAD);

    let output = proofmark(&fixture)
        .args(["pending", "notes.proofread.md"])
        .output()
        .expect("Failed to run proofmark");

    assert!(output.status.success());
    let report = stdout_json(&output);
    let pending = report["pending"].as_array().expect("pending array");
    assert_eq!(pending.len(), 3);
    assert_eq!(
        pending[0],
        json!({"line": 5, "id": "S1", "text": "Cliched opening", "suggested": "The night was dark and stormy."})
    );
    assert_eq!(pending[2], json!({"line": 8, "id": "S3", "text": "Consider parallel structure", "suggested": null}));
}

#[test]
fn test_proofread_without_api_key_fails_before_writing() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.md", "Teh cat sat.\n");

    let output = proofmark(&fixture)
        .args(["proofread", "notes.md", "--no-progress"])
        .output()
        .expect("Failed to run proofmark");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(!fixture.exists("notes.proofread.md"));
}

#[test]
fn test_unknown_level_is_usage_error() {
    let fixture = TestFixture::new();
    fixture.create_document("notes.md", "Teh cat sat.\n");

    let output = proofmark(&fixture)
        .args(["proofread", "notes.md", "--level", "extreme"])
        .output()
        .expect("Failed to run proofmark");

    assert_eq!(output.status.code(), Some(2));
    assert!(!fixture.exists("notes.proofread.md"));
}

#[tokio::test]
async fn test_proofread_against_mock_model_writes_intermediate_file() {
    let server = MockServer::start().await;
    let findings = json!([
        {"type": "correction", "kind": "spelling", "line": 1, "from": "Teh", "to": "The"},
        {"type": "suggestion", "kind": "clarity", "line": 2, "text": "Say which mat", "suggested": "It sat on the red mat."}
    ]);
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": findings.to_string()}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fixture = TestFixture::new();
    fixture.create_document("notes.md", "Teh cat sat.\nIt sat on the mat.\n");

    let mut cmd = tokio::process::Command::from(proofmark(&fixture));
    let output = cmd
        .args(["proofread", "notes.md", "--no-progress"])
        .env("PROOFMARK_API_KEY", "test-key")
        .env("PROOFMARK_API_BASE", server.uri())
        .output()
        .await
        .expect("Failed to run proofmark");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        fixture.read("notes.proofread.md"),
        "The cat sat.\nIt sat on the mat. <!-- [S1] REVIEW: Say which mat Suggested: \"It sat on the red mat.\" -->\n"
    );
    assert_eq!(fixture.read("notes.md"), "Teh cat sat.\nIt sat on the mat.\n");

    let report = stdout_json(&output);
    assert_eq!(report["checker"], "llm");
    assert_eq!(report["level"], "standard");
    assert_eq!(report["corrections"].as_array().map(Vec::len), Some(1));
    assert_eq!(report["suggestions"][0]["id"], "S1");
    assert_eq!(report["chunks_failed"], 0);
}

#[tokio::test]
async fn test_proofread_survives_model_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let fixture = TestFixture::new();
    fixture.create_document("notes.md", "Teh cat sat.\n");

    let mut cmd = tokio::process::Command::from(proofmark(&fixture));
    let output = cmd
        .args(["proofread", "notes.md", "--no-progress", "--output", "out/checked.md"])
        .env("PROOFMARK_API_KEY", "test-key")
        .env("PROOFMARK_API_BASE", server.uri())
        .output()
        .await
        .expect("Failed to run proofmark");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(fixture.read("out/checked.md"), "Teh cat sat.\n");
    let report = stdout_json(&output);
    assert_eq!(report["chunks_total"], 1);
    assert_eq!(report["chunks_failed"], 1);
}
