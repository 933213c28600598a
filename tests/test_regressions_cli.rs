use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::{Value, json};
use tempfile::tempdir;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_es-filter")
}

fn write_file(path: &Path, content: &str) {
    fs::write(path, content).expect("failed to write test file");
}

const TIME_AND_STATUS: &str = r#"{
    "type": "BinaryExpression",
    "operator": "AND",
    "left": {
        "type": "BinaryExpression",
        "operator": ">=",
        "left": {"type": "Field", "name": "time"},
        "right": {"type": "MomentLiteral", "value": "2014-09-17T14:13:47Z"}
    },
    "right": {
        "type": "BinaryExpression",
        "operator": "<",
        "left": {"type": "NumberLiteral", "value": 300},
        "right": {"type": "Field", "name": "status"}
    }
}"#;

#[test]
fn test_compile_json_output() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    write_file(&ast, TIME_AND_STATUS);

    let output = Command::new(bin())
        .args(["-F", "json", "compile", ast.to_str().expect("utf8 path")])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let result: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(
        result,
        json!({
            "filter": {
                "bool": {
                    "must": [
                        { "range": { "time": { "gte": "2014-09-17T14:13:47.000Z" } } },
                        { "range": { "status": { "gt": 300 } } }
                    ]
                }
            },
            "filtered_fields": ["time", "status"]
        })
    );
}

#[test]
fn test_skip_field_flag_overrides_profile() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    let profile = dir.path().join("profile.toml");
    write_file(&ast, TIME_AND_STATUS);
    write_file(&profile, "[compiler]\nskip_field = \"status\"\n");

    let output = Command::new(bin())
        .args([
            "--config",
            profile.to_str().expect("utf8 path"),
            "--skip-field",
            "time",
            "-F",
            "json",
            "--compact",
            "compile",
            ast.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim().lines().count(), 1, "compact output: {stdout}");

    let result: Value = serde_json::from_str(stdout.trim()).unwrap();
    assert_eq!(result["filter"]["bool"]["must"][0], json!({ "match_all": {} }));
    assert_eq!(
        result["filter"]["bool"]["must"][1],
        json!({ "range": { "status": { "gt": 300 } } })
    );
}

#[test]
fn test_no_skip_field_disables_profile_setting() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    let profile = dir.path().join("profile.toml");
    write_file(&ast, TIME_AND_STATUS);
    write_file(&profile, "[compiler]\nskip_field = \"time\"\n");

    let output = Command::new(bin())
        .args([
            "--config",
            profile.to_str().expect("utf8 path"),
            "--no-skip-field",
            "-F",
            "json",
            "compile",
            ast.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        result["filter"]["bool"]["must"][0],
        json!({ "range": { "time": { "gte": "2014-09-17T14:13:47.000Z" } } })
    );
}

#[test]
fn test_fields_command_reports_skip_field() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    write_file(&ast, TIME_AND_STATUS);

    let output = Command::new(bin())
        .args([
            "--skip-field",
            "time",
            "-F",
            "json",
            "fields",
            ast.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["filtered_fields"], json!(["time", "status"]));
    assert_eq!(result["skip_field_referenced"], json!(true));
    assert_eq!(result["skipped_fields"], json!(["time"]));
    assert_eq!(result["fields"][1], json!({ "field": "status", "count": 1 }));
}

#[test]
fn test_fields_command_ignores_regex_on_skip_field() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    write_file(
        &ast,
        r#"{"type": "BinaryExpression", "operator": "=~",
            "left": {"type": "Field", "name": "time"},
            "right": {"type": "StringLiteral", "value": "a*"}}"#,
    );

    let json_out = Command::new(bin())
        .args(["--skip-field", "time", "-F", "json", "fields"])
        .arg(&ast)
        .output()
        .expect("command should run");
    assert!(json_out.status.success());
    let result: Value = serde_json::from_slice(&json_out.stdout).unwrap();
    assert_eq!(result["filtered_fields"], json!(["time"]));
    assert_eq!(result["skipped_fields"], json!([]));
    assert_eq!(result["skip_field_referenced"], json!(false));

    let text_out = Command::new(bin())
        .args(["--skip-field", "time", "--color", "never", "fields"])
        .arg(&ast)
        .output()
        .expect("command should run");
    assert!(text_out.status.success());
    let text = String::from_utf8_lossy(&text_out.stdout);
    assert!(!text.contains("match_all"), "got:\n{text}");
    assert!(!text.contains("yes"), "got:\n{text}");
}

#[test]
fn test_fields_command_reports_skipped_member_path() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    write_file(
        &ast,
        r#"{"type": "BinaryExpression", "operator": "<",
            "left": {"type": "MemberExpression",
                     "object": {"type": "Field", "name": "event"},
                     "property": {"type": "StringLiteral", "value": "time"}},
            "right": {"type": "NumberLiteral", "value": 10}}"#,
    );

    let json_out = Command::new(bin())
        .args(["--skip-field", "event.time", "-F", "json", "fields"])
        .arg(&ast)
        .output()
        .expect("command should run");
    assert!(json_out.status.success());
    let result: Value = serde_json::from_slice(&json_out.stdout).unwrap();
    assert_eq!(result["filtered_fields"], json!(["event"]));
    assert_eq!(result["skipped_fields"], json!(["event.time"]));
    assert_eq!(result["skip_field_referenced"], json!(true));

    let text_out = Command::new(bin())
        .args(["--skip-field", "event.time", "--color", "never", "fields"])
        .arg(&ast)
        .output()
        .expect("command should run");
    let text = String::from_utf8_lossy(&text_out.stdout);
    assert!(
        text.contains("Comparisons on 'event.time' were compiled to match_all."),
        "got:\n{text}"
    );
}

#[test]
fn test_text_output_written_to_file() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json5");
    let out = dir.path().join("out.txt");
    write_file(&ast, "{type: 'FulltextFilterTerm', text: 'disk full'}");

    let output = Command::new(bin())
        .args([
            "--color",
            "never",
            "-o",
            out.to_str().expect("utf8 path"),
            "compile",
            ast.to_str().expect("utf8 path"),
        ])
        .output()
        .expect("command should run");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let content = fs::read_to_string(&out).expect("output file should exist");
    assert!(content.contains("match_phrase"), "got:\n{content}");
    assert!(content.contains("No fields referenced."), "got:\n{content}");
}

#[test]
fn test_reads_ast_from_stdin() {
    let mut child = Command::new(bin())
        .args(["-F", "json", "compile", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("command should start");

    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(br#"{"type": "FulltextFilterTerm", "text": "oops"}"#)
        .expect("write stdin");

    let output = child.wait_with_output().expect("command should finish");
    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["filtered_fields"], json!([]));
}

#[test]
fn test_invalid_operator_exits_with_error() {
    let dir = tempdir().expect("temp dir");
    let ast = dir.path().join("filter.json");
    write_file(
        &ast,
        r#"{"type": "BinaryExpression", "operator": "~~",
            "left": {"type": "Field", "name": "a"},
            "right": {"type": "NumberLiteral", "value": 1}}"#,
    );

    let output = Command::new(bin())
        .args(["compile", ast.to_str().expect("utf8 path")])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid operator: ~~."), "stderr: {stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_missing_file_exits_with_error() {
    let output = Command::new(bin())
        .args(["compile", "/nonexistent/filter.json"])
        .output()
        .expect("command should run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/filter.json"), "stderr: {stderr}");
}
