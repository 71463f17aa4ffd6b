//! CLI integration tests for datacheck.
//!
//! These tests verify command-line argument parsing, help output,
//! exit codes for error conditions and end-to-end compare runs.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

/// Get a command for the datacheck binary.
fn cmd() -> Command {
    Command::cargo_bin("datacheck").unwrap()
}

const CONFIG: &str = r#"
source:
  type: mysql
  schema: test_db
sink:
  type: opengauss
  schema: test_db
check:
  untracked_tables: reject
  workers: 2
"#;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

fn data_file(rows: &[(&str, &str)]) -> NamedTempFile {
    let rows: Vec<String> = rows
        .iter()
        .map(|(id, name)| format!(r#"{{"id":"{}","name":"{}"}}"#, id, name))
        .collect();
    temp_file(&format!(
        r#"{{"tables":[{{
            "metadata":{{"table_name":"users","columns":[
                {{"name":"name","ordinal_pos":2}},
                {{"name":"id","ordinal_pos":1,"is_primary_key":true}}
            ]}},
            "rows":[{}]
        }}]}}"#,
        rows.join(",")
    ))
}

fn path(file: &NamedTempFile) -> &str {
    file.path().to_str().unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compare"))
        .stdout(predicate::str::contains("fingerprint"))
        .stdout(predicate::str::contains("dialect"));
}

#[test]
fn test_compare_subcommand_help() {
    cmd()
        .args(["compare", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--source-data"))
        .stdout(predicate::str::contains("--sink-data"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("datacheck"));
}

// =============================================================================
// Global Flags Tests
// =============================================================================

#[test]
fn test_global_flag_defaults() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output-json"))
        .stdout(predicate::str::contains("[default: config.yaml]"))
        .stdout(predicate::str::contains("[default: text]"))
        .stdout(predicate::str::contains("[default: info]"));
}

#[test]
fn test_no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_missing_config_exits_with_code_7() {
    let data = data_file(&[]);
    cmd()
        .args([
            "--config",
            "nonexistent_config_file.yaml",
            "compare",
            "--source-data",
            path(&data),
            "--sink-data",
            path(&data),
        ])
        .assert()
        .code(7);
}

#[test]
fn test_invalid_yaml_exits_with_code_1() {
    let config = temp_file("invalid: yaml: content: [");
    let data = data_file(&[]);
    cmd()
        .args([
            "--config",
            path(&config),
            "compare",
            "--source-data",
            path(&data),
            "--sink-data",
            path(&data),
        ])
        .assert()
        .code(1);
}

#[test]
fn test_unknown_database_type_exits_with_code_1() {
    cmd()
        .args(["dialect", "--db-type", "oracle"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown database type"));
}

#[test]
fn test_unknown_verbosity_exits_with_code_1() {
    cmd()
        .args(["--verbosity", "chatty", "dialect", "--db-type", "mysql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown verbosity"));
}

#[test]
fn test_unknown_log_format_exits_with_code_1() {
    cmd()
        .args(["--log-format", "xml", "dialect", "--db-type", "mysql"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown log format"));
}

#[test]
fn test_empty_data_sets_exit_with_code_2() {
    let config = temp_file(CONFIG);
    let data = temp_file(r#"{"tables":[]}"#);
    cmd()
        .args([
            "--config",
            path(&config),
            "compare",
            "--source-data",
            path(&data),
            "--sink-data",
            path(&data),
        ])
        .assert()
        .code(2);
}

#[test]
fn test_zero_workers_override_exits_with_code_1() {
    let config = temp_file(CONFIG);
    let data = data_file(&[("1", "ann")]);
    cmd()
        .args([
            "--config",
            path(&config),
            "compare",
            "--source-data",
            path(&data),
            "--sink-data",
            path(&data),
            "--workers",
            "0",
        ])
        .assert()
        .code(1);
}

// =============================================================================
// Command Tests
// =============================================================================

#[test]
fn test_compare_consistent() {
    let config = temp_file(CONFIG);
    let source = data_file(&[("1", "ann"), ("2", "bob")]);
    let sink = data_file(&[("2", "bob"), ("1", "ann")]);

    cmd()
        .args([
            "--config",
            path(&config),
            "compare",
            "--source-data",
            path(&source),
            "--sink-data",
            path(&sink),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tables consistent: 1"))
        .stdout(predicate::str::contains("Run complete: yes"));
}

#[test]
fn test_compare_reports_differences_as_json() {
    let config = temp_file(CONFIG);
    let source = data_file(&[("1", "ann"), ("2", "bob")]);
    let sink = data_file(&[("2", "rob"), ("3", "cy")]);

    let output = cmd()
        .args([
            "--config",
            path(&config),
            "--output-json",
            "compare",
            "--source-data",
            path(&source),
            "--sink-data",
            path(&sink),
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["tables_with_differences"], 1);
    assert_eq!(result["run_complete"], true);
    let diff = &result["tables"][0]["diff"];
    assert_eq!(diff["missing_in_sink"], serde_json::json!(["1"]));
    assert_eq!(diff["missing_in_source"], serde_json::json!(["3"]));
    assert_eq!(diff["mismatched"], serde_json::json!(["2"]));
}

#[test]
fn test_fingerprint_prints_rows() {
    let data = data_file(&[("1", "ann"), ("2", "bob")]);
    cmd()
        .args(["fingerprint", "--data", path(&data)])
        .assert()
        .success()
        .stdout(predicate::str::contains("users\t1\t"))
        .stdout(predicate::str::contains("users\t2\t"));
}

#[test]
fn test_dialect_quoting() {
    cmd()
        .args([
            "dialect",
            "--db-type",
            "mssql",
            "--ident",
            "orders",
            "--condition",
            "`id` = 'x`y'",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Identifier: [orders]"))
        .stdout(predicate::str::contains("Condition: [id] = 'x`y'"));
}
