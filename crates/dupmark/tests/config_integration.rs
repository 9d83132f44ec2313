//! Configuration integration tests.
//!
//! Config discovery, formats, and precedence, checked end to end through
//! `info --json` and through the effect settings have on `ranges` and
//! `check`.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[allow(deprecated)]
fn cmd() -> Command {
    Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap()
}

/// Run `info --json` from `dir` and return the `config` object.
fn config_json(dir: &Path) -> Value {
    let output = cmd()
        .args(["-C", dir.to_str().unwrap(), "info", "--json"])
        .env_remove("DUPMARK_HIGHLIGHT_COLOR")
        .output()
        .expect("failed to run command");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).expect("invalid JSON output");
    json["config"].clone()
}

// =============================================================================
// Discovery
// =============================================================================

#[test]
fn defaults_without_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = config_json(tmp.path());

    assert!(config["config_file"].is_null());
    assert_eq!(config["log_level"], "info");
    assert_eq!(config["highlight_color"], "#8cf5b7");
    assert_eq!(config["addressing"], "offset");
    assert!(config.get("extra_stopwords").is_none());
}

#[test]
fn finds_dotfile_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.toml"),
        r##"highlight_color = "#ffcc00""##,
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["highlight_color"], "#ffcc00");
    let reported = config["config_file"].as_str().unwrap();
    assert!(reported.ends_with(".dupmark.toml"), "reported: {reported}");
}

#[test]
fn regular_name_beats_dotfile() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"addressing = "offset""#).unwrap();
    fs::write(tmp.path().join("dupmark.toml"), r#"addressing = "line-column""#).unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["addressing"], "line-column");
}

#[test]
fn finds_config_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    let nested = tmp.path().join("drafts").join("2026");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
        tmp.path().join(".dupmark.toml"),
        r#"extra_stopwords = ["Really", "quite"]"#,
    )
    .unwrap();

    let config = config_json(&nested);
    assert_eq!(config["extra_stopwords"], serde_json::json!(["quite", "really"]));
}

#[test]
fn closer_config_wins() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"log_level = "error""#).unwrap();
    fs::write(project.join(".dupmark.toml"), r#"log_level = "warn""#).unwrap();

    let config = config_json(&project);
    assert_eq!(config["log_level"], "warn");
}

#[test]
fn git_boundary_stops_search() {
    let tmp = TempDir::new().unwrap();
    let repo = tmp.path().join("repo");
    let docs = repo.join("docs");
    fs::create_dir_all(&docs).unwrap();
    fs::create_dir(repo.join(".git")).unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"log_level = "error""#).unwrap();

    let config = config_json(&docs);
    assert!(config["config_file"].is_null());
    assert_eq!(config["log_level"], "info");
}

// =============================================================================
// Formats
// =============================================================================

#[test]
fn parses_yaml_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.yaml"),
        "addressing: line-column\nmax_input_bytes: 1024\n",
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["addressing"], "line-column");
    assert_eq!(config["max_input_bytes"], 1024);
}

#[test]
fn parses_json_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.json"),
        r#"{"disable_input_limit": true}"#,
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert!(config.get("max_input_bytes").is_none());
}

#[test]
fn unknown_fields_are_ignored() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.toml"),
        "log_level = \"warn\"\nfont = \"mono\"\n",
    )
    .unwrap();

    let config = config_json(tmp.path());
    assert_eq!(config["log_level"], "warn");
}

// =============================================================================
// Precedence
// =============================================================================

#[test]
fn explicit_config_overrides_discovered() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"log_level = "warn""#).unwrap();
    let explicit = tmp.path().join("override.toml");
    fs::write(&explicit, r#"log_level = "error""#).unwrap();

    let output = cmd()
        .args([
            "-C",
            tmp.path().to_str().unwrap(),
            "--config",
            explicit.to_str().unwrap(),
            "info",
            "--json",
        ])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["log_level"], "error");
    let reported = json["config"]["config_file"].as_str().unwrap();
    assert!(reported.ends_with("override.toml"), "reported: {reported}");
}

#[test]
fn env_overrides_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.toml"),
        r##"highlight_color = "#ffcc00""##,
    )
    .unwrap();

    let output = cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info", "--json"])
        .env("DUPMARK_HIGHLIGHT_COLOR", "#112233")
        .output()
        .expect("failed to run command");
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["config"]["highlight_color"], "#112233");
}

// =============================================================================
// Effect on commands
// =============================================================================

#[test]
fn extra_stopwords_silence_check() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"extra_stopwords = ["really"]"#).unwrap();
    fs::write(tmp.path().join("draft.txt"), "really really good").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check", "draft.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));
}

#[test]
fn configured_addressing_applies_to_ranges() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), r#"addressing = "line-column""#).unwrap();
    fs::write(tmp.path().join("draft.txt"), "cat\ncat").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "ranges", "draft.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0-1.3"))
        .stdout(predicate::str::contains("2.0-2.3"));
}

#[test]
fn configured_input_limit_rejects_large_file() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), "max_input_bytes = 8").unwrap();
    fs::write(tmp.path().join("draft.txt"), "more than eight bytes").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "check", "draft.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("input too large"));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn invalid_toml_reports_configuration_error() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".dupmark.toml"), "not toml [[[").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration"));
}

#[test]
fn invalid_configured_color_fails_mark() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".dupmark.toml"),
        r#"highlight_color = "green""#,
    )
    .unwrap();
    fs::write(tmp.path().join("draft.txt"), "cat cat").unwrap();

    cmd()
        .args(["-C", tmp.path().to_str().unwrap(), "mark", "draft.txt"])
        .env_remove("DUPMARK_HIGHLIGHT_COLOR")
        .assert()
        .failure()
        .stderr(predicate::str::contains("highlight color"));
}
