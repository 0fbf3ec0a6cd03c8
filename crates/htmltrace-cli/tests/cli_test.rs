//! Runs the htmltrace binary inside a temporary working directory

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn htmltrace(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("htmltrace").unwrap();
    cmd.current_dir(cwd).env_remove("HTMLTRACE_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_write_without_sentinel_only_echoes() {
    let cwd = TempDir::new().unwrap();

    htmltrace(cwd.path())
        .args(["write", "Test", "message"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Test message"));

    assert!(!cwd.path().join("Trace Integra").exists());
}

#[test]
fn test_enable_then_write() {
    let cwd = TempDir::new().unwrap();

    htmltrace(cwd.path()).arg("enable").assert().success();
    assert!(cwd.path().join("TraceEnable.txt").is_file());

    htmltrace(cwd.path())
        .args(["--label", "TestApp", "write", "Processing", "42", "items"])
        .assert()
        .success();

    let content = fs::read_to_string(cwd.path().join("Trace TestApp/trace.html")).unwrap();
    assert!(content.starts_with("<!DOCTYPE html>"));
    assert!(content.contains("Processing 42 items"));
}

#[test]
fn test_error_commands_use_their_colors() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("Trace.txt"), "").unwrap();

    htmltrace(cwd.path())
        .args(["-l", "Errs", "-u", "User123", "error", "Connection", "failed:", "timeout"])
        .assert()
        .success();
    htmltrace(cwd.path())
        .args(["-l", "Errs", "session-error", "Session", "timeout"])
        .assert()
        .success();

    let content = fs::read_to_string(cwd.path().join("Trace Errs/trace.html")).unwrap();
    assert!(content.contains("<font color=\"red\">"));
    assert!(content.contains("User123 - ** Connection failed: timeout"));
    assert!(content.contains("<font color=\"LightSalmon\">"));
    assert!(content.contains("** Session timeout"));
}

#[test]
fn test_config_file_is_picked_up() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("TraceEnable.txt"), "").unwrap();
    fs::write(
        cwd.path().join("htmltrace.toml"),
        "label = \"FromFile\"\nuser_tag = \"Ops\"\n",
    )
    .unwrap();

    htmltrace(cwd.path())
        .args(["write", "--color", "cyan", "configured"])
        .assert()
        .success();

    let content = fs::read_to_string(cwd.path().join("Trace FromFile/trace.html")).unwrap();
    assert!(content.contains("<font color=\"cyan\">"));
    assert!(content.contains("Ops - configured"));
}

#[test]
fn test_invalid_limits_are_rejected() {
    let cwd = TempDir::new().unwrap();

    htmltrace(cwd.path())
        .args(["--label", "a/b", "write", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("path separators"));
}

#[test]
fn test_disable_removes_every_sentinel() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("TraceEnable.txt"), "").unwrap();
    fs::write(cwd.path().join("Trace.txt"), "").unwrap();

    htmltrace(cwd.path())
        .arg("disable")
        .assert()
        .success()
        .stdout(predicate::str::contains("2 sentinel file(s) removed"));

    assert!(!cwd.path().join("TraceEnable.txt").exists());
    assert!(!cwd.path().join("Trace.txt").exists());
}

#[test]
fn test_status_json_lists_files() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("TraceEnable.txt"), "").unwrap();

    htmltrace(cwd.path())
        .args(["-l", "Listed", "write", "hello"])
        .assert()
        .success();

    let output = htmltrace(cwd.path())
        .args(["-l", "Listed", "--json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["enabled"], true);
    assert_eq!(status["files"][0]["name"], "trace.html");
    assert_eq!(status["files"][0]["active"], true);
}

#[test]
fn test_demo_survives_panics() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("TraceEnable.txt"), "").unwrap();

    htmltrace(cwd.path())
        .args(["-l", "Demo", "demo", "--panic", "--workers", "3"])
        .assert()
        .success();

    let content = fs::read_to_string(cwd.path().join("Trace Demo/trace.html")).unwrap();
    assert!(content.contains("Bypassing exception (Something went wrong!)"));
    assert!(content.contains("Bypassing exception (Worker 3 encountered an error)"));
    assert!(content.contains("Worker 1 finished"));
    assert!(content.contains("Application finished"));
}

#[test]
fn test_write_with_closed_stdout_still_records() {
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("TraceEnable.txt"), "").unwrap();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("htmltrace"))
        .current_dir(cwd.path())
        .env_remove("HTMLTRACE_CONFIG")
        .env_remove("RUST_LOG")
        .args(["-l", "Pipe", "write", "hello-pipe"])
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    // Close the read end so the echo hits a broken pipe
    drop(child.stdout.take());

    let status = child.wait().unwrap();
    assert!(status.success());

    let content = fs::read_to_string(cwd.path().join("Trace Pipe/trace.html")).unwrap();
    assert!(content.contains("hello-pipe"));
}
