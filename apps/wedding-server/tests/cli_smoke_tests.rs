//! CLI smoke tests for the wedding-server binary

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn run_wedding_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wedding-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute wedding-server")
}

async fn run_wedding_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_wedding-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Config rooted in `dir` so nothing lands in the real home directory.
fn write_config(dir: &Path, name: &str, body: &str) -> String {
    let home = dir.join("home").to_string_lossy().replace('\\', "/");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0
{body}
"#
    );
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_wedding_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wedding-server"));
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("export-report"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--mock"));
}

#[test]
fn test_cli_version_command() {
    let output = run_wedding_server(&["--version"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wedding-server"));
    assert!(stdout.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_wedding_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "{stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_wedding_server(&["--config", "/nonexistent/config.yaml", "check"]);
    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file not found"), "{stderr}");
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_wedding_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "{stderr}");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "valid.yaml",
        r#"
database:
  url: "sqlite://database/rsvp.db"

logging:
  default:
    console_level: warn
    file: "logs/wedding.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10

modules:
  rsvp:
    admin:
      username: "sposi"
      password: "segreto"
    default_language: "sq"
"#,
    );

    let output = run_wedding_server(&["--config", &config_path, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Configuration check passed"));
}

#[test]
fn test_cli_check_rejects_bad_module_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "bad.yaml",
        r#"
modules:
  rsvp:
    default_language: "en"
"#,
    );

    let output = run_wedding_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("default_language"), "{stderr}");
}

#[test]
fn test_cli_mock_flag_skips_database_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "mock.yaml",
        r#"
database:
  url: "mysql://localhost/nonexistent"
"#,
    );

    let output = run_wedding_server(&["--config", &config_path, "check"]);
    assert!(!output.status.success(), "mysql is not a supported backend");

    let output = run_wedding_server(&["--config", &config_path, "--mock", "check"]);
    assert!(
        output.status.success(),
        "STDERR: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_print_config_shows_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "print.yaml", "");

    let output = run_wedding_server(&["--config", &config_path, "--port", "9191", "--print-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("server:"));
    assert!(stdout.contains("9191"));
}

#[test]
fn test_cli_export_report_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "export.yaml",
        r#"
database:
  url: "sqlite://database/rsvp.db"
"#,
    );
    let out = temp_dir.path().join("out/report.pdf");

    let output = run_wedding_server(&[
        "--config",
        &config_path,
        "--mock",
        "export-report",
        "--out",
        out.to_str().unwrap(),
    ]);
    assert!(
        output.status.success(),
        "STDERR: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let bytes = std::fs::read(&out).expect("report written");
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_cli_run_command_with_sqlite_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        "run.yaml",
        r#"
database:
  url: "sqlite://database/rsvp.db"
"#,
    );

    let result = run_wedding_server_with_timeout(
        &["--config", &config_path, "run"],
        Duration::from_secs(5),
    )
    .await;

    match result {
        // Still serving when the timeout fired
        Err(err) if err.to_string().contains("elapsed") => {}
        Err(err) => panic!("Server failed to start: {err}"),
        Ok(output) => panic!(
            "Server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
    }

    assert!(temp_dir.path().join("home/database/rsvp.db").exists());
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_wedding_server(&["export-report", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--out"));
}
