//! CLI smoke tests for the feast-cli binary
//!
//! These run the built binary against the in-memory backend (`--mock`) so no
//! network is needed, feeding the interactive commands through stdin.

use std::io::Write;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Run feast-cli with `args` in an isolated home directory.
fn run_feast_cli(args: &[&str], stdin: &str) -> Output {
    let home = TempDir::new().expect("Failed to create temp dir");
    let mut child = Command::new(env!("CARGO_BIN_EXE_feast-cli"))
        .args(args)
        .env("HOME", home.path())
        .env("USERPROFILE", home.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute feast-cli");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(stdin.as_bytes())
        .expect("Failed to write stdin");
    child.wait_with_output().expect("Failed to wait for feast-cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_feast_cli(&["--help"], "");

    assert!(output.status.success(), "Help command should succeed");
    let out = stdout(&output);
    assert!(out.contains("feast-cli"), "Should contain binary name");
    assert!(out.contains("Usage:"), "Should contain usage information");
    for sub in ["shell", "menu", "dashboard", "watch-orders", "check"] {
        assert!(out.contains(sub), "Should list '{sub}' subcommand");
    }
    assert!(out.contains("--config"), "Should mention config option");
    assert!(out.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_feast_cli(&["--version"], "");

    assert!(output.status.success(), "Version command should succeed");
    let out = stdout(&output);
    assert!(out.contains("feast-cli"));
    assert!(out.chars().any(|c| c.is_ascii_digit()));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_feast_cli(&["invalid-command"], "");

    assert!(!output.status.success(), "Invalid command should fail");
    assert!(stderr(&output).contains("error"));
}

#[test]
fn test_cli_invalid_language() {
    let output = run_feast_cli(&["--mock", "--lang", "de", "menu"], "");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported language"));
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_feast_cli(&["--config", "/nonexistent/config.yaml", "check"], "");

    assert!(!output.status.success(), "Should fail with missing config");
    assert!(
        stderr(&output).contains("Config file not found"),
        "Should mention config file issue: {}",
        stderr(&output)
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").expect("Failed to write file");

    let output = run_feast_cli(&["--config", config_path.to_str().unwrap(), "check"], "");

    assert!(!output.status.success(), "Should fail with invalid YAML");
    assert!(
        stderr(&output).contains("Failed to parse config file"),
        "Should mention parsing issue: {}",
        stderr(&output)
    );
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("valid.yaml");
    let config_content = format!(
        r#"
app:
  home_dir: "{home}"

backend:
  base_url: "http://localhost:8080"
  timeout_sec: 3

logging:
  default:
    console_level: warn
    file: "logs/feast.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10

modules:
  feast:
    language: ar
    transition_policy: lifecycle
"#,
        home = temp_dir.path().join("home").display()
    );
    std::fs::write(&config_path, config_content).expect("Failed to write config file");

    let output = run_feast_cli(&["--config", config_path.to_str().unwrap(), "check"], "");

    assert!(
        output.status.success(),
        "Valid config should pass: {}",
        stderr(&output)
    );
    let out = stdout(&output);
    assert!(out.contains("Configuration check passed"));
    assert!(out.contains("http://localhost:8080"));
    assert!(out.contains("Language: ar, order transitions: Lifecycle"));
}

#[test]
fn test_cli_print_config() {
    let output = run_feast_cli(&["--base-url", "http://api.test", "--print-config"], "");

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("http://api.test"));
    assert!(out.contains("logging:"));
}

#[test]
fn test_cli_menu_with_mock_backend() {
    let output = run_feast_cli(&["--mock", "--lang", "fr", "menu"], "");

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("== Entrées =="));
    assert!(out.contains("Couscous"));
    assert!(out.contains("(unavailable)"));
}

#[test]
fn test_cli_dashboard_requires_password() {
    let output = run_feast_cli(&["--mock", "dashboard"], "wrong\n");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("4 attempt(s) left"));
    assert!(stderr(&output).contains("Admin access required"));

    let output = run_feast_cli(&["--mock", "dashboard"], "admin123\n");
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Dishes          7"));
    assert!(out.contains("Dishes per category"));
}

#[test]
fn test_cli_shell_checkout_flow() {
    let script = "\
add couscous 2
add makrout
cart
checkout
Nadia
0550 11 22 33
5 Boulevard Zighout Youcef
nadia@mail.dz

checkout
quit
";
    let output = run_feast_cli(&["--mock", "shell"], script);

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    let err = stderr(&output);
    assert!(out.contains("Added 2 × Couscous"));
    assert!(err.contains("Dish 'Makrout' is currently unavailable"));
    assert!(out.contains("24.00 DA"));
    assert!(out.contains("Order placed!"));
    assert!(out.contains("Order reference:"));
    assert!(err.contains("Your cart is empty"));
}

#[test]
fn test_cli_shell_admin_flow() {
    let script = "\
orders
login admin123
dish toggle couscous
dishes couscous
users
filter delivered
quit
";
    let output = run_feast_cli(&["--mock"], script);

    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(stderr(&output).contains("Admin access required"));
    assert!(out.contains("Admin dashboard unlocked"));
    assert!(out.contains("couscous is now unavailable"));
    assert!(out.contains("1 dish(es)"));
    assert!(out.contains("total 0 | active 0"));
    assert!(out.contains("Showing delivered orders"));
}
