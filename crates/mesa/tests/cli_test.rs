//! Integration tests for the `mesa` CLI binary.
//!
//! Argument parsing, help output, completions and config handling run
//! without a backend; session and collection commands run against a
//! wiremock server with a token file in a temp directory.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mesa` binary with env isolation.
///
/// Clears all `MESA_*` env vars and points config directories into
/// `home` so tests never touch the user's real configuration.
fn mesa_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mesa");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("XDG_DATA_HOME", home.join(".local/share"))
        .env_remove("MESA_PROFILE")
        .env_remove("MESA_SERVER")
        .env_remove("MESA_RESTAURANT")
        .env_remove("MESA_USER")
        .env_remove("MESA_TOKEN_FILE")
        .env_remove("MESA_OUTPUT")
        .env_remove("MESA_INSECURE")
        .env_remove("MESA_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = mesa_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("reservations")
            .and(predicate::str::contains("promotions"))
            .and(predicate::str::contains("login")),
    );
}

#[test]
fn test_version_flag() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mesa"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_zsh() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let home = TempDir::new().unwrap();
    let output = mesa_cmd(home.path()).arg("foobar").output().unwrap();
    assert!(!output.status.success(), "Expected failure for invalid subcommand");
    let text = combined_output(&output);
    assert!(text.contains("foobar"), "Expected error mentioning subcommand:\n{text}");
}

#[test]
fn test_reviews_have_no_delete() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["reviews", "delete", "1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_unknown_profile_lists_alternatives() {
    let home = TempDir::new().unwrap();
    let output = mesa_cmd(home.path())
        .args(["--profile", "staging", "status"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(text.contains("staging"), "Expected profile name in error:\n{text}");
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_under_config_home() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_show() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["config", "set", "restaurant_id", "7"])
        .assert()
        .success();

    mesa_cmd(home.path())
        .args(["-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"restaurant_id\": \"7\""));

    mesa_cmd(home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = mesa_cmd(home.path())
        .args(["config", "set", "colour", "red"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("colour"));
}

#[test]
fn test_config_use_missing_profile_fails() {
    let home = TempDir::new().unwrap();
    mesa_cmd(home.path())
        .args(["config", "use", "prod"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("prod"));
}

/// Write `contents` to the config file `mesa config path` reports.
fn write_config(home: &Path, contents: &str) -> std::path::PathBuf {
    let output = mesa_cmd(home).args(["config", "path"]).output().unwrap();
    let path = std::path::PathBuf::from(String::from_utf8(output.stdout).unwrap().trim());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_broken_config_is_never_overwritten() {
    let home = TempDir::new().unwrap();
    let broken = "default_profile = \"work\"\n[profiles.work\nserver = \"http://10.0.0.5:8080\"\n";
    let path = write_config(home.path(), broken);

    for args in [
        vec!["config", "set", "server", "http://127.0.0.1:9000"],
        vec!["config", "use", "work"],
    ] {
        mesa_cmd(home.path())
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Configuration error"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }
}

#[test]
fn test_broken_config_warns_before_falling_back() {
    let home = TempDir::new().unwrap();
    write_config(home.path(), "[profiles.work\n");
    let token = home.path().join("token");

    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["-o", "plain", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("anonymous"))
        .stderr(predicate::str::contains("unreadable config file"));
}

// ── Session ─────────────────────────────────────────────────────────

#[test]
fn test_status_without_token_is_anonymous() {
    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["-o", "plain", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("anonymous"));
}

#[test]
fn test_short_password_rejected_before_any_request() {
    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    // Port 9 is never contacted: validation fails first.
    let output = mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", "http://127.0.0.1:9", "login", "a@b.c", "--password", "short"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(!token.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_then_status_then_logout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_json(json!({ "email": "a@b.c", "password": "password1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "abc" })))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");

    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "login", "a@b.c", "--password", "password1"])
        .assert()
        .success();
    assert_eq!(std::fs::read_to_string(&token).unwrap(), "abc");

    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["-o", "plain", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("authenticated"));

    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .arg("logout")
        .assert()
        .success();
    assert!(!token.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    let output = mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "login", "a@b.c", "--password", "password1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(!token.exists());
}

// ── Collections ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_reservations_list_is_scoped_and_authorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reservas"))
        .and(query_param("restaurantId", "7"))
        .and(header("Authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "fechaHora": "2024-01-01T10:00", "estado": "CONFIRMED" },
            { "id": 2, "fechaHora": "2024-01-02T21:30", "estado": "PENDING" }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    std::fs::write(&token, "abc").unwrap();

    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "-r", "7", "-o", "plain", "reservations", "list"])
        .assert()
        .success()
        .stdout(predicate::eq("1\n2\n"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_with_missing_fields_is_usage_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    let output = mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "-r", "1", "promotions", "create"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("descripcion"), "Expected missing field names:\n{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_refetches_list() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/eventos/4"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/eventos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "--yes", "events", "delete", "4"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Event 4 deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_without_yes_in_non_tty_is_refused() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let home = TempDir::new().unwrap();
    let token = home.path().join("token");
    mesa_cmd(home.path())
        .arg("--token-file")
        .arg(&token)
        .args(["--server", &server.uri(), "locations", "delete", "4"])
        .assert()
        .failure()
        .code(2);
}
