//! Integration tests for the `mast` CLI binary.
//!
//! URL resolution is checked with `--print-url`, which never touches the
//! network; request flow is checked against a local wiremock server by
//! pointing the service ports at it through `MAST_SERVICES__*__PORT`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `mast` binary with env isolation.
///
/// Clears all `MAST_*` env vars and points config directories at a
/// nonexistent path so tests never pick up a real configuration.
fn mast_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mast");
    cmd.env("HOME", "/tmp/mast-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/mast-cli-test-nonexistent")
        .env_remove("RUST_LOG")
        .env_remove("MAST_OUTPUT")
        .env_remove("MAST_TIMEOUT")
        .env_remove("MAST_DEFAULT_SITE")
        .env_remove("MAST_SERVICES__CONTROL__PORT")
        .env_remove("MAST_SERVICES__UNIT__PORT")
        .env_remove("MAST_SERVICES__SPEC__PORT")
        .env_remove("MAST_SERVICES__SAFETY__PORT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn assert_url(args: &[&str], expected: &str) {
    mast_cmd()
        .args(args)
        .arg("--print-url")
        .assert()
        .success()
        .stdout(format!("{expected}\n"));
}

/// Run a prepared command off the async runtime so the mock server keeps serving.
async fn run_blocking(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn closed_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = mast_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    mast_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("controller")
            .and(predicate::str::contains("unit"))
            .and(predicate::str::contains("spec")),
    );
}

#[test]
fn test_version_flag() {
    mast_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mast"));
}

#[test]
fn test_completions_zsh() {
    mast_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_config_show_defaults() {
    mast_cmd().args(["config", "show"]).assert().success().stdout(
        predicate::str::contains("default_site = \"wis\"")
            .and(predicate::str::contains("port = 8002")),
    );
}

// ── URL resolution ──────────────────────────────────────────────────

#[test]
fn test_controller_wis_status_url() {
    assert_url(
        &["controller", "wis", "status"],
        "http://mast-wis-control:8002/mast/api/v1/control/status",
    );
}

#[test]
fn test_controller_ns_slash_path_url() {
    assert_url(
        &["controller", "ns", "a/b"],
        "http://mast-ns-control:8002/mast/api/v1/control/a/b",
    );
}

#[test]
fn test_unit_url() {
    assert_url(
        &["unit", "host123", "info"],
        "http://host123:8000/mast/api/v1/unit/info",
    );
}

#[test]
fn test_spec_unrecognized_site_url() {
    assert_url(
        &["spec", "foo", "bar"],
        "http://mast-wis-spec:8001/mast/api/v1/spec/foo/bar",
    );
}

#[test]
fn test_safety_url_has_no_prefix() {
    assert_url(
        &["safety", "ns", "sensors"],
        "http://mast-ns-safety:8001/sensors",
    );
}

#[test]
fn test_params_become_query_string() {
    assert_url(
        &[
            "unit", "mast01", "focuser", "goto", "--param", "position=15000", "-p", "note=a b",
        ],
        "http://mast01:8000/mast/api/v1/unit/focuser/goto?position=15000&note=a+b",
    );
}

#[test]
fn test_param_without_equals_is_rejected() {
    mast_cmd()
        .args(["unit", "mast01", "info", "--param", "position", "--print-url"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_controller_without_site_defaults_to_wis() {
    assert_url(
        &["controller", "status"],
        "http://mast-wis-control:8002/mast/api/v1/control/status",
    );
}

#[test]
fn test_site_flag_keeps_keyword_in_path() {
    assert_url(
        &["spec", "--site", "ns", "wis", "config"],
        "http://mast-ns-spec:8001/mast/api/v1/spec/wis/config",
    );
}

#[test]
fn test_env_configured_default_site() {
    mast_cmd()
        .env("MAST_DEFAULT_SITE", "ns")
        .args(["controller", "status", "--print-url"])
        .assert()
        .success()
        .stdout("http://mast-ns-control:8002/mast/api/v1/control/status\n");
}

#[test]
fn test_config_file_overrides_ports() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_dir = dir.path().join("mast");
    std::fs::create_dir_all(&cfg_dir).unwrap();
    std::fs::write(
        cfg_dir.join("config.toml"),
        "default_site = \"ns\"\n\n[services.control]\nport = 9002\n",
    )
    .unwrap();

    mast_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["controller", "status", "--print-url"])
        .assert()
        .success()
        .stdout("http://mast-ns-control:9002/mast/api/v1/control/status\n");
}

#[test]
fn test_site_only_is_usage_error() {
    mast_cmd()
        .args(["controller", "ns", "--print-url"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("path"));
}

#[test]
fn test_missing_path_is_rejected_by_parser() {
    mast_cmd().args(["unit", "mast01"]).assert().failure();
}

#[test]
fn test_invalid_output_format() {
    let output = mast_cmd()
        .args(["--output", "table", "unit", "mast01", "info"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

// ── Request flow ────────────────────────────────────────────────────

#[tokio::test]
async fn test_unit_fetch_prints_pretty_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mast/api/v1/unit/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "mast01"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args(["unit", "127.0.0.1", "info"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "{\n  \"name\": \"mast01\"\n}\n"
    );
}

#[tokio::test]
async fn test_unwrap_prints_canonical_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mast/api/v1/unit/mount/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "1.0",
            "value": {"tracking": true}
        })))
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args(["unit", "127.0.0.1", "mount", "status", "--unwrap", "-o", "json-compact"]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"tracking\":true}\n");
}

#[tokio::test]
async fn test_not_found_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args(["unit", "127.0.0.1", "missing"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_invalid_json_exit_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args(["unit", "127.0.0.1", "info"]);
    let output = run_blocking(cmd).await;

    assert_eq!(output.status.code(), Some(10));
    assert!(combined_output(&output).contains("not valid JSON"));
}

#[test]
fn test_unreachable_host_fails_cleanly() {
    let output = mast_cmd()
        .env("MAST_SERVICES__UNIT__PORT", closed_port().to_string())
        .args(["unit", "127.0.0.1", "info"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not connect"));
}

/// Serve `body` at `/mast/api/v1/unit/<route>` and run `mast` with `args`
/// against it.
async fn fetch_unit(route: &str, body: ResponseTemplate, args: &[&str]) -> std::process::Output {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/mast/api/v1/unit/{route}")))
        .respond_with(body)
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args(args);
    run_blocking(cmd).await
}

#[tokio::test]
async fn test_quiet_still_prints_body() {
    let output = fetch_unit(
        "info",
        ResponseTemplate::new(200).set_body_json(json!({"name": "mast01"})),
        &["-q", "unit", "127.0.0.1", "info", "-o", "json-compact"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"name\":\"mast01\"}\n");
}

#[tokio::test]
async fn test_yaml_output() {
    let output = fetch_unit(
        "info",
        ResponseTemplate::new(200).set_body_json(json!({"name": "mast01", "ready": true})),
        &["unit", "127.0.0.1", "info", "-o", "yaml"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "name: mast01\nready: true\n"
    );
}

#[tokio::test]
async fn test_non_ascii_body_is_printed_verbatim() {
    let output = fetch_unit(
        "info",
        ResponseTemplate::new(200).set_body_raw(
            "{\"site\":\"Neot Smadar \u{2013} 30\u{b0}\"}",
            "application/json",
        ),
        &["unit", "127.0.0.1", "info", "-o", "json-compact"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{\"site\":\"Neot Smadar \u{2013} 30\u{b0}\"}\n"
    );
}

#[tokio::test]
async fn test_invalid_utf8_body_is_bad_response() {
    let output = fetch_unit(
        "info",
        ResponseTemplate::new(200).set_body_bytes(vec![0x7b, 0xff, 0xfe, 0x7d]),
        &["unit", "127.0.0.1", "info"],
    )
    .await;

    assert_eq!(output.status.code(), Some(10), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_unwrap_with_empty_error_list_prints_value() {
    let output = fetch_unit(
        "status",
        ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "1.0",
            "errors": [],
            "value": {"x": 1}
        })),
        &["unit", "127.0.0.1", "status", "--unwrap", "-o", "json-compact"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"x\":1}\n");
}

#[tokio::test]
async fn test_unwrap_with_remote_errors_exit_code() {
    let output = fetch_unit(
        "status",
        ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "1.0",
            "errors": ["camera busy"]
        })),
        &["unit", "127.0.0.1", "status", "--unwrap"],
    )
    .await;

    assert_eq!(output.status.code(), Some(9), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("camera busy"));
}

#[tokio::test]
async fn test_unwrap_rejects_malformed_canonical() {
    let output = fetch_unit(
        "status",
        ResponseTemplate::new(200).set_body_json(json!({
            "api_version": "1.0",
            "exception": {"type": "ValueError"}
        })),
        &["unit", "127.0.0.1", "status", "--unwrap"],
    )
    .await;

    assert_eq!(output.status.code(), Some(10), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed canonical response"));
}

#[tokio::test]
async fn test_unwrap_rejects_bare_envelope() {
    let output = fetch_unit(
        "status",
        ResponseTemplate::new(200).set_body_json(json!({"api_version": "1.0"})),
        &["unit", "127.0.0.1", "status", "--unwrap"],
    )
    .await;

    assert_eq!(output.status.code(), Some(10), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
}

#[tokio::test]
async fn test_params_reach_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/mast/api/v1/unit/focuser/goto"))
        .and(query_param("position", "15000"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"moving": true})))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = mast_cmd();
    cmd.env("MAST_SERVICES__UNIT__PORT", server.address().port().to_string())
        .args([
            "unit", "127.0.0.1", "focuser", "goto", "-p", "position=15000", "-o", "json-compact",
        ]);
    let output = run_blocking(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "{\"moving\":true}\n");
}
