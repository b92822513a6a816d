// ABOUTME: Integration tests for the trackit binary
// ABOUTME: Runs each subcommand as a child process and checks its JSON output and exit codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::io::Write;
use std::process::Command;

use serde_json::Value;
use tempfile::NamedTempFile;

const CONFIG_VARS: &[&str] = &[
    "TRACKIT_RAW",
    "TRACKIT_TIMEOUT_MS",
    "TRACKIT_UPS_LICENSE_NUMBER",
    "TRACKIT_UPS_USER_ID",
    "TRACKIT_UPS_PASSWORD",
    "TRACKIT_FEDEX_KEY",
    "TRACKIT_FEDEX_PASSWORD",
    "TRACKIT_FEDEX_ACCOUNT",
    "TRACKIT_FEDEX_METER",
    "TRACKIT_USPS_USER_ID",
    "TRACKIT_DHL_USER_ID",
    "TRACKIT_DHL_PASSWORD",
    "TRACKIT_CANADAPOST_USERNAME",
    "TRACKIT_CANADAPOST_PASSWORD",
];

/// Run the binary with a clean configuration environment
fn run_cli(args: &[&str]) -> (i32, String, String) {
    run_cli_with_env(args, &[])
}

/// Run the binary with only `vars` set from the configuration environment
fn run_cli_with_env(args: &[&str], vars: &[(&str, &str)]) -> (i32, String, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_trackit"));
    for var in CONFIG_VARS {
        command.env_remove(var);
    }
    command.envs(vars.iter().copied());
    let output = command.args(args).output().unwrap();

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (exit_code, stdout, stderr)
}

fn run_json(args: &[&str]) -> Value {
    let (exit_code, stdout, stderr) = run_cli(args);
    assert_eq!(exit_code, 0, "trackit {args:?} failed: {stderr}");
    serde_json::from_str(&stdout).unwrap()
}

#[test]
fn test_help_lists_subcommands() {
    let (exit_code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(exit_code, 0);
    for subcommand in ["guess", "present", "request", "carriers"] {
        assert!(stdout.contains(subcommand), "help should mention {subcommand}");
    }
}

#[test]
fn test_guess_prints_normalized_number_and_candidates() {
    let output = run_json(&["guess", "1z 12345e 0205271686"]);
    assert_eq!(output["tracking_number"], "1Z12345E0205271686");
    assert_eq!(output["candidates"], serde_json::json!(["ups"]));

    let output = run_json(&["guess", "10000000000000237571"]);
    assert_eq!(output["candidates"], serde_json::json!(["fedex", "usps"]));

    let output = run_json(&["guess", "hello"]);
    assert_eq!(output["candidates"], serde_json::json!([]));
}

#[cfg(feature = "carrier-lasership")]
#[test]
fn test_request_prints_outbound_description() {
    let output = run_json(&[
        "request",
        "--carrier",
        "lasership",
        "--tracking-number",
        "LA40305346",
        "--timeout-ms",
        "900",
    ]);
    assert_eq!(output["method"], "GET");
    assert_eq!(
        output["url"],
        "http://www.lasership.com/track/LA40305346/json"
    );
    assert_eq!(output["timeout_ms"], 900);
}

#[cfg(feature = "carrier-canada-post")]
#[test]
fn test_request_with_basic_auth_credentials() {
    let (exit_code, stdout, stderr) = run_cli_with_env(
        &[
            "request",
            "--carrier",
            "canadapost",
            "--tracking-number",
            "1371134583769923",
        ],
        &[
            ("TRACKIT_CANADAPOST_USERNAME", "api-user"),
            ("TRACKIT_CANADAPOST_PASSWORD", "api-secret"),
        ],
    );
    assert_eq!(exit_code, 0, "stderr: {stderr}");
    let output: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(output["method"], "GET");
    assert_eq!(
        output["url"],
        "https://soa-gw.canadapost.ca/vis/track/pin/1371134583769923/detail.xml"
    );
    assert_eq!(output["auth"]["username"], "api-user");
}

#[cfg(feature = "carrier-canada-post")]
#[test]
fn test_partial_credentials_fail_configuration() {
    let (exit_code, stdout, stderr) = run_cli_with_env(
        &["carriers"],
        &[("TRACKIT_CANADAPOST_USERNAME", "api-user")],
    );
    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Failed to load configuration"), "stderr: {stderr}");
    assert!(stderr.contains("TRACKIT_CANADAPOST_PASSWORD"), "stderr: {stderr}");
}

#[cfg(feature = "carrier-prestige")]
#[test]
fn test_present_reads_response_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(
        br#"[{
          "TrackingNumber": "PS80558274",
          "TrackingEventHistory": [
            {
              "EventCode": "EVENT_301", "EventCodeDesc": "Delivered",
              "ELCity": "TAYLOR", "ELState": "MI", "ELZip": "48180",
              "PDCity": "BLOOMFIELD HILLS", "PDState": "MI", "PDZip": "483043264",
              "serverDate": "10/19/2015", "serverTime": "2:39 PM"
            }
          ]
        }]"#,
    )
    .unwrap();
    let path = file.path().to_str().unwrap();

    let output = run_json(&[
        "present",
        "--carrier",
        "prestige",
        "--tracking-number",
        "PS80558274",
        "--file",
        path,
        "--raw",
    ]);
    assert_eq!(output["request"]["tracking_number"], "PS80558274");
    assert_eq!(output["request"]["raw"], true);
    assert!(output["raw"].as_str().unwrap().contains("PS80558274"));
    assert_eq!(output["status"], "DELIVERED");
    assert_eq!(output["destination"], "Bloomfield Hills, MI 48304-3264");
    assert_eq!(output["activities"].as_array().unwrap().len(), 1);
}

#[test]
fn test_present_fails_for_carrier_without_adapter() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{}").unwrap();
    let path = file.path().to_str().unwrap();

    let (exit_code, stdout, stderr) = run_cli(&[
        "present",
        "--carrier",
        "ontrac",
        "--tracking-number",
        "C11111111111111",
        "--file",
        path,
    ]);
    assert_ne!(exit_code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("ontrac"), "stderr: {stderr}");
}

#[test]
fn test_unknown_carrier_is_a_usage_error() {
    let (exit_code, _, stderr) = run_cli(&[
        "request",
        "--carrier",
        "pony-express",
        "--tracking-number",
        "123",
    ]);
    assert_eq!(exit_code, 2);
    assert!(stderr.contains("pony-express"));
}

#[test]
fn test_carriers_lists_registration_state() {
    let output = run_json(&["carriers"]);
    let listing = output.as_array().unwrap();
    assert!(!listing.is_empty());

    for entry in listing {
        let requires_credentials = entry["capabilities"]
            .as_array()
            .unwrap()
            .iter()
            .any(|label| label == "credentials");
        // No credentials are configured, so only public feeds register
        assert_eq!(entry["registered"], !requires_credentials, "{entry}");
        assert!(entry["endpoint"].as_str().unwrap().starts_with("http"));
    }
}
