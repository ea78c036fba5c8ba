#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn pixelwire(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pixelwire"))
        .args(["--log-level", "error"])
        .args(args)
        .env_remove("PIXELWIRE_CONFIG")
        .env_remove("PIXELWIRE_REVISION")
        .env_remove("PIXELWIRE_LEGACY_PARAMS")
        .output()
        .expect("pixelwire should run")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be json")
}

#[test]
fn encode_wipe_prints_frame_json() {
    let output = pixelwire(&[
        "--format", "json", "encode", "wipe", "0,11", "255,0,0", "--speed", "fast",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let json = json_stdout(&output);
    assert_eq!(json["bytes"], serde_json::json!([3, 0, 11, 255, 0, 0, 10]));
    assert_eq!(json["revision"], "v2");
    assert_eq!(json["effect"], "color_wipe");
}

#[test]
fn encode_raw_writes_frame_bytes() {
    let output = pixelwire(&["--format", "raw", "encode", "sparkle", "outer ring", "red", "5.2"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0x0D, 0, 11, 255, 0, 0, 20, 80]);
}

#[test]
fn encode_v1_sparkle_uses_count() {
    let output = pixelwire(&[
        "--format", "raw", "--revision", "v1", "encode", "sparkle", "0,11", "green", "12",
    ]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0x0D, 0, 255, 0, 12]);
}

#[test]
fn strict_mode_rejects_bad_token() {
    let output = pixelwire(&["--format", "raw", "encode", "wipe", "0,x", "red"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid argument"));
}

#[test]
fn legacy_mode_coerces_bad_token() {
    let output = pixelwire(&[
        "--format", "raw", "--legacy-params", "encode", "wipe", "0,x", "red", "--speed", "fast",
    ]);
    assert!(output.status.success());
    assert_eq!(output.stdout, vec![0x03, 0, 0, 255, 0, 0, 10]);
}

#[test]
fn v1_duration_is_usage_error() {
    let output = pixelwire(&["--revision", "v1", "encode", "rainbow", "0,11", "--duration", "2"]);
    assert_eq!(output.status.code(), Some(64));
}

#[test]
fn duration_too_long_is_data_invalid() {
    let output = pixelwire(&["encode", "shimmer", "0,11", "red", "70"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn names_lists_rings_and_colors() {
    let output = pixelwire(&["--format", "json", "names"]);
    assert!(output.status.success());

    let rows = json_stdout(&output);
    let rows = rows.as_array().expect("names output should be an array");
    assert!(rows
        .iter()
        .any(|row| row["name"] == "outer ring" && row["token"] == "0,11" && row["kind"] == "ring"));
    assert!(rows
        .iter()
        .any(|row| row["name"] == "red" && row["token"] == "255,0,0" && row["kind"] == "color"));
}

#[test]
fn send_to_missing_device_fails_with_transport_code() {
    let output = pixelwire(&[
        "send", "--device", "/dev/pixelwire-missing", "--hold", "0s", "brightness", "10",
    ]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn config_file_sets_revision() {
    let path = std::env::temp_dir().join(format!("pixelwire-cli-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "revision": "v1" }"#).expect("config should be writable");

    let output = pixelwire(&[
        "--format", "raw", "--config", path.to_str().expect("utf-8 path"), "encode", "shimmer",
        "0,11", "blue", "3",
    ]);
    let _ = std::fs::remove_file(&path);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(output.stdout, vec![0x02, 0, 0, 255, 3]);
}
