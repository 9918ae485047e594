//! CLI integration tests for bach-abi
//!
//! Tests command parsing, output formatting, and config handling.

use std::path::Path;
use std::process::Command;

const TRANSFER: &str = "transfer(address,uint256)";
const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
const TRANSFER_CALL: &str = "0xa9059cbb\
    0000000000000000000000005aaeb6053f3e94c9b9a09f33669435e7ef1beaed\
    00000000000000000000000000000000000000000000000000000000000003e8";

/// Helper to run the CLI with arguments
fn run_abi(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_bach-abi"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

/// Run with an isolated config file
fn run_with_config(config: &Path, args: &[&str]) -> std::process::Output {
    let path = config.to_str().unwrap();
    let mut full = vec!["--config", path];
    full.extend_from_slice(args);
    run_abi(&full)
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ==================== Help & Version Tests ====================

#[test]
fn test_cli_help() {
    let output = run_abi(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bach-abi"));
    assert!(stdout.contains("selector"));
    assert!(stdout.contains("call"));
    assert!(stdout.contains("type"));
    assert!(stdout.contains("address"));
    assert!(stdout.contains("format"));
}

#[test]
fn test_cli_version() {
    let output = run_abi(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bach-abi"));
}

#[test]
fn test_cli_call_help() {
    let output = run_abi(&["call", "--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("encode"));
    assert!(stdout.contains("decode"));
    assert!(stdout.contains("decode-return"));
}

// ==================== Selector Tests ====================

#[test]
fn test_selector() {
    let output = run_abi(&["selector", TRANSFER]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "0xa9059cbb");
}

#[test]
fn test_selector_json_canonicalizes() {
    let output = run_abi(&["--json", "selector", "transfer(address,uint)"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["signature"], TRANSFER);
    assert_eq!(json["selector"], "0xa9059cbb");
    assert_eq!(json["hash_algorithm"], "Keccak-256");
}

#[test]
fn test_selector_bad_signature() {
    let output = run_abi(&["selector", "transfer(address,uint7)"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
}

// ==================== Call Tests ====================

#[test]
fn test_call_encode() {
    let args = format!("[\"{}\", 1000]", ADDRESS.to_lowercase());
    let output = run_abi(&["call", "encode", TRANSFER, &args]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), TRANSFER_CALL);
}

#[test]
fn test_call_encode_json_length() {
    let args = format!("[\"{}\", \"0x3e8\"]", ADDRESS);
    let output = run_abi(&["--json", "call", "encode", TRANSFER, &args]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["data"], TRANSFER_CALL);
    assert_eq!(json["length"], 68);
}

#[test]
fn test_call_decode() {
    let output = run_abi(&["--json", "call", "decode", TRANSFER, TRANSFER_CALL]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["args"], serde_json::json!([ADDRESS, "1000"]));
}

#[test]
fn test_call_decode_wrong_selector() {
    let output = run_abi(&["--json", "call", "decode", "approve(address,uint256)", TRANSFER_CALL]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["success"], false);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("given selector does not match"));
}

#[test]
fn test_call_decode_return() {
    let data = format!("0x{:064x}", 1u8);
    let output = run_abi(&["call", "decode-return", "isOwner(address)", "(bool)", &data]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "[true]");
}

#[test]
fn test_call_encode_out_of_range() {
    let output = run_abi(&["call", "encode", "f(uint8)", "[256]"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("exceeds bit limit"));
}

// ==================== Type Tests ====================

#[test]
fn test_type_canonical() {
    let output = run_abi(&["--json", "type", "canonical", "(uint,fixed)[]"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["canonical"], "(uint256,fixed128x18)[]");
    assert_eq!(json["dynamic"], true);
}

#[test]
fn test_type_encode_packed() {
    let output = run_abi(&[
        "type",
        "encode",
        "(int16,bytes1,uint16,string)",
        r#"[-1, "0x42", 3, "Hello, world!"]"#,
        "--packed",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "0xffff42000348656c6c6f2c20776f726c6421");
}

#[test]
fn test_type_decode_array() {
    let data = format!("0x{:064x}{:064x}{:064x}", 2, 7, 9);
    let output = run_abi(&["--json", "type", "decode", "uint8[]", &data]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["value"], serde_json::json!([7, 9]));
}

#[test]
fn test_type_decode_bad_bool() {
    let data = format!("0x{:064x}", 2);
    let output = run_abi(&["type", "decode", "bool", &data]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("illegal boolean value @ 0"));
}

// ==================== Address Tests ====================

#[test]
fn test_address_checksum() {
    let lower = ADDRESS.to_lowercase();
    let output = run_abi(&["address", "checksum", &lower]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), ADDRESS);
}

#[test]
fn test_address_validate() {
    let output = run_abi(&["--json", "address", "validate", ADDRESS]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["valid"], true);

    let lower = ADDRESS.to_lowercase();
    let output = run_abi(&["address", "validate", &lower]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid checksum"));
}

// ==================== Format Tests ====================

#[test]
fn test_format_call_offsets() {
    let output = run_abi(&["format", "--call", "--labels", "offsets", TRANSFER_CALL]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "ID       a9059cbb");
    assert!(lines[1].starts_with("     0   "));
    assert!(lines[2].starts_with("    20   "));
}

#[test]
fn test_format_bad_length() {
    let output = run_abi(&["--json", "format", "0x0102"]);
    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("expected length mod 32 == 0, found: 2"));
}

// ==================== Config Tests ====================

#[test]
fn test_config_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abi.toml");

    let output = run_with_config(&path, &["config", "--set-labels", "rows"]);
    assert!(output.status.success());
    assert!(path.exists());

    let output = run_with_config(&path, &["--json", "config", "--show"]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["labels"], "rows");
    assert_eq!(json["hash_algorithm"], "keccak-256");

    let word = format!("0x{:064x}", 1);
    let output = run_with_config(&path, &["format", &word]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("0        "));
}

#[test]
fn test_config_hash_changes_selector() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abi.toml");

    let output = run_with_config(&path, &["config", "--set-hash", "sha3-256"]);
    assert!(output.status.success());

    let output = run_with_config(&path, &["--json", "selector", TRANSFER]);
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["hash_algorithm"], "SHA3-256");
    assert_ne!(json["selector"], "0xa9059cbb");
}

#[test]
fn test_config_rejects_unknown_hash() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("abi.toml");

    let output = run_with_config(&path, &["config", "--set-hash", "md5"]);
    assert!(!output.status.success());
    assert!(!path.exists());
}
