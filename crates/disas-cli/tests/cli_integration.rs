//! Integration tests for the dma330-disas CLI.

use disas_core as _;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn binary_path() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop();
    path.pop();
    path.join("dma330-disas")
}

fn create_temp_file(dir: &std::path::Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn disassembles_simple_program() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = create_temp_file(temp_dir.path(), "simple.bin", &[0x00, 0x01, 0x18]);

    let result = Command::new(binary_path())
        .args([input.to_str().unwrap()])
        .output()
        .expect("failed to run dma330-disas");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(
        stdout,
        "00000000:    END\n00000001:    KILL\n00000002:    NOP\n"
    );
}

#[test]
fn base_address_offsets_the_listing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = create_temp_file(temp_dir.path(), "based.bin", &[0x18, 0x00]);

    let result = Command::new(binary_path())
        .args([input.to_str().unwrap(), "-b", "0x100"])
        .output()
        .expect("failed to run dma330-disas");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(stdout, "00000100:    NOP\n00000101:    END\n");
}

#[test]
fn multi_byte_instructions_print_operands() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = create_temp_file(
        temp_dir.path(),
        "addh.bin",
        &[0x54, 0x34, 0x12, 0xBC, 0x02, 0x78, 0x56, 0x34, 0x12],
    );

    let result = Command::new(binary_path())
        .args([input.to_str().unwrap()])
        .output()
        .expect("failed to run dma330-disas");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert_eq!(
        stdout,
        "00000000:    ADDH          SAR, #0x1234\n\
         00000003:    MOV           DAR, #0x12345678\n"
    );
}

#[test]
fn empty_input_prints_nothing() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = create_temp_file(temp_dir.path(), "empty.bin", &[]);

    let result = Command::new(binary_path())
        .args([input.to_str().unwrap()])
        .output()
        .expect("failed to run dma330-disas");

    assert!(result.status.success());
    assert!(result.stdout.is_empty());
}

#[test]
fn truncated_program_reports_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = create_temp_file(temp_dir.path(), "cut.bin", &[0x54]);

    let result = Command::new(binary_path())
        .args([input.to_str().unwrap()])
        .output()
        .expect("failed to run dma330-disas");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("truncated"));
}

#[test]
fn missing_file_reports_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    let missing = temp_dir.path().join("nope.bin");

    let result = Command::new(binary_path())
        .args([missing.to_str().unwrap()])
        .output()
        .expect("failed to run dma330-disas");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("failed to read"));
}

#[test]
fn help_shows_usage() {
    let result = Command::new(binary_path())
        .args(["--help"])
        .output()
        .expect("failed to run dma330-disas");

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Usage: dma330-disas"));
    assert!(stdout.contains("--base-address"));
}

#[test]
fn unknown_option_fails_with_usage() {
    let result = Command::new(binary_path())
        .args(["--frobnicate"])
        .output()
        .expect("failed to run dma330-disas");

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("unknown option"));
    assert!(stderr.contains("Usage: dma330-disas"));
}
