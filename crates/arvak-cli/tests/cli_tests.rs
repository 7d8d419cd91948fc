//! End-to-end tests driving the `arvak` binary as a subprocess.

use std::io::Write;
use std::process::Command;

fn arvak() -> Command {
    Command::new(env!("CARGO_BIN_EXE_arvak"))
}

fn write_source(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_run_succeeds_without_assertions() {
    let file = write_source("qreg q[1];\nh q[0];\n");
    let output = arvak().arg("run").arg("--input").arg(file.path()).output().unwrap();
    assert!(output.status.success());
}

#[test]
fn test_run_exits_two_on_assertion_failure() {
    let file = write_source("qreg q[2];\nh q[0];\nassert-ent q[0],q[1];\n");
    let output = arvak().arg("run").arg("--input").arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_run_exits_one_on_parse_error() {
    let file = write_source("this is not qasm {{{");
    let output = arvak().arg("run").arg("--input").arg(file.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_run_exits_three_on_missing_file() {
    let output = arvak().arg("run").arg("--input").arg("/nonexistent/path.qasm").output().unwrap();
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_compile_drops_assertions_from_output() {
    let file = write_source("qreg q[1];\nh q[0];\nassert-sup q[0];\n");
    let output = arvak().arg("compile").arg("--input").arg(file.path()).output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(!text.contains("assert-sup"));
    assert!(text.contains("h q[0]"));
}

#[test]
fn test_version_reports_components() {
    let output = arvak().arg("version").output().unwrap();
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("arvak-debugger"));
}
