use assert_cmd::Command;
use std::fs;
use std::path::PathBuf;

fn output_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("davc-{}-{name}", std::process::id()))
}

#[test]
fn test_translate_file() {
    let output = output_path("fizzbuzz.c");
    let mut command = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();

    command
        .arg("tests/files/fizzbuzz.dav")
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let c_code = fs::read_to_string(&output).unwrap();
    assert!(c_code.starts_with("#include <stdio.h>\n"));
    assert!(c_code.contains("char* fizz(int n) {\n"));
    assert!(c_code.contains("char* concat(char* str1, char* str2) {\n"));
    fs::remove_file(output).unwrap();
}

#[test]
fn test_no_runtime() {
    let output = output_path("bare.c");
    let mut command = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();

    command
        .arg("tests/files/fizzbuzz.dav")
        .arg("--no-runtime")
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let c_code = fs::read_to_string(&output).unwrap();
    assert!(c_code.starts_with("// classic fizzbuzz\n"));
    assert!(!c_code.contains("#include"));
    fs::remove_file(output).unwrap();
}

#[test]
fn test_reports_errors() {
    let output = output_path("bad_call.c");
    let mut command = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();

    let assert = command
        .arg("tests/files/bad_call.dav")
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .code(1);

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("Error 3:8"));
    assert!(stderr.contains("function `missing` is not declared"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input() {
    Command::cargo_bin(env!("CARGO_PKG_NAME"))
        .unwrap()
        .arg("tests/files/does_not_exist.dav")
        .assert()
        .failure();
}

#[test]
fn test_refuses_to_overwrite_input() {
    let input = output_path("self.c");
    let source = "ah main() { return 0; }\n";
    fs::write(&input, source).unwrap();

    let assert = Command::cargo_bin(env!("CARGO_PKG_NAME"))
        .unwrap()
        .arg(&input)
        .assert()
        .code(1);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("would overwrite the input file"));

    Command::cargo_bin(env!("CARGO_PKG_NAME"))
        .unwrap()
        .arg(&input)
        .args(["-o", input.to_str().unwrap()])
        .assert()
        .code(1);

    assert_eq!(fs::read_to_string(&input).unwrap(), source);
    fs::remove_file(input).unwrap();
}

#[test]
fn test_debug_output() {
    let output = output_path("debug.c");
    let assert = Command::cargo_bin(env!("CARGO_PKG_NAME"))
        .unwrap()
        .arg("tests/files/fizzbuzz.dav")
        .arg("--debug")
        .args(["-o", output.to_str().unwrap()])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("Tokens: ["));
    assert!(stdout.contains("AST:\n"));
    assert!(stdout.contains("C:\n"));
    assert!(stdout.contains("int main() {\n"));
    fs::remove_file(output).unwrap();
}
