use std::io::Write;
use std::process::{Command, Stdio};

fn get_polka_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_polka"))
}

#[test]
fn test_version_flag() {
    let output = get_polka_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute polka");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("polka"), "Version output should contain 'polka'");
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Version output should contain version number"
    );
}

#[test]
fn test_one_shot_expression() {
    let output = get_polka_binary()
        .arg("+ 1 (* 2 3)")
        .output()
        .expect("Failed to execute polka");

    assert!(output.status.success(), "Valid expression should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "7");
}

#[test]
fn test_one_shot_expression_with_leading_hyphen() {
    let output = get_polka_binary()
        .arg("- 1 2 3")
        .output()
        .expect("Failed to execute polka");

    assert!(output.status.success(), "Hyphen-leading expression should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "-4");
}

#[test]
fn test_semantic_error_is_a_normal_result() {
    let output = get_polka_binary()
        .arg("/ 5 0")
        .output()
        .expect("Failed to execute polka");

    assert!(
        output.status.success(),
        "A semantic error is an evaluation result, not a process failure"
    );
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "Error: Division by zero!");
}

#[test]
fn test_parse_failure_exits_nonzero() {
    let output = get_polka_binary()
        .arg("+ 1 (")
        .output()
        .expect("Failed to execute polka");

    assert!(!output.status.success(), "Parse failure should exit nonzero");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error"), "Diagnostic should go to stderr");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim().is_empty(), "No value should be printed");
}

#[test]
fn test_file_mode() {
    let path = std::env::temp_dir().join(format!("polka-test-{}.txt", std::process::id()));
    std::fs::write(&path, "+ 1 2\n\n* 3 4\n/ 1 0\n").expect("Failed to write test file");

    let output = get_polka_binary()
        .arg("--file")
        .arg(&path)
        .output()
        .expect("Failed to execute polka");

    std::fs::remove_file(&path).ok();

    assert!(output.status.success(), "File mode should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["3", "12", "Error: Division by zero!"]);
}

#[test]
fn test_file_mode_continues_past_bad_lines() {
    let path = std::env::temp_dir().join(format!("polka-test-bad-{}.txt", std::process::id()));
    std::fs::write(&path, "+ 1 2\nnot an expression\n* 3 4\n").expect("Failed to write test file");

    let output = get_polka_binary()
        .arg("--file")
        .arg(&path)
        .output()
        .expect("Failed to execute polka");

    std::fs::remove_file(&path).ok();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["3", "12"], "Good lines still evaluate");
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error"), "Bad line is reported on stderr");
}

#[test]
fn test_missing_file_fails() {
    let output = get_polka_binary()
        .arg("--file")
        .arg("/nonexistent/polka-input.txt")
        .output()
        .expect("Failed to execute polka");

    assert!(!output.status.success(), "Missing file should exit nonzero");
}

#[test]
fn test_piped_repl_session() {
    let mut child = get_polka_binary()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn polka");

    child
        .stdin
        .as_mut()
        .expect("Failed to open stdin")
        .write_all(b"+ 1 2\nbogus line\nmax 3 9\n")
        .expect("Failed to write to stdin");

    let output = child.wait_with_output().expect("Failed to wait for polka");

    assert!(output.status.success(), "REPL should exit cleanly on EOF");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.lines().any(|line| line.trim_end().ends_with('3')),
        "First expression should evaluate: {stdout:?}"
    );
    assert!(
        stdout.lines().any(|line| line.trim_end().ends_with('9')),
        "Shell should still be live after a bad line: {stdout:?}"
    );
}

#[test]
fn test_completions_subcommand() {
    let output = get_polka_binary()
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute polka");

    assert!(output.status.success(), "Completion generation should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("polka"), "Completions should mention the binary");
}
