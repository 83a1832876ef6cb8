use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&PathBuf], flags: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_micromustache"))
        .args(args)
        .args(flags)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_cli_renders_file() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "greeting.txt", "Hello {{ user.name }}, you have {{count}} messages\n");
    let scope = write(&dir, "scope.json", r#"{"user": {"name": "Alex"}, "count": 3}"#);

    let out = run(&[&template, &scope], &[]);
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Hello Alex, you have 3 messages\n"
    );
}

#[test]
fn test_cli_flags() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.txt", "<%a%>|<%b%>");
    let scope = write(&dir, "s.json", r#"{"a": null}"#);

    let out = run(
        &[&template, &scope],
        &["--open", "<%", "--close", "%>", "--explicit"],
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "null|undefined");

    let out = run(&[&template, &scope], &["--open", "<%", "--close", "%>", "--validate-ref"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Reference Error"));
}

#[test]
fn test_cli_missing_template() {
    let dir = TempDir::new().unwrap();
    let scope = write(&dir, "s.json", "{}");
    let missing = dir.path().join("nope.txt");

    let out = run(&[&missing, &scope], &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("failed to read template"));
}

#[test]
fn test_cli_bad_json() {
    let dir = TempDir::new().unwrap();
    let template = write(&dir, "t.txt", "{{a}}");
    let scope = write(&dir, "s.json", "{not json");

    let out = run(&[&template, &scope], &[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid JSON"));
    assert!(out.stdout.is_empty());
}
