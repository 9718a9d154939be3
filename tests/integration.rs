use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_gloss")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name)).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_strips_annotations() {
    let assert = cmd().write_stdin(fixture("app.js")).assert().success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, fixture("app.expected.js"));
}

#[test]
fn stdin_mode_writes_doc_stream() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("app.doc.js");

    cmd()
        .args(["--docs", docs.to_str().unwrap()])
        .write_stdin(fixture("app.js"))
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(&docs).unwrap(),
        fixture("app.expected.doc.js")
    );
}

#[test]
fn stdin_mode_without_annotations_is_identity() {
    let input = "no annotations at all\n";
    cmd()
        .write_stdin(input)
        .assert()
        .success()
        .stdout(input.to_string());
}

// -- file mode --

#[test]
fn file_mode_writes_both_streams() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("app.js"))
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("app.js")).unwrap(),
        fixture("app.expected.js")
    );
    assert_eq!(
        std::fs::read_to_string(dir.path().join("app.doc.js")).unwrap(),
        fixture("app.expected.doc.js")
    );
}

#[test]
fn file_mode_requires_output_or_database() {
    cmd()
        .arg(fixture_path("app.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output or --database"));
}

#[test]
fn marker_block_is_dropped_from_both_streams() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("marked.js"))
        .assert()
        .success();

    let runnable = std::fs::read_to_string(dir.path().join("marked.js")).unwrap();
    assert!(!runnable.contains("BEGIN GLOSS"));
    assert!(!runnable.contains("hidden"));
    assert!(runnable.contains("head();"));
    assert!(runnable.contains("tail();"));

    // The annotation inside the block is authoring support, not
    // documentation: it must not leak into the doc stream either.
    let doc = std::fs::read_to_string(dir.path().join("marked.doc.js")).unwrap();
    assert_eq!(doc, "");
}

// -- database --

#[test]
fn database_dump_contains_the_tree() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("db.json");

    cmd()
        .args(["--database", db.to_str().unwrap()])
        .arg(fixture_path("app.js"))
        .assert()
        .success();

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&db).unwrap()).unwrap();

    // Root node identity.
    assert_eq!(v["fullName"], "[Global]");
    assert_eq!(v["id"], "Global");

    // The namespace landed at the root, the function under it.
    let app = &v["namespaces"][0];
    assert_eq!(app["name"], "App");
    assert_eq!(app["fieldType"], "namespace");
    let greet = &app["functions"][0];
    assert_eq!(greet["fullName"], "App.greet");
    assert_eq!(greet["id"], "App_greet");
    assert_eq!(greet["parameters"][0]["name"], "who");
}

#[test]
fn database_from_stdin() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("db.json");

    cmd()
        .args(["--database", db.to_str().unwrap()])
        .write_stdin("gloss.value({name: 'answer', description: 'fourty-two'});\n")
        .assert()
        .success()
        .stdout("");

    let v: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&db).unwrap()).unwrap();
    assert_eq!(v["values"][0]["name"], "answer");
}

// -- conventions --

#[test]
fn custom_namespace_token() {
    let assert = cmd()
        .args(["--namespace", "doc"])
        .write_stdin("keep; doc.value({name: 'v'}); keep2;\n")
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(output, "keep; keep2;\n");
}

#[test]
fn malformed_call_warns_but_does_not_fail() {
    cmd()
        .write_stdin("gloss.function({name: 'never closed'\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("never closes"));
}
