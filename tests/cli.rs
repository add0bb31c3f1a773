use assert_cmd::Command;
use doxy_scanner::{ElementKind, FileDocumentation};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(name)
}

fn doxy_scan() -> Command {
    let mut cmd = Command::cargo_bin("doxy-scan").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn json_output_is_an_array_of_file_documentation() {
    let output = doxy_scan()
        .arg("--json")
        .arg(fixture("example.cpp"))
        .arg(fixture("namespaced.hpp"))
        .output()
        .unwrap();
    assert!(output.status.success());

    let docs: Vec<FileDocumentation> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs.len(), 2);
    assert!(docs[0].path.ends_with("example.cpp"));
    assert_eq!(docs[0].elements[0].kind, ElementKind::Class);
    assert_eq!(docs[0].elements[0].qualified_name, "ExampleClass");
    assert!(docs[1].path.ends_with("namespaced.hpp"));
    assert_eq!(docs[1].unattached.len(), 2);
}

#[test]
fn text_report_lists_every_element() {
    doxy_scan()
        .arg(fixture("example.cpp"))
        .assert()
        .success()
        .stdout(predicate::str::contains("class ExampleClass:\n\n/** "))
        .stdout(predicate::str::contains("method ExampleClass::returnsTrue (public):\n\n//! Multiple"))
        .stdout(predicate::str::contains("constructor ExampleClass::ExampleClass (public):\n\n(undocumented)"));
}

#[test]
fn failing_explicit_file_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone.cpp");

    doxy_scan()
        .arg("--json")
        .arg(fixture("example.cpp"))
        .arg(&missing)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("ExampleClass"))
        .stderr(predicate::str::contains("gone.cpp"));
}

#[test]
fn directories_are_scanned_with_chosen_extensions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.hpp"), "/// A.\nclass A {};\n").unwrap();
    fs::write(dir.path().join("b.cpp"), "/// B.\nclass B {};\n").unwrap();

    let output = doxy_scan()
        .args(["--json", "--ext", "hpp"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let docs: Vec<FileDocumentation> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].elements[0].qualified_name, "A");
}
