mod support;

use predicates::str::contains;
use serde_json::json;

use support::{stdout_json, TestDir};

#[test]
fn check_passes_acyclic_batch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new()?;
    let input = dir.write_tasks(&json!([
        {"title": "A", "dependencies": ["B"]},
        {"title": "B", "dependencies": ["C"]},
        {"title": "C"},
        {"title": "D", "dependencies": ["nowhere"]}
    ]))?;

    dir.cmd()
        .arg("check")
        .arg(&input)
        .assert()
        .success()
        .stdout(contains("triage check: no circular dependencies"));

    let output = dir.cmd().args(["check", "--json"]).arg(&input).output()?;
    let value = stdout_json(&output)?;
    assert_eq!(value["data"]["tasks"], 4);
    assert_eq!(value["data"]["dependencies"], 3);
    assert_eq!(value["data"]["cycles"], false);

    Ok(())
}

#[test]
fn check_reports_cycle_path() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new()?;
    let input = dir.write_tasks(&json!([
        {"title": "A", "dependencies": ["B"]},
        {"title": "B", "dependencies": ["A"]}
    ]))?;

    dir.cmd()
        .arg("check")
        .arg(&input)
        .assert()
        .code(3)
        .stderr(contains("Circular dependencies detected: A -> B -> A"));

    Ok(())
}

#[test]
fn check_flags_self_dependency() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new()?;

    let output = dir
        .cmd()
        .args(["check", "-", "--json"])
        .write_stdin(r#"[{"title": "A", "dependencies": ["A"]}]"#)
        .output()?;
    assert_eq!(output.status.code(), Some(3));

    let value = stdout_json(&output)?;
    assert_eq!(value["command"], "check");
    assert_eq!(value["error"]["details"]["cycle"], json!(["A", "A"]));

    Ok(())
}

#[test]
fn check_never_writes_a_session() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TestDir::new()?;
    let input = dir.write_tasks(&json!([{"title": "A"}]))?;

    dir.cmd().arg("check").arg(&input).assert().success();
    assert!(!dir.session_path().exists());

    Ok(())
}
