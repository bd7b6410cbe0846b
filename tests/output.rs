use serde_json::Value;
use triage::error::Error;
use triage::output::{
    command_name_from, error_json, error_kind, format_human, success_json, HumanOutput,
};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("triage analyze: 2 task(s) ranked with smart");
    human.push_summary("strategy", "smart");
    human.push_detail("1. [100 High] ship (urgency=25, importance=16, effort=9)");
    human.push_warning("unknown strategy 'turbo'; using smart");
    human.push_next_step("triage suggest");

    let rendered = format_human(&human);
    assert!(rendered.contains("triage analyze: 2 task(s) ranked with smart"));
    assert!(rendered.contains("Summary:"));
    assert!(rendered.contains("- strategy: smart"));
    assert!(rendered.contains("Details:"));
    assert!(rendered.contains("- 1. [100 High] ship"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("Next steps:"));
    assert!(rendered.contains("- triage suggest"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("triage check: no circular dependencies");
    let rendered = format_human(&human);
    assert_eq!(rendered, "triage check: no circular dependencies");
}

#[test]
fn success_envelope_carries_warnings() -> Result<(), Box<dyn std::error::Error>> {
    let mut human = HumanOutput::new("header");
    human.push_warning("careful");

    let rendered = success_json("analyze", &serde_json::json!({"count": 0}), Some(&human))?;
    let value: Value = serde_json::from_str(&rendered)?;
    assert_eq!(value["schema_version"], "triage.v1");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["count"], 0);
    assert_eq!(value["warnings"], serde_json::json!(["careful"]));
    assert!(value.get("next_steps").is_none());

    Ok(())
}

#[test]
fn error_envelope_maps_kind() -> Result<(), Box<dyn std::error::Error>> {
    let err = Error::CircularDependency {
        cycle: vec!["A".to_string(), "B".to_string(), "A".to_string()],
    };
    assert_eq!(error_kind(&err), "rejected");

    let value: Value = serde_json::from_str(&error_json("check", &err)?)?;
    assert_eq!(value["status"], "error");
    assert_eq!(value["error"]["code"], 3);
    assert_eq!(value["error"]["kind"], "rejected");
    assert_eq!(value["error"]["details"]["cycle"][1], "B");

    assert_eq!(
        error_kind(&Error::InvalidArgument("x".to_string())),
        "user_error"
    );
    assert_eq!(
        error_kind(&Error::OperationFailed("x".to_string())),
        "operation_failed"
    );

    Ok(())
}

#[test]
fn command_name_skips_flags() {
    let flags_first = ["--json", "analyze", "tasks.json"];
    assert_eq!(command_name_from(flags_first), "analyze");
    let dir_flag = ["--dir", "/tmp/work", "suggest"];
    assert_eq!(command_name_from(dir_flag), "suggest");
    assert_eq!(command_name_from(Vec::<String>::new()), "triage");
}
