//! Integration smoke tests for the `pds` CLI surface.

mod common;

#[test]
fn help_command_prints_usage() {
    let result = common::run_cli_case("help_command_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: pds"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn version_command_prints_version() {
    let result = common::run_cli_case("version_command_prints_version", &["--version"]);
    assert!(result.status.success());
    assert!(
        result.stdout.contains("pds") || result.stdout.contains("ppe_drift_sentinel"),
        "missing version output; log: {}",
        result.log_path.display()
    );
}

#[test]
fn status_json_carries_the_risk_posture() {
    let result = common::run_cli_case(
        "status_json_carries_the_risk_posture",
        &["status", "--json", "--seed", "42"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value =
        serde_json::from_str(&result.stdout).expect("status --json must emit valid JSON");
    for key in [
        "status",
        "risk_level",
        "global_drift_score",
        "risk_budget",
        "model_confidence",
    ] {
        assert!(payload.get(key).is_some(), "missing key {key}");
    }
}

#[test]
fn report_json_lists_every_feature() {
    let result = common::run_cli_case(
        "report_json_lists_every_feature",
        &["report", "--json", "--seed", "42", "--drift", "high"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    let details = payload["feature_details"].as_array().unwrap();
    assert_eq!(details.len(), 3);
    assert!(payload["drift_signature"].as_str().unwrap().len() == 12);
    assert!(payload["global_drift_score"].as_f64().unwrap() > 80.0);
}

#[test]
fn forecast_under_sustained_high_drift_opens_the_gate() {
    let result = common::run_cli_case(
        "forecast_under_sustained_high_drift_opens_the_gate",
        &["forecast", "--json", "--seed", "1", "--drift", "high", "--rounds", "7"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(payload["retraining_gate_open"], serde_json::Value::Bool(true));
    assert_eq!(payload["persistence_counter"].as_u64().unwrap(), 7);
}

#[test]
fn explain_names_the_harness_under_high_drift() {
    let result = common::run_cli_case(
        "explain_names_the_harness_under_high_drift",
        &["explain", "--json", "--seed", "3", "--drift", "high"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(payload["top_driving_feature"], "Harness_Conf");
}

#[test]
fn calibrate_restores_the_full_budget() {
    let result = common::run_cli_case(
        "calibrate_restores_the_full_budget",
        &["calibrate", "--json", "--seed", "42", "--drift", "medium"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert!((payload["new_risk_budget"].as_f64().unwrap() - 100.0).abs() < 1e-9);
}

#[test]
fn inject_drift_subcommand_escalates_the_posture() {
    let result = common::run_cli_case(
        "inject_drift_subcommand_escalates_the_posture",
        &["inject-drift", "--severity", "high", "--json", "--seed", "5"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(payload["risk_level"], "Critical");
    assert_eq!(payload["simulation_mode"], "high");
}

#[test]
fn config_file_overrides_the_persistence_threshold() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("sentinel.toml");
    std::fs::write(&config_path, "persistence_threshold = 2\n").expect("write config");

    let result = common::run_cli_case(
        "config_file_overrides_the_persistence_threshold",
        &[
            "forecast",
            "--json",
            "--seed",
            "1",
            "--drift",
            "high",
            "--rounds",
            "3",
            "--config",
            config_path.to_str().unwrap(),
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert_eq!(payload["retraining_gate_open"], serde_json::Value::Bool(true));
}

#[test]
fn completions_command_generates_shell_script() {
    let result = common::run_cli_case(
        "completions_command_generates_shell_script",
        &["completions", "bash"],
    );
    assert!(result.status.success());
    assert!(
        result.stdout.contains("pds"),
        "expected completion script contents; log: {}",
        result.log_path.display()
    );
}
