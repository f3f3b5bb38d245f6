use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::PathBuf;
use tempfile::TempDir;

fn reference_topology() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reference.json")
}

/// A command isolated from the user's real config file
fn pathfinder(config_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pathfinder").unwrap();
    cmd.env("PATHFINDER_CONFIG", config_dir.path().join("config.toml"))
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_paths_table() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .arg("--topology")
        .arg(reference_topology())
        .args(["paths", "S1", "S2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S1 -> S1:1 -> S2:1 -> S2"));
}

#[test]
fn test_paths_unreachable() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .arg("-t")
        .arg(reference_topology())
        .args(["paths", "S1", "S4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No path found"));
}

#[test]
fn test_constrained_json() {
    let dir = TempDir::new().unwrap();
    let value = json_output(
        pathfinder(&dir)
            .arg("-t")
            .arg(reference_topology())
            .args(["-f", "json", "constrained", "S1", "S2", "-c", "ownership=blue"]),
    );
    assert_eq!(
        value,
        serde_json::json!([["S1", "S1:2", "S3:2", "S3", "S3:1", "S2:2", "S2"]])
    );
}

#[test]
fn test_flexible_json() {
    let dir = TempDir::new().unwrap();
    let value = json_output(pathfinder(&dir).arg("-t").arg(reference_topology()).args([
        "-f",
        "json",
        "flexible",
        "S1",
        "S2",
        "-c",
        "ownership=blue",
        "-c",
        "bandwidth=50",
    ]));

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["dropped"], serde_json::json!(["ownership"]));
    assert_eq!(records[0]["honored"], serde_json::json!({"bandwidth": 50.0}));
    assert_eq!(
        records[0]["paths"],
        serde_json::json!([["S1", "S1:1", "S2:1", "S2"]])
    );
    assert_eq!(records[1]["dropped"], serde_json::json!(["bandwidth"]));
}

#[test]
fn test_flexible_max_dropped_zero() {
    let dir = TempDir::new().unwrap();
    let value = json_output(pathfinder(&dir).arg("-t").arg(reference_topology()).args([
        "-f",
        "json",
        "flexible",
        "S1",
        "S2",
        "-c",
        "ownership=blue",
        "-c",
        "bandwidth=50",
        "--max-dropped",
        "0",
    ]));

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["paths"], serde_json::json!([]));
    assert_eq!(records[0]["dropped"], serde_json::json!([]));
}

#[test]
fn test_drop_order_from_config() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .args(["config", "set", "drop_order", "reverse"])
        .assert()
        .success();

    let value = json_output(pathfinder(&dir).arg("-t").arg(reference_topology()).args([
        "-f",
        "json",
        "flexible",
        "S1",
        "S2",
        "-c",
        "ownership=blue",
        "-c",
        "bandwidth=50",
    ]));
    assert_eq!(value[0]["dropped"], serde_json::json!(["bandwidth"]));
}

#[test]
fn test_malformed_constraint_rejected() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .arg("-t")
        .arg(reference_topology())
        .args(["constrained", "S1", "S2", "-c", "bandwidth"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("key=value"));

    pathfinder(&dir)
        .arg("-t")
        .arg(reference_topology())
        .args(["constrained", "S1", "S2", "-c", "bandwidth=plenty"])
        .assert()
        .failure();
}

#[test]
fn test_missing_topology() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .args(["paths", "S1", "S2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No topology given"));
}

#[test]
fn test_topology_from_config() {
    let dir = TempDir::new().unwrap();
    let topology = reference_topology();
    pathfinder(&dir)
        .args(["config", "set", "topology"])
        .arg(&topology)
        .assert()
        .success();

    pathfinder(&dir)
        .args(["topology", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Topology OK: 5 switch(es), 3 link(s)"));
}

#[test]
fn test_topology_show_json() {
    let dir = TempDir::new().unwrap();
    let value = json_output(
        pathfinder(&dir)
            .arg("-t")
            .arg(reference_topology())
            .args(["--format", "json", "topology", "show"]),
    );
    assert_eq!(value["switches"], 5);
    assert_eq!(value["interfaces"], 9);
    assert_eq!(value["links"], 3);
    assert_eq!(value["generation"], 1);
}

#[test]
fn test_topology_rejects_unknown_endpoint() {
    let dir = TempDir::new().unwrap();
    let topology = dir.path().join("broken.toml");
    std::fs::write(
        &topology,
        r#"
[[switches]]
id = "S1"
interfaces = [{ port = 1 }]

[[links]]
endpoint_a = "S1:1"
endpoint_b = "S9:1"
"#,
    )
    .unwrap();

    pathfinder(&dir)
        .arg("-t")
        .arg(&topology)
        .args(["topology", "validate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid topology"));

    pathfinder(&dir)
        .args(["config", "set", "unknown_endpoints", "create_placeholder"])
        .assert()
        .success();

    pathfinder(&dir)
        .arg("-t")
        .arg(&topology)
        .args(["paths", "S1", "S9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S1 -> S1:1 -> S9:1 -> S9"));
}

#[test]
fn test_topology_export_toml() {
    let dir = TempDir::new().unwrap();
    let exported = dir.path().join("out/topology.toml");
    pathfinder(&dir)
        .arg("-t")
        .arg(reference_topology())
        .args(["topology", "export", "-o"])
        .arg(&exported)
        .assert()
        .success();

    pathfinder(&dir)
        .arg("-t")
        .arg(&exported)
        .args(["paths", "S1", "S3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("S1 -> S1:2 -> S3:2 -> S3"));
}

#[test]
fn test_config_get_unknown_key() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .args(["config", "get", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir).args(["config", "init"]).assert().success();
    pathfinder(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    pathfinder(&dir)
        .args(["config", "init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_list_marks_changed_settings() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .args(["config", "set", "weight_key", "latency"])
        .assert()
        .success();

    pathfinder(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"\* weight_key\s+latency").unwrap())
        .stdout(predicate::str::is_match(r"(?m)^  drop_order\s+supplied").unwrap());

    let value = json_output(pathfinder(&dir).args(["-f", "json", "config", "list"]));
    assert_eq!(value["weight_key"], "latency");
    assert_eq!(value["unknown_endpoints"], "reject");

    pathfinder(&dir)
        .args(["config", "unset", "weight_key"])
        .assert()
        .success();
    pathfinder(&dir)
        .args(["config", "get", "weight_key"])
        .assert()
        .success()
        .stdout(predicate::str::contains("latency").not());
}

#[test]
fn test_config_init_records_topology() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .arg("-t")
        .arg(reference_topology())
        .args(["config", "init"])
        .assert()
        .success();

    pathfinder(&dir)
        .args(["topology", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Topology OK"));
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();
    pathfinder(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pathfinder"));
}
