//! CLI command integration tests.
//! Each test uses a temp directory via TEA_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn tea_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("tea").unwrap();
    cmd.env("TEA_DATA_DIR", data_dir.path());
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

#[test]
fn analyze_from_flags() {
    let dir = TempDir::new().unwrap();
    tea_cmd(&dir)
        .args(["analyze", "--tea", "Sea", "--flavor", "salty, briny, seaweed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sea"))
        .stdout(predicate::str::contains("dominant:   water"))
        .stdout(predicate::str::contains("thermal:"));
}

#[test]
fn analyze_json_output() {
    let dir = TempDir::new().unwrap();
    let output = tea_cmd(&dir)
        .args(["analyze", "--caffeine", "10", "--theanine", "1", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "complete");
    assert_eq!(json["thermalAnalysis"]["thermalProperty"], "Strongly warming");
    assert!(json["elements"]["water"].as_f64().unwrap() < json["blendedElements"]["water"].as_f64().unwrap());
}

#[test]
fn analyze_file_with_flag_override() {
    let dir = TempDir::new().unwrap();
    let file = write_json(
        &dir,
        "tea.json",
        serde_json::json!({"name": "Assam", "flavorProfile": ["malty"], "caffeineLevel": 8}),
    );
    let output = tea_cmd(&dir)
        .arg("analyze")
        .arg(&file)
        .args(["--theanine", "3", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["appliedWeights"]["compounds"].as_f64().unwrap() > 0.0);
    assert_eq!(json["appliedWeights"]["geography"], 0.0);
}

#[test]
fn analyze_tea_type_only() {
    let dir = TempDir::new().unwrap();
    let output = tea_cmd(&dir)
        .args(["analyze", "--type", "Black tea", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "complete");
    assert_eq!(json["appliedWeights"]["flavor"], 1.0);
    assert_eq!(json["dominantElement"], "fire");
}

#[test]
fn analyze_nothing_fails() {
    let dir = TempDir::new().unwrap();
    tea_cmd(&dir)
        .arg("analyze")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing to analyze"));
}

#[test]
fn analyze_empty_record_reports_insufficient() {
    let dir = TempDir::new().unwrap();
    let file = write_json(&dir, "empty.json", serde_json::json!({"name": "Mystery"}));
    tea_cmd(&dir)
        .arg("analyze")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("dominant:   none"))
        .stdout(predicate::str::contains("Insufficient data"));
}

#[test]
fn flavor_explain() {
    let dir = TempDir::new().unwrap();
    tea_cmd(&dir)
        .args(["flavor", "umami, marine and vegetal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("signature:  japanese_green"))
        .stdout(predicate::str::contains("umami"));

    tea_cmd(&dir)
        .args(["flavor", "xyzzy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("uniform"));
}

#[test]
fn batch_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        &dir,
        "teas.json",
        serde_json::json!({"teas": [
            {"name": "a", "flavorProfile": ["grassy", "sweet"]},
            {"name": "b"},
            {"name": "c", "processingMethods": ["charcoal roasted"]}
        ]}),
    );
    let out = dir.path().join("out.json");
    tea_cmd(&dir)
        .arg("batch")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("analyzed 3 teas (2 complete, 1 insufficient)"));

    let export: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(export["version"], "1.0");
    assert_eq!(export["analyses"].as_array().unwrap().len(), 3);
    assert_eq!(export["analyses"][1]["analysis"]["status"], "insufficient_data");
}

#[test]
fn teas_lifecycle() {
    let dir = TempDir::new().unwrap();
    let file = write_json(
        &dir,
        "gyokuro.json",
        serde_json::json!({"flavorProfile": ["umami", "marine", "vegetal"], "caffeineLevel": 6}),
    );

    tea_cmd(&dir)
        .args(["teas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no saved teas)"));

    tea_cmd(&dir)
        .args(["teas", "add", "Gyokuro"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("saved Gyokuro"));

    tea_cmd(&dir)
        .args(["teas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gyokuro"));

    let output = tea_cmd(&dir).args(["teas", "show", "Gyokuro"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["record"]["name"], "Gyokuro");
    assert_eq!(json["latestAnalysis"]["status"], "complete");

    tea_cmd(&dir)
        .args(["teas", "remove", "Gyokuro"])
        .assert()
        .success();
    tea_cmd(&dir)
        .args(["teas", "remove", "Gyokuro"])
        .assert()
        .failure();
}

#[test]
fn analyze_save_records_history() {
    let dir = TempDir::new().unwrap();
    tea_cmd(&dir)
        .args(["analyze", "--flavor", "malty", "--save", "Breakfast"])
        .assert()
        .success()
        .stderr(predicate::str::contains("saved Breakfast"));

    tea_cmd(&dir)
        .args(["teas", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Breakfast"))
        .stdout(predicate::str::contains("1 analyses"));
}

#[test]
fn config_set_get_reset() {
    let dir = TempDir::new().unwrap();

    tea_cmd(&dir)
        .args(["config", "get", "elementWeights.flavor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.35"));

    tea_cmd(&dir)
        .args(["config", "set", "diminishingReturns.formula", "inverse_sqrt"])
        .assert()
        .success();
    assert!(dir.path().join("config.toml").exists());

    tea_cmd(&dir)
        .args(["config", "get", "diminishingReturns.formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains("inverse_sqrt"));

    tea_cmd(&dir)
        .args(["config", "set", "elementWeights.processing", "1.0"])
        .assert()
        .success();
    tea_cmd(&dir)
        .args(["config", "get", "elementWeights.flavor"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0.0"));

    tea_cmd(&dir).args(["config", "reset"]).assert().success();
    tea_cmd(&dir)
        .args(["config", "get", "diminishingReturns.formula"])
        .assert()
        .success()
        .stdout(predicate::str::contains("power:-0.3"));
}

#[test]
fn config_rejects_bad_values() {
    let dir = TempDir::new().unwrap();
    tea_cmd(&dir)
        .args(["config", "set", "diminishingReturns.formula", "count * 2"])
        .assert()
        .failure();
    tea_cmd(&dir)
        .args(["config", "set", "elementWeights.flavor", "-1"])
        .assert()
        .failure();
    tea_cmd(&dir)
        .args(["config", "get", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown config key"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    let dir = TempDir::new().unwrap();
    let output = tea_cmd(&dir)
        .args(["--verbose", "analyze", "--flavor", "grassy", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice::<serde_json::Value>(&output.stdout)
        .expect("stdout should stay pure JSON");
    assert!(!output.stderr.is_empty());
}
