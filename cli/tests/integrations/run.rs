use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const MODEL: &str = r#"{
    "transport": { "formule": { "somme": ["transport . voiture", "transport . avion"] } },
    "transport . voiture": { "formule": 1200 },
    "transport . avion": { "applicable si": "avion . usager", "par défaut": 350 },
    "transport . avion . usager": { "par défaut": "'non'" },
    "transport . facteur": {
        "formule": {
            "variations": [
                { "si": "km > 1000", "alors": 0.2 },
                { "sinon": { "somme": ["transport . base"] } }
            ]
        }
    },
    "transport . base": 0.5
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_cli_run_without_situation() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run").arg(&model).arg("transport");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("transport"))
        .stdout(predicate::str::contains("1200"));
}

#[test]
fn test_cli_run_with_situation() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);
    let situation = write(
        &temp_dir,
        "situation.json",
        r#"{ "transport . avion . usager": "oui" }"#,
    );

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run")
        .arg(&model)
        .arg("transport")
        .arg("--situation")
        .arg(&situation);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1550"));
}

#[test]
fn test_cli_run_raw_output() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);
    let situation = write(&temp_dir, "situation.json", r#"{ "transport . km": 5000 }"#);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run")
        .arg(&model)
        .arg("transport . facteur")
        .arg("transport . voiture")
        .arg("-s")
        .arg(&situation)
        .arg("--raw");

    cmd.assert().success().stdout("0.2\n1200\n");
}

#[test]
fn test_cli_run_unknown_name_is_zero() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run").arg(&model).arg("logement").arg("--raw");

    cmd.assert().success().stdout("0\n");
}

#[test]
fn test_cli_run_invalid_model() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", "{\n  \"a\": { \"formule\": }\n}");

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run").arg(&model).arg("a");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Registry error"));
}

#[test]
fn test_cli_run_missing_file() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("run")
        .arg(temp_dir.path().join("missing.json"))
        .arg("a");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn test_cli_show_rule() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("show").arg(&model).arg("transport . facteur");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("formula: variations"))
        .stdout(predicate::str::contains("if km > 1000 then 0.2"))
        .stdout(predicate::str::contains("otherwise (sum [transport . base])"));
}

#[test]
fn test_cli_show_nonexistent_rule() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("show").arg(&model).arg("logement");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_list_with_prefix() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("list")
        .arg(&model)
        .arg("--prefix")
        .arg("transport . avion");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Model contains 6 rules"))
        .stdout(predicate::str::contains("transport . avion . usager"))
        .stdout(predicate::str::contains("transport . facteur").not());
}

#[test]
fn test_cli_stats() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);
    let situations = write(
        &temp_dir,
        "situations.json",
        r#"[
            { "transport . avion . usager": "oui" },
            {},
            { "transport . avion . usager": "oui", "transport . avion": 850 }
        ]"#,
    );
    let catalogue = write(
        &temp_dir,
        "funfacts.json",
        r#"[
            { "key": "averageTransport", "dottedName": "transport" },
            { "key": "flyers", "dottedName": "transport . avion", "aggregation": "share" }
        ]"#,
    );

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("stats")
        .arg(&model)
        .arg("--situations")
        .arg(&situations)
        .arg("--catalogue")
        .arg(&catalogue)
        .arg("--raw");

    let output = cmd.assert().success().get_output().stdout.clone();
    let facts: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(facts["participants"], 3);
    assert_eq!(facts["values"]["averageTransport"], 1600.0);
}

#[test]
fn test_cli_stats_table() {
    let temp_dir = TempDir::new().unwrap();
    let model = write(&temp_dir, "model.json", MODEL);
    let situations = write(&temp_dir, "situations.json", "[{}, {}]");
    let catalogue = write(
        &temp_dir,
        "funfacts.json",
        r#"[{ "key": "totalTransport", "dottedName": "transport", "aggregation": "sum" }]"#,
    );

    let mut cmd = Command::cargo_bin("footprint").unwrap();
    cmd.arg("stats")
        .arg(&model)
        .arg("-s")
        .arg(&situations)
        .arg("-c")
        .arg(&catalogue);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Computed over 2 participants"))
        .stdout(predicate::str::contains("totalTransport"))
        .stdout(predicate::str::contains("2400"));
}
