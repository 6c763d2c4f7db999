#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

fn cli(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("couverture-cli").unwrap();
    cmd.arg("--data-dir").arg(dir).arg("--workspace").arg("test");
    cmd
}

#[test]
fn add_agent_and_list() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["add-agent", "--name", "Nadia", "--level", "senior", "--remote"])
        .assert()
        .success();
    cli(dir.path())
        .arg("agents")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nadia | SA | Senior | remote=true"));
    assert!(dir.path().join("test.json").exists());

    cli(dir.path())
        .args(["add-agent", "--name", "Nadia"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("agent already exists"));
}

#[test]
fn report_flags_understaffing_with_exit_code_2() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["report", "--date", "2024-06-10"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("15:00 | cov"))
        .stderr(predicate::str::contains("Understaffed"));

    cli(dir.path())
        .args(["forecast", "--day", "Mon", "--daily-avg", "0"])
        .assert()
        .success();
    cli(dir.path())
        .args(["report", "--date", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: fully staffed"));
}

#[test]
fn csv_import_export_and_vacations() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.csv");
    std::fs::write(
        &input,
        "agent,day,active,start,end,break_start,break_minutes\nNadia,Mon,1,08:00,12:00,,0\n",
    )
    .unwrap();

    cli(dir.path())
        .args(["import-csv", "--csv"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 row(s), skipped 0, created 1 agent(s)"));

    let out = dir.path().join("out.csv");
    cli(dir.path())
        .args(["export-csv", "--out"])
        .arg(&out)
        .assert()
        .success();
    let exported = std::fs::read_to_string(&out).unwrap();
    assert!(exported.contains("Nadia,Mon,1,08:00,12:00,,0"));

    cli(dir.path())
        .args([
            "add-vacation", "--agent", "Nadia", "--start", "2024-06-12", "--end", "2024-06-10",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid vacation range"));
    cli(dir.path())
        .args([
            "add-vacation", "--agent", "Nadia", "--start", "2024-06-10", "--end", "2024-06-12",
        ])
        .assert()
        .success();
    cli(dir.path())
        .args(["vacations", "--agent", "Nadia"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10 → 2024-06-12"));
}

#[test]
fn serve_request_enforces_write_token() {
    let dir = tempdir().unwrap();
    let body = dir.path().join("body.json");
    std::fs::write(&body, r#"{"brand":"Montana"}"#).unwrap();

    cli(dir.path())
        .args(["serve-request", "--method", "PUT", "--body"])
        .arg(&body)
        .env("COUVERTURE_WRITE_TOKEN", "s3cret")
        .assert()
        .failure()
        .stdout(predicate::str::starts_with("401"));

    cli(dir.path())
        .args(["serve-request", "--method", "PUT", "--token", "s3cret", "--body"])
        .arg(&body)
        .env("COUVERTURE_WRITE_TOKEN", "s3cret")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"ok":true}"#));
}

#[test]
fn serve_request_returns_any_stored_blob() {
    let dir = tempdir().unwrap();
    let body = dir.path().join("body.json");
    std::fs::write(&body, r#"{"brand":"Montana","version":"v3"}"#).unwrap();

    cli(dir.path())
        .args(["serve-request", "--method", "PUT", "--body"])
        .arg(&body)
        .env_remove("COUVERTURE_WRITE_TOKEN")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("200"));

    cli(dir.path())
        .args(["serve-request", "--method", "GET"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("200"))
        .stdout(predicate::str::contains(r#""version":"v3""#));
}

#[test]
fn coverage_leaves_the_workspace_untouched() {
    let dir = tempdir().unwrap();
    cli(dir.path())
        .args(["coverage", "--date", "2024-06-10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-10 (Mon)"));
    assert!(!dir.path().join("test.json").exists());

    cli(dir.path())
        .args(["add-agent", "--name", "Nadia"])
        .assert()
        .success();
    let before = std::fs::read_to_string(dir.path().join("test.json")).unwrap();
    cli(dir.path())
        .args(["coverage", "--date", "2024-06-11"])
        .assert()
        .success();
    let after = std::fs::read_to_string(dir.path().join("test.json")).unwrap();
    assert_eq!(before, after);
}
