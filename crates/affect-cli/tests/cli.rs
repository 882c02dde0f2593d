//! CLI command integration tests.
//! Each test uses a temp directory via AFFECT_DATA_DIR for full isolation.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn affect_cmd(data_dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("affect").unwrap();
    cmd.env("AFFECT_DATA_DIR", data_dir.path());
    cmd
}

#[test]
fn state_fresh_store() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Emotional State"))
        .stdout(predicate::str::contains("Curiosity"))
        .stdout(predicate::str::contains("Session:"));
}

#[test]
fn process_then_state_shows_change() {
    let dir = TempDir::new().unwrap();

    affect_cmd(&dir)
        .args(["process", "thanks, that was excellent", "--feedback", "0.9"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());

    affect_cmd(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("Joy"));
}

#[test]
fn process_rejects_out_of_range_feedback() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["process", "hello", "--feedback", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feedback must be in [0, 1]"));
}

#[test]
fn process_with_context_outcome() {
    let dir = TempDir::new().unwrap();
    // Repeated failures push anger past the display floor even though the
    // text itself names no trigger words.
    for _ in 0..4 {
        affect_cmd(&dir)
            .args(["process", "quiet message", "--context", "task_outcome=failure"])
            .assert()
            .success();
    }

    affect_cmd(&dir)
        .arg("state")
        .assert()
        .success()
        .stdout(predicate::str::contains("Anger"));
}

#[test]
fn process_rejects_malformed_context() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["process", "hello", "--context", "no-equals"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not key=value"));
}

#[test]
fn predict_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["process", "everything failed and is broken"])
        .assert()
        .success();

    let a = affect_cmd(&dir)
        .args(["predict", "--minutes", "15", "--seed", "7"])
        .output()
        .unwrap();
    let b = affect_cmd(&dir)
        .args(["predict", "--minutes", "15", "--seed", "7"])
        .output()
        .unwrap();
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);

    let stdout = String::from_utf8_lossy(&a.stdout);
    assert!(stdout.contains("Forecast (+15 minutes)"));
    assert!(stdout.contains("not a trained forecast"));
}

#[test]
fn history_lists_interactions() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["process", "tell me more about this"])
        .assert()
        .success();

    affect_cmd(&dir)
        .args(["history", "--limit", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tell me more about this"));
}

#[test]
fn backup_restore_roundtrip() {
    let dir = TempDir::new().unwrap();

    affect_cmd(&dir)
        .args(["process", "solved it, thanks"])
        .assert()
        .success();

    let output = affect_cmd(&dir)
        .args(["backup", "--reason", "test"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let backup_path = stdout
        .trim()
        .strip_prefix("backup written to ")
        .expect("backup prints its path")
        .to_string();

    affect_cmd(&dir)
        .args(["restore", &backup_path])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored from"));
}

#[test]
fn cleanup_reports_counts() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["cleanup", "--days", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 0 snapshots"));
}

#[test]
fn reset_rotates_session() {
    let dir = TempDir::new().unwrap();
    affect_cmd(&dir)
        .args(["process", "hello there"])
        .assert()
        .success();

    let before = affect_cmd(&dir).arg("state").output().unwrap();
    affect_cmd(&dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("new session"));
    let after = affect_cmd(&dir).arg("state").output().unwrap();

    let session = |out: &std::process::Output| {
        String::from_utf8_lossy(&out.stdout)
            .lines()
            .find(|l| l.starts_with("Session:"))
            .unwrap()
            .to_string()
    };
    assert_ne!(session(&before), session(&after));
}

#[test]
fn export_writes_state_json() {
    let dir = TempDir::new().unwrap();
    let out_path = dir.path().join("state.json");

    affect_cmd(&dir)
        .args(["process", "this is fascinating"])
        .assert()
        .success();

    affect_cmd(&dir)
        .arg("export")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("exported to"));

    let json = std::fs::read_to_string(&out_path).unwrap();
    assert!(json.contains("\"primary_emotions\""));
    assert!(json.contains("\"session_id\""));
}

#[test]
fn invalid_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "decay_rate = 5.0\n").unwrap();

    affect_cmd(&dir)
        .arg("state")
        .assert()
        .failure()
        .stderr(predicate::str::contains("decay_rate"));
}

#[test]
fn config_overrides_apply() {
    let dir = TempDir::new().unwrap();
    // With intensity zeroed, even strong praise produces no deltas and the
    // seeded state just decays. The introspection gate is closed so the
    // output is deterministic.
    std::fs::write(
        dir.path().join("config.toml"),
        "intensity = 0.0\nintrospection_frequency = 0.0\n",
    )
    .unwrap();

    affect_cmd(&dir)
        .args(["process", "thanks, excellent, perfect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(no directive)"));
}
