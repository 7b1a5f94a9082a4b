// CLI surface checks against the built binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_no_subcommand_shows_usage() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("tramites").unwrap();

    cmd.current_dir(dir.path())
        .env("TRAMITES__OBSERVABILITY__JSON_LOGS", "false")
        .assert()
        .success()
        .stdout(predicate::str::contains("tramites serve"))
        .stdout(predicate::str::contains("tramites update-status"));
}

#[test]
fn test_help_lists_every_command() {
    let output = Command::cargo_bin("tramites")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in [
        "serve",
        "list",
        "show",
        "update-status",
        "set-cups",
        "delete",
        "lookup",
        "init-config",
    ] {
        assert!(stdout.contains(command), "missing {command} in help");
    }
}

#[test]
fn test_init_config_then_list_on_empty_database() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("tramites")
        .unwrap()
        .current_dir(dir.path())
        .arg("init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote tramites.toml"));
    assert!(dir.path().join("tramites.toml").exists());

    Command::cargo_bin("tramites")
        .unwrap()
        .current_dir(dir.path())
        .env("TRAMITES__DATABASE__URL", format!("sqlite://{}", dir.path().join("t.db").display()))
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No trámites match"));
}

#[test]
fn test_invalid_status_is_rejected() {
    Command::cargo_bin("tramites")
        .unwrap()
        .args(["update-status", "1", "--status", "Completado"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Estado no válido"));
}
