//! CLI integration tests using assert_cmd.
//!
//! None of these need a database: they cover help output and argument
//! validation, plus the error path when a database command has no URL.

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn pimtrack() -> Command {
    let mut cmd = Command::cargo_bin("pimtrack").unwrap();
    cmd.env_remove("DATABASE_URL").env_remove("PIMTRACK_CONFIG");
    cmd
}

#[test]
fn help_shows_all_subcommands() {
    pimtrack().arg("--help").assert().success().stdout(
        predicate::str::contains("serve")
            .and(predicate::str::contains("migrate"))
            .and(predicate::str::contains("seed"))
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("--database-url"))
            .and(predicate::str::contains("--config")),
    );
}

#[test]
fn help_serve_shows_args() {
    pimtrack()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--port")
                .and(predicate::str::contains("--bind"))
                .and(predicate::str::contains("--seed")),
        );
}

#[test]
fn help_list_shows_filters() {
    pimtrack()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--team")
                .and(predicate::str::contains("--engineer"))
                .and(predicate::str::contains("--json")),
        );
}

#[test]
fn missing_subcommand_fails() {
    pimtrack().assert().failure();
}

#[test]
fn unknown_subcommand_fails() {
    pimtrack()
        .arg("books")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn invalid_port_fails() {
    pimtrack()
        .args(["serve", "--port", "not-a-port"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn engineer_requires_team() {
    pimtrack()
        .args(["list", "--engineer", "Louie"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--team"));
}

#[test]
fn migrate_without_database_url_fails() {
    pimtrack()
        .arg("migrate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL is required"));
}

#[test]
fn serve_rejects_missing_config_file() {
    pimtrack()
        .args(["serve", "--config", "/nonexistent/pimtrack.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reading config file"));
}

#[test]
fn serve_rejects_invalid_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pimtrack.toml");
    std::fs::write(&path, "[server]\nport = 0\n").unwrap();

    pimtrack()
        .args(["serve", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.port must be non-zero"));
}
