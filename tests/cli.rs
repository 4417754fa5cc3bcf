//! End-to-end tests for the `edu` command line

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `edu` with config and data directories isolated in `home`
fn edu(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("edu").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env("EDUPORTAL_COLOR_SCHEME", "dark")
        .env_remove("EDUPORTAL_API_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn routes_lists_every_page() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .arg("routes")
        .assert()
        .success()
        .stdout(predicate::str::contains("/pdfbooks"))
        .stdout(predicate::str::contains("/privacy-policy"))
        .stdout(predicate::str::contains("Question Bank"));
}

#[test]
fn theme_show_defaults_follow_system() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Background: auto (system is dark)"))
        .stdout(predicate::str::contains("dark mode"))
        .stdout(predicate::str::contains("#29b6f6"));
}

#[test]
fn theme_set_persists_across_runs() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["theme", "set", "--background", "light", "--primary", "green"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Theme updated."));

    edu(&home)
        .args(["theme", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Background: light"))
        .stdout(predicate::str::contains("Primary:    green"))
        .stdout(predicate::str::contains("#4caf50"));

    edu(&home)
        .args(["theme", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Background: auto"));
}

#[test]
fn theme_set_rejects_unknown_values() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["theme", "set", "--primary", "red"])
        .assert()
        .failure();
}

#[test]
fn config_roundtrip() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["config", "set", "api-url", "https://portal.example.com/api/v1/"])
        .assert()
        .success();

    edu(&home)
        .args(["config", "get", "api-url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://portal.example.com/api/v1"));

    edu(&home)
        .args(["config", "set", "timeout", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid number of seconds"));
}

#[test]
fn countdown_runs_to_expiry() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["countdown", "1", "--target", "shortquiz"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Time is up!"))
        .stdout(predicate::str::contains("/shortquiz"));
}

#[test]
fn countdown_rejects_unknown_page() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["countdown", "5", "--target", "cafeteria"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown page 'cafeteria'"));
}

#[test]
fn fetch_reports_unreachable_server() {
    let home = TempDir::new().unwrap();
    edu(&home)
        .args(["fetch", "pdfbooks", "--api-url", "http://127.0.0.1:9/api/v1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Could not connect to the server"));
}
