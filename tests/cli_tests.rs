mod common;

use assert_cmd::Command;
use common::{sample_finances, temp_home};
use lifeplan_storage_json::save_to_path;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use std::path::Path;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("lifeplan_cli").expect("binary built");
    cmd.env("LIFEPLAN_HOME", home)
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn version_prints_build_metadata() {
    let home = temp_home();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(format!("lifeplan {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("rustc:"));
    assert!(!home.join("config").exists(), "version must not create config");
}

#[test]
fn period_uses_default_paydays_for_new_user() {
    let home = temp_home();
    cli(&home)
        .args(["period", "2024-02-05"])
        .assert()
        .success()
        .stdout(contains("2024-01-30 to 2024-02-15"));

    let config = std::fs::read_to_string(home.join("config").join("config.json"))
        .expect("config written on first run");
    assert!(config.contains("userId"));
}

#[test]
fn imported_data_drives_range_totals_and_masking() {
    let home = temp_home();
    let file = home.join("import.json");
    save_to_path(&sample_finances(uuid::Uuid::new_v4()), &file).expect("write import file");

    cli(&home)
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Imported 3 templates and 2 transactions."));

    cli(&home)
        .args(["range", "2024-01-01", "2024-01-31"])
        .assert()
        .success()
        .stdout(contains("3000.00 USD").and(contains("1089.00 USD")));

    cli(&home).args(["hide-amounts", "on"]).assert().success();

    cli(&home)
        .args(["range", "2024-01-01", "2024-01-31"])
        .assert()
        .success()
        .stdout(contains("•••").and(contains("USD").not()));
}

#[test]
fn export_prints_json_only() {
    let home = temp_home();
    let output = cli(&home).arg("export").output().expect("run export");
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is pure json");
    assert!(value["templates"].as_array().is_some_and(Vec::is_empty));
}

#[test]
fn bad_input_fails_with_message() {
    let home = temp_home();
    cli(&home)
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(contains("unknown command `frobnicate`"));

    cli(&home)
        .args(["period", "2024-02-30"])
        .assert()
        .failure()
        .stderr(contains("invalid date `2024-02-30`"));
}
