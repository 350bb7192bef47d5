//! Integration tests for the unitconv binary.
//!
//! These tests verify end-to-end behavior including:
//! - One-shot conversions and listings
//! - Generic notices for invalid lookups
//! - Config-driven custom units and temperature mode
//! - Interactive sessions with history export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to create a test directory holding a config file
fn setup_test_dir(config: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, config).expect("Failed to write config");
    (temp_dir, config_path)
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("unitconv"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Unit conversion calculator with session history",
        ));
}

#[test]
fn test_convert_metre_to_foot() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["convert", "1", "Metre", "Foot", "--category", "Length"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("1 Metre = 3.28 Foot"));
}

#[test]
fn test_convert_negative_temperature() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["convert", "-40", "Celsius", "Fahrenheit", "-c", "Temperature"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("-40 Celsius = -40.00 Fahrenheit"));
}

#[test]
fn test_convert_multiple_targets() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["convert", "1", "Kilogram", "Pound", "-c", "Weight"])
        .args(["--also", "Gram", "--also", "Ounce"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pound"))
        .stdout(predicate::str::contains("1000.00"))
        .stdout(predicate::str::contains("35.27"));
}

#[test]
fn test_convert_json_output() {
    let (_dir, config) = setup_test_dir("");

    let output = cli()
        .args(["convert", "0", "Celsius", "Fahrenheit", "-c", "Temperature", "--json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(value["category"], "Temperature");
    assert_eq!(value["results"][0]["unit"], "Fahrenheit");
    assert_eq!(value["results"][0]["value"], 32.0);
}

#[test]
fn test_unknown_unit_shows_generic_notice() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["convert", "1", "Lightyear", "Metre", "-c", "Length"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Invalid unit conversion. Please check your inputs.",
        ))
        .stderr(predicate::str::contains("Lightyear").not());
}

#[test]
fn test_unknown_category_shows_generic_notice() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["list", "Distance"])
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit conversion"));
}

#[test]
fn test_list_categories() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout("Length\nWeight\nTemperature\nVolume\nArea\n");
}

#[test]
fn test_list_units_json() {
    let (_dir, config) = setup_test_dir("");

    let output = cli()
        .args(["list", "Area", "--json"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let units: Vec<String> = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(
        units,
        vec!["Square Metre", "Square Foot", "Square Yard", "Acre", "Hectare"]
    );
}

#[test]
fn test_info() {
    let (_dir, config) = setup_test_dir("");

    cli()
        .args(["info", "Kilogram"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("base unit of mass"));

    cli()
        .args(["info", "Furlong"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("No information available"));
}

#[test]
fn test_config_custom_units() {
    let (_dir, config) = setup_test_dir(
        r#"
[[custom]]
from = "Foo"
to = "Bar"
factor = 5.0
"#,
    );

    cli()
        .args(["convert", "2", "Foo", "Bar", "-c", "Custom"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 Foo = 10.00 Bar"));
}

#[test]
fn test_config_target_only_temperature() {
    let (_dir, config) = setup_test_dir(
        r#"
[conversion]
temperature_mode = "target-only"
"#,
    );

    cli()
        .args(["convert", "32", "Fahrenheit", "Celsius", "-c", "Temperature"])
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("= 32.00 Celsius"));
}

#[test]
fn test_invalid_config_fails() {
    let (_dir, config) = setup_test_dir("[history\nprecision = ");

    cli()
        .arg("list")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("TOML error"));
}

#[test]
fn test_session_export_roundtrip() {
    let (dir, config) = setup_test_dir("");
    let export_path = dir.path().join("history.csv");

    let script = format!(
        "convert 1 Metre Foot Length\nsave\nconvert 100 Celsius Kelvin Temperature\nsave\n\
         convert 1 \"Square Metre\" \"Square Foot\" Area\nsave\nexport {}\nquit\n",
        export_path.display()
    );

    cli()
        .arg("session")
        .arg("--config")
        .arg(&config)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved to history (3 entries)."))
        .stdout(predicate::str::contains("History exported to"));

    let mut reader = csv::Reader::from_path(&export_path).expect("export exists");
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["Date", "Category", "Value", "From", "To", "Converted"]
    );

    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().skip(1).map(String::from).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["Length", "1.0", "Metre", "Foot", "3.28"],
            vec!["Temperature", "100.0", "Celsius", "Kelvin", "373.15"],
            vec!["Area", "1.0", "Square Metre", "Square Foot", "10.76"],
        ]
    );
}

#[test]
fn test_session_export_to_missing_directory_fails() {
    let (dir, config) = setup_test_dir("");
    let export_path = dir.path().join("out").join("history.csv");

    cli()
        .arg("session")
        .arg("--config")
        .arg(&config)
        .write_stdin(format!(
            "convert 1 Metre Foot Length\nsave\nexport {}\nquit\n",
            export_path.display()
        ))
        .assert()
        .success()
        .stdout(predicate::str::contains("Export failed"));

    assert!(!export_path.exists());
}

#[test]
fn test_session_default_export_path() {
    let (dir, config) = setup_test_dir("");
    let export_path = dir.path().join("session.csv");

    cli()
        .arg("session")
        .arg("--export")
        .arg(&export_path)
        .arg("--config")
        .arg(&config)
        .write_stdin("convert 1 Litre Cup Volume\nsave\nexport\n")
        .assert()
        .success();

    let content = fs::read_to_string(&export_path).expect("export exists");
    assert!(content.starts_with("Date,Category,Value,From,To,Converted"));
    assert!(content.contains(",Volume,1.0,Litre,Cup,4.23"));
}

#[test]
fn test_session_history_is_not_persisted() {
    let (dir, config) = setup_test_dir("");

    cli()
        .arg("session")
        .arg("--config")
        .arg(&config)
        .current_dir(dir.path())
        .write_stdin("convert 1 Metre Foot Length\nsave\nquit\n")
        .assert()
        .success();

    // A fresh session starts with an empty history and nothing on disk
    cli()
        .arg("session")
        .arg("--config")
        .arg(&config)
        .current_dir(dir.path())
        .write_stdin("history\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("History is empty."));

    assert!(!dir.path().join("conversion_history.csv").exists());
}
