//! Command-line parsing as seen from outside the crate.

use clap::Parser;

use mousetrail::cli::{Cli, Command, ConfigCommand};
use mousetrail::logging::Verbosity;

#[test]
fn every_subcommand_parses() {
    let cases: &[&[&str]] = &[
        &["mousetrail", "record"],
        &["mousetrail", "analyze", "20240101_120000"],
        &["mousetrail", "heatmap", "20240101_120000", "-g", "30", "-s", "0"],
        &["mousetrail", "stats", "20240101_120000"],
        &["mousetrail", "sessions"],
        &["mousetrail", "status", "--json"],
        &["mousetrail", "config", "show"],
        &["mousetrail", "config", "path"],
        &["mousetrail", "config", "validate"],
    ];
    for args in cases {
        assert!(Cli::try_parse_from(*args).is_ok(), "failed to parse {args:?}");
    }
}

#[test]
fn unknown_subcommand_rejected() {
    assert!(Cli::try_parse_from(["mousetrail", "daemon", "start"]).is_err());
}

#[test]
fn global_flags_after_subcommand() {
    let cli = Cli::try_parse_from(["mousetrail", "config", "show", "--json", "-v"]).unwrap();
    assert_eq!(cli.verbosity(), Verbosity::Verbose);
    assert!(matches!(
        cli.command,
        Command::Config(ConfigCommand::Show { json: true })
    ));
}

/// The built binary with config lookups and env overrides kept inside `home`.
fn mousetrail(home: &std::path::Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_mousetrail"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for (key, _) in std::env::vars() {
        if key.starts_with("MOUSETRAIL_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

#[test]
fn config_validate_fails_on_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[heatmap]\nalpha = 3.0\n").unwrap();

    let output = mousetrail(dir.path())
        .args(["config", "validate", "-f"])
        .arg(&bad)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("alpha"), "stderr: {stderr}");
}

#[test]
fn config_validate_accepts_good_file() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.toml");
    std::fs::write(&good, "[heatmap]\nsigma = 2.0\ngrid_size = 40\n").unwrap();

    let output = mousetrail(dir.path())
        .args(["config", "validate", "-f"])
        .arg(&good)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration is valid."));
}

#[test]
fn config_validate_uses_global_config_flag() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[heatmap]\ngrid_size = 1\n").unwrap();

    let output = mousetrail(dir.path())
        .arg("-c")
        .arg(&bad)
        .args(["config", "validate"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("grid_size"));
}

#[test]
fn config_path_works_with_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[heatmap]\nalpha = 3.0\n").unwrap();

    let output = mousetrail(dir.path())
        .arg("-c")
        .arg(&bad)
        .args(["config", "path"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), bad.display().to_string());
}

#[test]
fn other_commands_reject_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[heatmap]\nalpha = 3.0\n").unwrap();

    let output = mousetrail(dir.path())
        .arg("-c")
        .arg(&bad)
        .args(["sessions", "--json"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("loading configuration"));
}

#[test]
fn heatmap_rejects_huge_sigma_override() {
    let dir = tempfile::tempdir().unwrap();

    let output = mousetrail(dir.path())
        .args(["heatmap", "20240101_120000", "-s", "1e17"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("sigma"));
}
