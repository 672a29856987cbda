//! Integration tests for the CLI skeleton: help, version and argument
//! parsing.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn webapps() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("webapps"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    webapps().assert().code(2).stderr(predicate::str::contains(
        "Manage the lifecycle and settings of hosted web applications",
    ));
}

#[test]
fn test_cli_help_flag_shows_help() {
    webapps()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    webapps()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("webapps 0.1.0"));
}

// --- Command hierarchy tests ---

#[test]
fn test_help_lists_every_verb() {
    let assert = webapps().arg("--help").assert().success();
    let out = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8");
    for verb in [
        "show",
        "get",
        "set",
        "install",
        "uninstall",
        "update",
        "fortify",
        "version-status",
        "detect",
        "config",
    ] {
        assert!(out.contains(verb), "help is missing `{verb}`:\n{out}");
    }
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    webapps()
        .arg("reticulate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

// --- Argument parsing ---

#[test]
fn test_set_requires_an_assignment() {
    webapps()
        .args(["set", "/var/www/html"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_set_rejects_assignment_without_equals() {
    webapps()
        .args(["set", "/var/www/html", "ssl"])
        .env("WEBAPPS_CONFIG", "/nonexistent/webapps/config.yaml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE, got `ssl'"));
}

#[test]
fn test_uninstall_help_offers_yes_flag() {
    webapps()
        .args(["uninstall", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_get_requires_property() {
    webapps().args(["get", "/var/www/html"]).assert().code(2);
}

// --- Environment ---

#[test]
fn test_no_color_env_accepts_conventional_values() {
    for value in ["1", "true", "yes", ""] {
        Command::new(assert_cmd::cargo::cargo_bin!("webapps"))
            .env("NO_COLOR", value)
            .env("WEBAPPS_CONFIG", "/nonexistent/webapps/config.yaml")
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/nonexistent/webapps/config.yaml"));
    }
}

#[test]
fn test_version_taking_subcommands_parse() {
    webapps()
        .args(["version-status", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<VERSION>"));
    webapps()
        .args(["update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--version <VERSION>"));
}
