//! Integration tests for `mythwrap analyze` against stub analyzers
//!
//! Each test builds a throwaway project in a temp dir and points
//! `--analyzer` at a small shell script that prints known lines and exits
//! with a known code.

use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    // Stop config discovery at the project root
    fs::create_dir_all(dir.path().join(".git")).unwrap();
    dir
}

fn touch(base: &Path, rel: &str) {
    let path = base.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "pragma solidity ^0.8.0;\ncontract C {}\n").unwrap();
}

fn mythwrap(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mythwrap"));
    cmd.current_dir(dir)
        .stdin(Stdio::null())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[cfg(unix)]
fn stub(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("bin").join("myth");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn no_targets_fails_without_spawning() {
    let dir = project();
    mythwrap(dir.path())
        .args(["analyze", "--analyzer", "this_command_definitely_does_not_exist_12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No target files found"))
        .stderr(predicate::str::contains("instrumented/**/*.sol"))
        .stdout(predicate::str::contains("Running Mythril analysis").not());
}

#[test]
fn missing_analyzer_reports_os_error_and_exits_1() {
    let dir = project();
    touch(dir.path(), "instrumented/Vault.sol");
    mythwrap(dir.path())
        .args(["analyze", "--analyzer", "this_command_definitely_does_not_exist_12345"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Running Mythril analysis on instrumented/Vault.sol...",
        ))
        .stderr(predicate::str::contains("Error running Mythril analysis:"))
        .stderr(predicate::str::contains("this_command_definitely_does_not_exist_12345"));
}

#[test]
fn unknown_preset_is_a_usage_error() {
    let dir = project();
    mythwrap(dir.path())
        .args(["analyze", "--preset", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown preset 'nope'"));
}

#[test]
fn invalid_config_file_is_a_usage_error() {
    let dir = project();
    fs::create_dir_all(dir.path().join(".mythwrap")).unwrap();
    fs::write(dir.path().join(".mythwrap/config.toml"), "[analyzer\nbinary = ").unwrap();
    mythwrap(dir.path())
        .arg("presets")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration file"));
}

#[test]
fn workdir_flag_selects_project() {
    let dir = project();
    let elsewhere = TempDir::new().unwrap();
    mythwrap(elsewhere.path())
        .args(["-C"])
        .arg(dir.path())
        .args(["analyze", "--analyzer", "this_command_definitely_does_not_exist_12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No target files found"));
}

#[cfg(unix)]
mod unix {
    use super::*;

    #[test]
    fn success_prints_header_and_stdout_only() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        let analyzer = stub(dir.path(), "echo ok\necho 'solc warning' >&2\nexit 0");

        mythwrap(dir.path())
            .args(["analyze", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .success()
            .stdout(predicate::str::contains("Analysis completed successfully!\nok\n"))
            .stdout(predicate::str::contains("Errors/Warnings:").not())
            .stdout(predicate::str::contains("solc warning").not());
    }

    #[test]
    fn findings_are_reported_but_exit_zero_by_default() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        let analyzer = stub(dir.path(), "echo 'SWC-107 Reentrancy'\necho 'trace' >&2\nexit 1");

        mythwrap(dir.path())
            .args(["analyze", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Analysis found potential issues:\nSWC-107 Reentrancy\n",
            ))
            .stdout(predicate::str::contains("Errors/Warnings:\ntrace\n"));
    }

    #[test]
    fn fail_on_issues_exits_3() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        let analyzer = stub(dir.path(), "echo finding\nexit 1");

        mythwrap(dir.path())
            .args(["analyze", "--fail-on-issues", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("Analyzer reported issues for 1 target(s)"));
    }

    #[test]
    fn fallback_location_is_used_when_instrumented_dir_is_absent() {
        let dir = project();
        touch(dir.path(), "contracts/Vault.sol.instrumented");
        let analyzer = stub(dir.path(), "echo \"target=$2\"");

        mythwrap(dir.path())
            .args(["analyze", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .success()
            .stdout(predicate::str::contains("target=contracts/Vault.sol.instrumented"));
    }

    #[test]
    fn default_preset_passes_bounded_flags_in_order() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        let analyzer = stub(dir.path(), "echo \"$@\"");

        mythwrap(dir.path())
            .args(["analyze", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "analyze instrumented/Vault.sol --execution-timeout 60 --max-depth 3 \
                 --solver-timeout 60000 --pruning-factor 0.8\n",
            ));
    }

    #[test]
    fn stream_mode_relays_every_line_in_order() {
        let dir = project();
        touch(dir.path(), "contracts/Token.sol");
        let analyzer = stub(
            dir.path(),
            "i=1\nwhile [ $i -le 200 ]; do echo \"progress $i\"; i=$((i+1)); done\nprintf 'tail without newline'",
        );

        let output = mythwrap(dir.path())
            .args(["analyze", "--preset", "quick", "--analyzer"])
            .arg(&analyzer)
            .output()
            .unwrap();
        assert!(output.status.success());

        let stdout = String::from_utf8(output.stdout).unwrap();
        let progress: Vec<&str> = stdout.lines().filter(|l| l.starts_with("progress ")).collect();
        let expected: Vec<String> = (1..=200).map(|i| format!("progress {i}")).collect();
        assert_eq!(progress, expected);
        assert!(stdout.contains("tail without newline\nAnalysis completed successfully!"));
    }

    #[test]
    fn quick_preset_writes_solc_config_and_passes_it() {
        let dir = project();
        touch(dir.path(), "contracts/Token.sol");
        let analyzer = stub(dir.path(), "echo \"$@\"");

        let run = || {
            mythwrap(dir.path())
                .args(["analyze", "--preset", "quick", "--analyzer"])
                .arg(&analyzer)
                .assert()
                .success()
                .stdout(predicate::str::contains("--solc-json config/solc.json"));
        };

        run();
        let path = dir.path().join("config/solc.json");
        let first = fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(json["optimizer"]["enabled"], false);
        assert_eq!(json["optimizer"]["runs"], 200);
        assert_eq!(json["remappings"], serde_json::json!([]));
        assert!(json.get("version").is_none());

        run();
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn extra_args_follow_preset_flags() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        let analyzer = stub(dir.path(), "echo \"$@\"");

        mythwrap(dir.path())
            .args(["analyze", "--mode", "stream", "--analyzer"])
            .arg(&analyzer)
            .args(["--", "-m", "ether_thief"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--pruning-factor 0.8 -m ether_thief\n"));
    }

    #[test]
    fn explicit_targets_skip_discovery() {
        let dir = project();
        touch(dir.path(), "instrumented/Ignored.sol");
        touch(dir.path(), "src/Picked.sol");
        let analyzer = stub(dir.path(), "echo \"target=$2\"");

        mythwrap(dir.path())
            .args(["analyze", "--target", "src/Picked.sol", "--analyzer"])
            .arg(&analyzer)
            .assert()
            .success()
            .stdout(predicate::str::contains("target=src/Picked.sol"))
            .stdout(predicate::str::contains("Ignored.sol").not());
    }

    #[test]
    fn relative_workdir_anchors_relative_analyzer_once() {
        let outer = TempDir::new().unwrap();
        let proj = outer.path().join("proj");
        fs::create_dir_all(proj.join(".git")).unwrap();
        touch(&proj, "instrumented/A.sol");
        stub(&proj, "echo \"ran in $(basename \"$PWD\") on $2\"");

        mythwrap(outer.path())
            .args(["-C", "proj", "analyze", "--analyzer", "bin/myth"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ran in proj on instrumented/A.sol"));
    }

    #[test]
    fn config_file_supplies_analyzer_and_preset() {
        let dir = project();
        touch(dir.path(), "instrumented/Vault.sol");
        stub(dir.path(), "echo \"from-config $1\"");
        fs::create_dir_all(dir.path().join(".mythwrap")).unwrap();
        fs::write(
            dir.path().join(".mythwrap/config.toml"),
            "[analyzer]\nbinary = \"bin/myth\"\nmode = \"stream\"\n",
        )
        .unwrap();

        mythwrap(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("from-config analyze"));
    }
}
