mod common;

use std::fs;
use std::process::Command;

use assert_fs::TempDir;
use assert_fs::prelude::*;
use common::TempHomeGuard;
use mac_cleanup::catalog::{Environment, default_targets};
use mac_cleanup::commands::estimate_message;
use mac_cleanup::sweep::{
    Action, CleanupTarget, RunMode, Sweep, TargetState, ToolCommand, ToolStatus, Toolbox,
    format_size, join_pattern,
};
use predicates::prelude::*;

struct NothingInstalled;

impl Toolbox for NothingInstalled {
    fn is_installed(&self, _program: &str) -> bool {
        false
    }

    fn invoke(&self, _command: &ToolCommand) -> ToolStatus {
        ToolStatus::Missing
    }
}

fn mac_cleanup() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mac-cleanup"))
}

/// Three 1 KiB files under a scratch directory and a target that clears it.
fn scratch_target() -> (TempDir, Vec<CleanupTarget>) {
    let temp = TempDir::new().unwrap();
    for name in ["one.cache", "two.cache", "three.cache"] {
        temp.child("scratch")
            .child(name)
            .write_binary(&[7u8; 1024])
            .unwrap();
    }

    let targets = vec![CleanupTarget::new(
        "scratch",
        "Clearing scratch files...",
        Action::delete([join_pattern(&temp.path().join("scratch"), "*")]),
    )];
    (temp, targets)
}

#[test]
fn test_dry_run_estimates_without_deleting() {
    let (temp, targets) = scratch_target();

    let summary = Sweep::builder()
        .targets(&targets)
        .toolbox(&NothingInstalled)
        .mode(RunMode::dry_run())
        .volume(temp.path())
        .build()
        .run()
        .unwrap();

    assert_eq!(summary.estimated.bytes(), 3072);
    assert_eq!(format_size(summary.estimated.bytes()), "3.00 KiB");
    assert_eq!(
        estimate_message(summary.estimated.bytes()),
        "Approx 3.00 KiB of space will be cleaned up"
    );
    assert!(summary.freed.is_none());
    assert_eq!(summary.removed(), 0);

    for name in ["one.cache", "two.cache", "three.cache"] {
        temp.child("scratch")
            .child(name)
            .assert(predicate::path::is_file());
    }
}

#[test]
fn test_live_run_removes_everything() {
    let (temp, targets) = scratch_target();

    let summary = Sweep::builder()
        .targets(&targets)
        .toolbox(&NothingInstalled)
        .mode(RunMode::live())
        .volume(temp.path())
        .build()
        .run()
        .unwrap();

    assert_eq!(summary.removed(), 3);
    assert_eq!(summary.failed_paths(), 0);
    assert_eq!(
        summary.outcome("scratch").map(|o| o.state),
        Some(TargetState::Completed)
    );
    assert!(summary.freed.is_some_and(|f| f.after.is_some()));

    temp.child("scratch").assert(predicate::path::is_dir());
    let left = fs::read_dir(temp.path().join("scratch")).unwrap().count();
    assert_eq!(left, 0);
}

#[test]
fn test_catalog_dry_run_inside_temporary_home() {
    let guard = TempHomeGuard::new();
    guard.write_file("Library/Developer/Xcode/DerivedData/App-abc/Build/out.o", 2048);
    guard.write_file("wget-log", 512);
    guard.write_file(".wget-hsts", 512);
    guard.write_file(".gradle/caches/modules-2/files.bin", 1024);

    let env = Environment::from_process().unwrap();
    assert_eq!(env.home(), guard.home());
    assert!(env.pyenv_virtualenv_cache().is_none());

    // Only targets confined to HOME, so the host system is never scanned.
    let targets: Vec<CleanupTarget> = default_targets(&env)
        .into_iter()
        .filter(|t| ["xcode", "wget", "gradle", "kite"].contains(&t.id()))
        .collect();
    assert_eq!(targets.len(), 4);

    let summary = Sweep::builder()
        .targets(&targets)
        .toolbox(&NothingInstalled)
        .mode(RunMode::dry_run())
        .volume(guard.home())
        .build()
        .run()
        .unwrap();

    assert_eq!(summary.estimated.bytes(), 4096);
    assert_eq!(
        summary.outcome("kite").map(|o| o.state),
        Some(TargetState::Skipped)
    );
    assert_eq!(summary.ran(), 3);
    assert!(guard.home().join("wget-log").exists());
    assert!(
        guard
            .home()
            .join(".gradle/caches/modules-2/files.bin")
            .exists()
    );
}

#[test]
fn test_catalog_reads_optional_variables() {
    let guard = TempHomeGuard::new();
    let pyenv_cache = guard.home().join(".pyenv/cache");
    guard.set_var("PYENV_VIRTUALENV_CACHE_PATH", &pyenv_cache);
    guard.set_var("GOPATH", "/opt/go-first:/opt/go-second");

    let env = Environment::from_process().unwrap();
    assert_eq!(env.pyenv_virtualenv_cache(), Some(pyenv_cache.as_path()));
    assert_eq!(env.gopath(), std::path::PathBuf::from("/opt/go-first"));

    let ids: Vec<String> = default_targets(&env)
        .iter()
        .map(|t| t.id().to_string())
        .collect();
    let pyenv = ids.iter().position(|id| id == "pyenv-virtualenv").unwrap();
    let npm = ids.iter().position(|id| id == "npm").unwrap();
    assert_eq!(pyenv + 1, npm);
}

#[test]
fn test_unknown_flag_fails() {
    let output = mac_cleanup().arg("--bogus").output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--bogus"), "stderr was: {stderr}");
}

#[test]
fn test_help_lists_flags() {
    let output = mac_cleanup().arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in ["--dry-run", "--verbose", "--update", "--no-color"] {
        assert!(stdout.contains(flag), "help is missing {flag}");
    }
}

#[test]
fn test_version_flag() {
    let output = mac_cleanup().arg("--version").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}
