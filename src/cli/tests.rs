use clap::Parser;
use clap::error::ErrorKind;

use crate::cli::Cli;
use crate::sweep::RunMode;

#[test]
fn test_cli_defaults() {
    let cli = Cli::parse_from(["mac-cleanup"]);
    assert!(!cli.dry_run());
    assert!(!cli.update());
    assert_eq!(cli.verbose(), 0);
    if std::env::var_os("NO_COLOR").is_none() {
        assert!(!cli.no_color());
    }
    assert_eq!(cli.run_mode(), RunMode::live());
}

#[test]
fn test_long_flags() {
    let cli = Cli::parse_from(["mac-cleanup", "--dry-run", "--update", "--no-color"]);
    assert!(cli.dry_run());
    assert!(cli.update());
    assert!(cli.no_color());
    assert_eq!(cli.run_mode(), RunMode::dry_run().with_update(true));
}

#[test]
fn test_short_flags() {
    let cli = Cli::parse_from(["mac-cleanup", "-d", "-u", "-n"]);
    assert!(cli.dry_run());
    assert!(cli.update());
    assert!(cli.no_color());
}

#[test]
fn test_verbose_flag() {
    let cli = Cli::parse_from(["mac-cleanup", "-vv"]);
    assert_eq!(cli.verbose(), 2);

    let cli = Cli::parse_from(["mac-cleanup", "--verbose"]);
    assert_eq!(cli.verbose(), 1);
}

#[test]
fn test_unknown_flag_is_rejected() {
    let err = Cli::try_parse_from(["mac-cleanup", "--bogus"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    assert!(err.to_string().contains("--bogus"));
    assert_ne!(err.exit_code(), 0);
}

#[test]
fn test_positional_arguments_are_rejected() {
    let err = Cli::try_parse_from(["mac-cleanup", "everything"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownArgument);
}

#[test]
fn test_help_is_displayed() {
    let err = Cli::try_parse_from(["mac-cleanup", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    let help = err.to_string();
    assert!(help.contains("--dry-run"));
    assert!(help.contains("--update"));
    assert_eq!(err.exit_code(), 0);
}

#[test]
fn test_cli_builder() {
    let cli = Cli::builder().dry_run(true).verbose(1).no_color(true).build();
    assert!(cli.dry_run());
    assert_eq!(cli.verbose(), 1);
    assert!(cli.no_color());
    assert!(!cli.update());
    assert!(cli.run_mode().is_dry_run());
}
