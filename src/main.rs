//! # mac-cleanup CLI
//!
//! Frees disk space on macOS by removing caches, logs and tool leftovers.
//!
//! ```bash
//! # See how much would be freed, then decide
//! mac-cleanup --dry-run
//!
//! # Clean now, updating Homebrew and App Store apps first
//! mac-cleanup --update
//! ```
//!
//! ## Environment Variables
//!
//! - `MAC_CLEANUP_DRY_RUN`: Same as `--dry-run`
//! - `MAC_CLEANUP_VERBOSE`: Same as `--verbose`
//! - `MAC_CLEANUP_UPDATE`: Same as `--update`
//! - `NO_COLOR`: Same as `--no-color`
//! - `PYENV_VIRTUALENV_CACHE_PATH`: Enables the pyenv-virtualenv cache target
//! - `GOPATH`: Locates the Go module cache (default `~/go`)

use std::io::IsTerminal;

use mac_cleanup::cli::Cli;

fn main() -> miette::Result<()> {
    miette::set_panic_hook();

    if std::io::stderr().is_terminal() {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::unicode_nocolor())
                    .with_context_lines(3),
            )
        }))?;
    } else {
        miette::set_hook(Box::new(|_| {
            Box::new(
                miette::GraphicalReportHandler::new()
                    .with_theme(miette::GraphicalTheme::none())
                    .with_context_lines(0),
            )
        }))?;
    }

    let cli = Cli::parse_args();

    mac_cleanup::commands::execute(&cli).map_err(Into::into)
}
