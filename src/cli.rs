//! Command-line interface definitions for mac-cleanup.
//!
//! Every flag has an environment variable fallback so the tool can be
//! configured from a shell profile. Boolean variables accept the usual falsey
//! spellings (`0`, `false`, `no`, `off`, empty) and treat anything else as set,
//! which makes `NO_COLOR=1` work as expected.
//!
//! # Example
//!
//! ```no_run
//! use mac_cleanup::cli::Cli;
//!
//! let cli = Cli::parse_args();
//! if cli.dry_run() {
//!     println!("estimating only");
//! }
//! ```

use clap::Parser;
use clap::builder::FalseyValueParser;

use crate::sweep::RunMode;

/// Main command-line interface for mac-cleanup.
#[derive(Debug, Parser)]
#[command(
    name = "mac-cleanup",
    bin_name = "mac-cleanup",
    author,
    version,
    about = "Reclaim disk space on macOS by clearing caches, logs and tool leftovers",
    long_about = None
)]
pub struct Cli {
    /// Only estimate how much space would be freed; remove nothing
    #[arg(
        short,
        long,
        env = "MAC_CLEANUP_DRY_RUN",
        value_parser = FalseyValueParser::new()
    )]
    dry_run: bool,

    /// Print every path and command (use twice to show tool output)
    #[arg(short, long, action = clap::ArgAction::Count, env = "MAC_CLEANUP_VERBOSE")]
    verbose: u8,

    /// Also update Homebrew formulae and Mac App Store applications
    #[arg(
        short,
        long,
        env = "MAC_CLEANUP_UPDATE",
        value_parser = FalseyValueParser::new()
    )]
    update: bool,

    /// Disable colored output
    #[arg(
        short,
        long,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    no_color: bool,
}

impl Cli {
    /// Parse the process arguments, exiting with usage on error.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn builder() -> CliBuilder {
        CliBuilder::default()
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    pub fn update(&self) -> bool {
        self.update
    }

    pub fn no_color(&self) -> bool {
        self.no_color
    }

    /// The run mode selected by `--dry-run` and `--update`.
    pub fn run_mode(&self) -> RunMode {
        let mode = if self.dry_run {
            RunMode::dry_run()
        } else {
            RunMode::live()
        };
        mode.with_update(self.update)
    }
}

/// Builder for [`Cli`]
#[derive(Debug, Default)]
pub struct CliBuilder {
    dry_run: bool,
    verbose: u8,
    update: bool,
    no_color: bool,
}

impl CliBuilder {
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    pub fn verbose(mut self, level: u8) -> Self {
        self.verbose = level;
        self
    }

    pub fn update(mut self, enabled: bool) -> Self {
        self.update = enabled;
        self
    }

    pub fn no_color(mut self, enabled: bool) -> Self {
        self.no_color = enabled;
        self
    }

    pub fn build(self) -> Cli {
        Cli {
            dry_run: self.dry_run,
            verbose: self.verbose,
            update: self.update,
            no_color: self.no_color,
        }
    }
}

#[cfg(test)]
mod tests;
