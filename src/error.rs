//! Error types for mac-cleanup.
//!
//! This module defines the errors that can stop a cleanup run, using a
//! combination of `thiserror` for ergonomic error definitions and `miette`
//! for rich diagnostic output.
//!
//! # Error Handling Strategy
//!
//! - Only setup failures are returned as [`CleanupError`]: refused
//!   privileges, an unknown home directory, a failed free-space probe before
//!   the first target runs, or a failed interrupt handler installation
//! - Per-path failures (permission denied, vanished paths) are recorded in a
//!   [`DeletionReport`](crate::sweep::DeletionReport) and never abort a run
//! - Per-target failures (bad pattern, failing external tool) are recorded in
//!   a [`TargetOutcome`](crate::sweep::TargetOutcome)
//! - Errors are automatically converted to `miette::Result` for CLI output
//!
//! # Example
//!
//! ```no_run
//! use mac_cleanup::error::{CleanupError, Result};
//!
//! fn require_home() -> Result<std::path::PathBuf> {
//!     home::home_dir().ok_or(CleanupError::HomeNotFound)
//! }
//! ```

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error types that can occur in mac-cleanup operations
#[derive(Error, Debug, Diagnostic)]
pub enum CleanupError {
    /// A cleanup target carries a glob pattern that cannot be compiled.
    ///
    /// Raised by the path collector. The orchestrator records it as a failed
    /// target and moves on to the next one.
    #[error("Invalid path pattern '{pattern}'")]
    #[diagnostic(
        code(mac_cleanup::collect::invalid_pattern),
        help("Target patterns use shell-style globs: '*', '?', '[...]'.")
    )]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// The underlying glob error
        #[source]
        source: glob::PatternError,
    },

    /// Elevated privileges could not be obtained.
    ///
    /// Several targets live in protected system locations, so the run is
    /// aborted before any target executes.
    #[error("Could not obtain administrator privileges: {0}")]
    #[diagnostic(
        code(mac_cleanup::privilege::refused),
        help("Run mac-cleanup from an account allowed to use sudo, and enter your password when prompted.")
    )]
    PrivilegeRefused(
        /// Description of why elevation failed
        String,
    ),

    /// Failed to query the free space of the measured volume.
    #[error("Failed to read free space of '{path}'")]
    #[diagnostic(code(mac_cleanup::disk::stat_error))]
    DiskStat {
        /// The volume that was probed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The current user's home directory cannot be determined.
    ///
    /// Most target locations are relative to the home directory.
    #[error("Could not determine the home directory")]
    #[diagnostic(
        code(mac_cleanup::config::home_not_found),
        help("Make sure the HOME environment variable is set.")
    )]
    HomeNotFound,

    /// Failed to install the interrupt handler.
    #[error("Failed to install interrupt handler: {0}")]
    #[diagnostic(code(mac_cleanup::interrupt::handler))]
    Interrupt(
        /// Description of the handler error
        String,
    ),

    /// Invalid or incomplete configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(mac_cleanup::config::error),
        help("Check the command-line flags and environment variables.")
    )]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },
}

/// Type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CleanupError>;
