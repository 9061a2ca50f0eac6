//! # mac-cleanup
//!
//! Reclaims disk space on macOS by clearing caches, logs, trash and the
//! leftovers of developer tools.
//!
//! ## Overview
//!
//! A run walks a fixed catalog of cleanup targets. Each target is plain data:
//! an activation predicate (a directory exists, a program is installed, the
//! operator asked for updates) and an action (delete glob matches, invoke an
//! external cleaner, or both). Dry runs only estimate; live runs delete and
//! report the change in free space of the volume.
//!
//! ## Key Features
//!
//! - **Dry runs are pure**: nothing is removed and no external cleaner runs
//! - **Failure isolation**: a path that cannot be removed, or a tool that
//!   exits non-zero, never stops the rest of the run
//! - **Privileges**: `sudo` credentials are refreshed in the background and
//!   the refresher stops on every exit path, including Ctrl-C
//!
//! ## Architecture
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`commands`]: The operator-facing session
//! - [`catalog`]: The list of cleanup targets
//! - [`sweep`]: Path collection, size estimation, deletion and orchestration
//! - [`privilege`]: `sudo` keep-alive
//! - [`error`]: Error types and handling with thiserror + miette
//!
//! ## Library Usage
//!
//! ```no_run
//! use mac_cleanup::catalog::{Environment, default_targets};
//! use mac_cleanup::sweep::{RunMode, Sweep, SystemToolbox, format_size};
//!
//! let env = Environment::from_process()?;
//! let targets = default_targets(&env);
//! let toolbox = SystemToolbox::new(0);
//!
//! let summary = Sweep::builder()
//!     .targets(&targets)
//!     .toolbox(&toolbox)
//!     .mode(RunMode::dry_run())
//!     .build()
//!     .run()?;
//! println!("{}", format_size(summary.estimated.bytes()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod error;
pub mod privilege;
pub mod sweep;

// Internal modules
mod logging;
