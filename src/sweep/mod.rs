//! Path collection, size estimation and safe deletion.
//!
//! A run visits an ordered list of [`CleanupTarget`]s. For every active
//! target the orchestrator:
//!
//! 1. expands the target's glob patterns into a [`PathSet`] of existing,
//!    de-duplicated paths ([`collect`])
//! 2. estimates the set ([`estimate_bytes`]) in a dry run, or removes every
//!    member independently in a live run ([`execute`])
//! 3. records a [`TargetOutcome`] and folds its estimate into the run total
//!
//! External cleaners (`brew cleanup`, `docker image prune`, ...) are reached
//! through the [`Toolbox`] trait. Live runs report the change in free space
//! of the measured volume rather than a sum of per-path sizes, since
//! copy-on-write and delayed reclamation make per-path sums unreliable.
//!
//! Estimates of different targets are added without de-duplication: two
//! targets reaching the same path both count it.
//!
//! # Example
//!
//! ```no_run
//! use mac_cleanup::sweep::{Action, CleanupTarget, RunMode, Sweep, format_size};
//!
//! let targets = vec![CleanupTarget::new(
//!     "scratch",
//!     "Clearing scratch files...",
//!     Action::delete(["/tmp/scratch/*"]),
//! )];
//!
//! let summary = Sweep::builder()
//!     .targets(&targets)
//!     .mode(RunMode::dry_run())
//!     .build()
//!     .run()?;
//! println!("{} reclaimable", format_size(summary.estimated.bytes()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod collect;
mod delete;
pub mod disk;
mod orchestrator;
mod size;
mod target;
mod toolbox;

pub use collect::{PathSet, collect, join_pattern};
pub use delete::{DeletionFailure, DeletionReport, execute};
pub use orchestrator::{
    ExecutionMode, FreedSpace, RunMode, RunSummary, SizeAccumulator, Sweep, SweepBuilder,
    TargetOutcome, TargetState, ToolFailure,
};
pub use size::{Measurement, estimate_bytes, format_delta, format_size, path_bytes};
pub use target::{Action, Activation, CleanupTarget, ToolCommand};
pub use toolbox::{SystemToolbox, ToolStatus, Toolbox};
