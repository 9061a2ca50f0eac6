use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::collect::PathSet;
use super::orchestrator::ExecutionMode;
use super::size::{Measurement, format_size};
use crate::logging::Logger;
use crate::privilege::is_root;

/// A path that could not be removed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of executing one target's path set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    /// Paths removed (always 0 in a dry run)
    pub removed: usize,
    /// Paths that could not be removed
    pub failures: Vec<DeletionFailure>,
    /// Estimated size, only set in a dry run. Live runs measure free space
    /// globally instead of summing per path.
    pub estimated_bytes: Option<u64>,
}

impl DeletionReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Estimate or remove every path in `paths`.
///
/// A dry run only reads the filesystem. A live run removes each path
/// independently; failures are recorded and the remaining paths are still
/// attempted. With `elevated`, removal and size measurement go through `sudo`
/// unless the process is already root.
pub fn execute(
    paths: &PathSet,
    mode: ExecutionMode,
    elevated: bool,
    log: &Logger,
) -> DeletionReport {
    match mode {
        ExecutionMode::DryRun => {
            let measurement = Measurement::for_removal(elevated);
            if log.level() >= 2 {
                for path in paths {
                    log.verbose(
                        2,
                        format!(
                            "  Would remove {} ({})",
                            path.display(),
                            format_size(measurement.path_bytes(path))
                        ),
                    );
                }
            }
            DeletionReport {
                estimated_bytes: Some(measurement.estimate(paths)),
                ..DeletionReport::default()
            }
        }
        ExecutionMode::Live => {
            let mut report = DeletionReport::default();
            for path in paths {
                log.verbose(1, format!("  Removing {}", path.display()));
                match remove_path(path, elevated) {
                    Ok(()) => report.removed += 1,
                    Err(err) => {
                        log.verbose(1, format!("  Failed to remove {}: {err}", path.display()));
                        report.failures.push(DeletionFailure {
                            path: path.clone(),
                            reason: err.to_string(),
                        });
                    }
                }
            }
            report
        }
    }
}

/// Recursively remove a file, symlink or directory tree.
pub(crate) fn remove_path(path: &Path, elevated: bool) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;

    if elevated && !is_root() {
        return remove_with_sudo(path);
    }

    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

fn remove_with_sudo(path: &Path) -> io::Result<()> {
    let status = Command::new("sudo")
        .args(["-n", "rm", "-rf", "--"])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    if status.success() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("sudo rm exited with {status}"),
        ))
    }
}
