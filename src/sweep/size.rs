use std::path::Path;
use std::process::{Command, Stdio};

use walkdir::WalkDir;

use super::collect::PathSet;
use crate::privilege::is_root;

const UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Total size in bytes of every regular file at or beneath the given paths.
///
/// Paths that vanished since collection and subtrees that cannot be read
/// contribute nothing; the estimate degrades instead of failing.
pub fn estimate_bytes(paths: &PathSet) -> u64 {
    Measurement::Direct.estimate(paths)
}

/// Size in bytes of one file or directory tree. Symlinks, including `path`
/// itself, are not followed and count as zero.
pub fn path_bytes(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .fold(0u64, |total, metadata| total.saturating_add(metadata.len()))
}

/// How a target's paths are measured.
///
/// Targets removed with elevated privileges often hold root-only subtrees
/// that an unprivileged walk cannot read, so they are measured through
/// `sudo -n du` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measurement {
    Direct,
    Elevated,
}

impl Measurement {
    /// Measurement matching how a target's paths would be removed.
    pub fn for_removal(elevated: bool) -> Self {
        Self::select(elevated, is_root())
    }

    fn select(elevated: bool, root: bool) -> Self {
        if elevated && !root {
            Measurement::Elevated
        } else {
            Measurement::Direct
        }
    }

    /// Size of one path. An elevated measurement that fails falls back to a
    /// direct walk.
    pub fn path_bytes(self, path: &Path) -> u64 {
        match self {
            Measurement::Direct => path_bytes(path),
            Measurement::Elevated => {
                elevated_path_bytes(path).unwrap_or_else(|| path_bytes(path))
            }
        }
    }

    pub fn estimate(self, paths: &PathSet) -> u64 {
        paths
            .iter()
            .fold(0u64, |total, path| total.saturating_add(self.path_bytes(path)))
    }
}

fn elevated_path_bytes(path: &Path) -> Option<u64> {
    let output = du_command(path).output().ok()?;
    if !output.status.success() {
        return None;
    }
    parse_du_kib(&String::from_utf8_lossy(&output.stdout))
}

/// `sudo -n du` reporting the apparent size of `path` in KiB.
fn du_command(path: &Path) -> Command {
    let mut command = Command::new("sudo");
    command.args(["-n", "du", "-s", "-k"]);
    if cfg!(target_os = "macos") {
        command.arg("-A");
    } else {
        command.arg("--apparent-size");
    }
    command
        .arg("--")
        .arg(path)
        .stdin(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Parse the leading KiB count of `du -s -k` output.
fn parse_du_kib(output: &str) -> Option<u64> {
    output
        .split_whitespace()
        .next()?
        .parse::<u64>()
        .ok()
        .map(|kib| kib.saturating_mul(1024))
}

/// Format a byte count with binary prefixes and two truncated decimals.
///
/// `1023` is `"1023 B"`, `1024` is `"1.00 KiB"`, `1536` is `"1.50 KiB"`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} {}", UNITS[0]);
    }

    let mut whole = bytes;
    let mut remainder = 0;
    let mut unit_idx = 0;

    while whole >= 1024 && unit_idx < UNITS.len() - 1 {
        remainder = whole % 1024;
        whole /= 1024;
        unit_idx += 1;
    }

    let hundredths = remainder * 100 / 1024;
    format!("{whole}.{hundredths:02} {}", UNITS[unit_idx])
}

/// Format a signed free-space delta.
pub fn format_delta(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_size(bytes.unsigned_abs()))
    } else {
        format_size(bytes.unsigned_abs())
    }
}
