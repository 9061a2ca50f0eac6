use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::error::{CleanupError, Result};

/// Shell-like matching: `*` never crosses a separator and never matches a
/// leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Ordered, duplicate-free list of paths scheduled for one target.
///
/// Every member existed (as a file, directory or symlink) when it was
/// inserted. Membership says nothing about the path still existing later.
#[derive(Debug, Default, Clone)]
pub struct PathSet {
    paths: Vec<PathBuf>,
    seen: HashSet<OsString>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `path` if it exists and was not inserted before.
    ///
    /// The existence test does not follow symlinks, so a dangling link is
    /// still a candidate. Returns whether the path was added.
    pub fn insert(&mut self, path: PathBuf) -> bool {
        if fs::symlink_metadata(&path).is_err() {
            return false;
        }
        if !self.seen.insert(path.as_os_str().to_os_string()) {
            return false;
        }
        self.paths.push(path);
        true
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Expand `patterns` against the live filesystem.
///
/// Results keep first-occurrence order across all patterns. Matches that do
/// not exist any more, or that sit in unreadable directories, are dropped
/// without error. Collection never touches the filesystem beyond reading it.
///
/// # Errors
///
/// Returns [`CleanupError::InvalidPattern`] if a pattern cannot be compiled.
pub fn collect<I, S>(patterns: I) -> Result<PathSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = PathSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();

        if !has_wildcard(pattern) {
            set.insert(PathBuf::from(pattern));
            continue;
        }

        let matches =
            glob::glob_with(pattern, MATCH_OPTIONS).map_err(|source| {
                CleanupError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                }
            })?;

        for path in matches.flatten() {
            set.insert(path);
        }
    }

    Ok(set)
}

/// Build a pattern from a literal base directory and a glob suffix.
///
/// The base is escaped, so metacharacters in a home directory name cannot
/// widen the match.
pub fn join_pattern(base: &Path, rest: &str) -> String {
    let base = glob::Pattern::escape(&base.to_string_lossy());
    let rest = rest.trim_start_matches('/');
    if rest.is_empty() {
        base
    } else if base.ends_with('/') {
        format!("{base}{rest}")
    } else {
        format!("{base}/{rest}")
    }
}

fn has_wildcard(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_collect_skips_missing_literal_paths() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.log");
        fs::write(&present, "x").unwrap();

        let set = collect([
            present.to_string_lossy().into_owned(),
            temp.path().join("absent.log").to_string_lossy().into_owned(),
        ])
        .unwrap();

        assert_eq!(set.as_slice(), &[present]);
    }

    #[test]
    fn test_collect_deduplicates_overlapping_patterns() {
        let temp = TempDir::new().unwrap();
        for name in ["file1", "file2"] {
            fs::write(temp.path().join(name), "x").unwrap();
        }

        let set = collect([
            join_pattern(temp.path(), "*"),
            join_pattern(temp.path(), "file1"),
        ])
        .unwrap();

        assert_eq!(
            set.as_slice(),
            &[temp.path().join("file1"), temp.path().join("file2")]
        );
    }

    #[test]
    fn test_star_does_not_match_hidden_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".hidden"), "x").unwrap();
        fs::write(temp.path().join("visible"), "x").unwrap();

        let set = collect([join_pattern(temp.path(), "*")]).unwrap();

        assert_eq!(set.as_slice(), &[temp.path().join("visible")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_is_collected() {
        let temp = TempDir::new().unwrap();
        let link = temp.path().join("dangling");
        std::os::unix::fs::symlink(temp.path().join("nowhere"), &link).unwrap();

        let set = collect([link.to_string_lossy().into_owned()]).unwrap();

        assert_eq!(set.as_slice(), &[link]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let err = collect(["/tmp/[unclosed*"]).unwrap_err();
        assert!(matches!(err, CleanupError::InvalidPattern { .. }));
    }

    #[test]
    fn test_join_pattern_escapes_base() {
        let pattern = join_pattern(Path::new("/Users/odd[name]"), "Library/Caches/*");
        assert_eq!(pattern, "/Users/odd[[]name[]]/Library/Caches/*");
        assert_eq!(join_pattern(Path::new("/"), "Library/*"), "/Library/*");
        assert_eq!(join_pattern(Path::new("/tmp"), ""), "/tmp");
    }

    #[test]
    fn test_insert_rejects_duplicates_and_missing_paths() {
        let temp = TempDir::new().unwrap();
        let mut set = PathSet::new();
        assert!(set.is_empty());

        assert!(set.insert(temp.path().to_path_buf()));
        assert!(!set.insert(temp.path().to_path_buf()));
        assert!(!set.insert(temp.path().join("missing")));
        assert_eq!(set.len(), 1);
        assert!(!set.is_empty());
    }
}
