use std::ffi::OsString;
use std::path::Path;
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::{env, fs};

use tempfile::TempDir;

/// Global mutex to ensure only one test manipulates the environment at a time.
static HOME_MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

const REDIRECTED: [&str; 3] = ["HOME", "PYENV_VIRTUALENV_CACHE_PATH", "GOPATH"];

/// RAII guard that points HOME at a temporary directory and clears the
/// variables that add catalog targets.
///
/// While the guard is alive, every home-relative target resolves inside the
/// sandbox, so tests cannot touch the developer's real caches.
pub struct TempHomeGuard {
    _lock: MutexGuard<'static, ()>,
    temp_home: TempDir,
    previous: Vec<(&'static str, Option<OsString>)>,
}

impl TempHomeGuard {
    pub fn new() -> Self {
        let lock = HOME_MUTEX
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let temp_home = TempDir::new().expect("failed to create temporary HOME");
        let previous = REDIRECTED
            .iter()
            .map(|name| (*name, env::var_os(name)))
            .collect();

        // SAFETY: we hold HOME_MUTEX, ensuring no other thread mutates the
        // environment while we redirect it for the test.
        unsafe {
            env::set_var("HOME", temp_home.path());
            env::remove_var("PYENV_VIRTUALENV_CACHE_PATH");
            env::remove_var("GOPATH");
        }

        Self {
            _lock: lock,
            temp_home,
            previous,
        }
    }

    /// Path to the temporary HOME directory.
    pub fn home(&self) -> &Path {
        self.temp_home.path()
    }

    /// Set a variable for the lifetime of the guard.
    pub fn set_var(&self, name: &str, value: impl AsRef<std::ffi::OsStr>) {
        assert!(
            REDIRECTED.contains(&name),
            "{name} is not restored by the guard"
        );
        // SAFETY: guarded by HOME_MUTEX.
        unsafe { env::set_var(name, value) };
    }

    /// Create `relative` under HOME with `len` bytes of content.
    pub fn write_file(&self, relative: &str, len: usize) {
        let path = self.home().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(&path, vec![0u8; len]).expect("failed to write test file");
    }
}

impl Drop for TempHomeGuard {
    fn drop(&mut self) {
        // SAFETY: guarded by HOME_MUTEX; we restore the environment to its
        // previous state before releasing the lock.
        unsafe {
            for (name, value) in &self.previous {
                match value {
                    Some(value) => env::set_var(name, value),
                    None => env::remove_var(name),
                }
            }
        }
        // temp_home drops here, cleaning up the directory
    }
}
