//! The fixed list of cleanup targets.
//!
//! Every entry is data: an identifier, a progress message, an activation
//! predicate and an action. [`default_targets`] returns them in the order
//! they run. Locations are macOS defaults; third-party tools are cleaned
//! through their own cache commands where they have one.

use std::env;
use std::path::{Path, PathBuf};

use crate::error::{CleanupError, Result};
use crate::sweep::{Action, Activation, CleanupTarget, ToolCommand, join_pattern};

/// Environment variable naming the pyenv-virtualenv cache directory.
pub const PYENV_VIRTUALENV_CACHE_PATH: &str = "PYENV_VIRTUALENV_CACHE_PATH";
/// Environment variable naming the Go workspace root.
pub const GOPATH: &str = "GOPATH";

/// Locations the catalog is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    home: PathBuf,
    pyenv_virtualenv_cache: Option<PathBuf>,
    gopath: Option<PathBuf>,
}

impl Environment {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            pyenv_virtualenv_cache: None,
            gopath: None,
        }
    }

    /// Read the home directory and the optional cache variables.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError::HomeNotFound`] if no home directory is known.
    pub fn from_process() -> Result<Self> {
        let home = home::home_dir()
            .filter(|home| !home.as_os_str().is_empty())
            .ok_or(CleanupError::HomeNotFound)?;

        let pyenv_virtualenv_cache = env::var_os(PYENV_VIRTUALENV_CACHE_PATH)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        // GOPATH may list several workspaces; the module cache lives in the first.
        let gopath = env::var_os(GOPATH)
            .and_then(|value| env::split_paths(&value).next())
            .filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            home,
            pyenv_virtualenv_cache,
            gopath,
        })
    }

    pub fn with_pyenv_virtualenv_cache(mut self, path: impl Into<PathBuf>) -> Self {
        self.pyenv_virtualenv_cache = Some(path.into());
        self
    }

    pub fn with_gopath(mut self, path: impl Into<PathBuf>) -> Self {
        self.gopath = Some(path.into());
        self
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn pyenv_virtualenv_cache(&self) -> Option<&Path> {
        self.pyenv_virtualenv_cache.as_deref()
    }

    /// `GOPATH`, or `~/go` when unset.
    pub fn gopath(&self) -> PathBuf {
        self.gopath
            .clone()
            .unwrap_or_else(|| self.home.join("go"))
    }

    fn home_path(&self, rest: &str) -> PathBuf {
        self.home.join(rest)
    }

    fn in_home(&self, rest: &str) -> String {
        join_pattern(&self.home, rest)
    }

    fn in_home_all(&self, rests: &[&str]) -> Vec<String> {
        rests.iter().map(|rest| self.in_home(rest)).collect()
    }
}

fn tool(program: &str, args: &[&str]) -> ToolCommand {
    ToolCommand::new(program, args)
}

fn target(id: &str, message: &str, action: Action) -> CleanupTarget {
    CleanupTarget::new(id, message, action)
}

/// All targets, in run order.
pub fn default_targets(env: &Environment) -> Vec<CleanupTarget> {
    let app_support = |rest: &str| env.home_path(&format!("Library/Application Support/{rest}"));

    let mut targets = vec![
        target(
            "trash",
            "Emptying the Trash on all mounted volumes and the main HDD...",
            Action::delete(
                ["/Volumes/*/.Trashes/*".to_string(), env.in_home(".Trash/*")],
            )
            .elevated(),
        ),
        target(
            "system-caches",
            "Clearing System Cache Files...",
            Action::delete([
                "/Library/Caches/*".to_string(),
                "/System/Library/Caches/*".to_string(),
                env.in_home("Library/Caches/*"),
                "/private/var/folders/bh/*/*/*/*".to_string(),
            ])
            .elevated(),
        ),
        target(
            "system-logs",
            "Clearing System Log Files...",
            Action::delete([
                "/private/var/log/asl/*.asl".to_string(),
                "/Library/Logs/DiagnosticReports/*".to_string(),
                "/Library/Logs/CreativeCloud/*".to_string(),
                "/Library/Logs/Adobe/*".to_string(),
                "/Library/Logs/adobegc.log".to_string(),
                env.in_home("Library/Containers/com.apple.mail/Data/Library/Logs/Mail/*"),
                env.in_home("Library/Logs/CoreSimulator/*"),
            ])
            .elevated(),
        ),
        target(
            "adobe-cache",
            "Clearing Adobe Cache Files...",
            Action::delete(env.in_home_all(&[
                "Library/Application Support/Adobe/Common/Media Cache Files/*",
            ])),
        )
        .when(Activation::exists(app_support("Adobe"))),
        target(
            "ios-apps",
            "Cleaning up iOS Applications...",
            Action::delete(env.in_home_all(&["Music/iTunes/iTunes Media/Mobile Applications/*"])),
        ),
        target(
            "ios-backups",
            "Removing iOS Device Backups...",
            Action::delete(env.in_home_all(&["Library/Application Support/MobileSync/Backup/*"])),
        ),
        target(
            "xcode",
            "Cleaning up Xcode Derived Data and Archive Files...",
            Action::delete(env.in_home_all(&[
                "Library/Developer/Xcode/DerivedData/*",
                "Library/Developer/Xcode/Archives/*",
                "Library/Developer/Xcode/iOS Device Logs/*",
            ])),
        ),
        target(
            "ios-simulators",
            "Resetting iOS simulators...",
            Action::invoke(vec![
                tool("xcrun", &["simctl", "shutdown", "all"]),
                tool("xcrun", &["simctl", "erase", "all"]),
            ])
            .estimating(env.in_home_all(&["Library/Developer/CoreSimulator/Devices/*/data"])),
        )
        .when(Activation::installed("xcrun")),
        target(
            "dropbox",
            "Clearing Dropbox Cache Files...",
            Action::delete(env.in_home_all(&["Dropbox/.dropbox.cache/*"])),
        )
        .when(Activation::exists(env.home_path("Dropbox"))),
        target(
            "google-drive",
            "Clearing Google Drive File Stream Cache Files...",
            Action::invoke_then_collect(
                vec![tool("killall", &["Google Drive File Stream"])],
                env.in_home_all(&[
                    "Library/Application Support/Google/DriveFS/[0-9a-zA-Z]*/content_cache",
                ]),
            ),
        )
        .when(Activation::exists(app_support("Google/DriveFS"))),
        target(
            "composer",
            "Cleaning up composer...",
            Action::invoke(vec![tool("composer", &["clearcache", "--no-interaction"])])
                .estimating(env.in_home_all(&["Library/Caches/composer"])),
        )
        .when(Activation::installed("composer")),
        target(
            "steam",
            "Clearing Steam Cache, Logs, and Temp Files...",
            Action::delete(env.in_home_all(&[
                "Library/Application Support/Steam/appcache",
                "Library/Application Support/Steam/depotcache",
                "Library/Application Support/Steam/logs",
                "Library/Application Support/Steam/steamapps/shadercache",
                "Library/Application Support/Steam/steamapps/temp",
                "Library/Application Support/Steam/steamapps/download",
            ])),
        )
        .when(Activation::exists(app_support("Steam"))),
        target(
            "minecraft",
            "Clearing Minecraft Cache and Log Files...",
            Action::delete(env.in_home_all(&[
                "Library/Application Support/minecraft/logs",
                "Library/Application Support/minecraft/crash-reports",
                "Library/Application Support/minecraft/webcache",
                "Library/Application Support/minecraft/webcache2",
                "Library/Application Support/minecraft/*.log",
                "Library/Application Support/minecraft/launcher_cef_log.txt",
                "Library/Application Support/minecraft/command_history.txt",
            ])),
        )
        .when(Activation::exists(app_support("minecraft"))),
        target(
            "lunar-client",
            "Deleting Lunar Client logs and caches...",
            Action::delete(env.in_home_all(&[
                ".lunarclient/game-cache",
                ".lunarclient/launcher-cache",
                ".lunarclient/logs",
                ".lunarclient/offline/*/logs",
                ".lunarclient/offline/files/*/logs",
            ])),
        )
        .when(Activation::exists(env.home_path(".lunarclient"))),
        target(
            "teams",
            "Deleting Microsoft Teams logs and caches...",
            Action::delete(env.in_home_all(&[
                "Library/Application Support/Microsoft/Teams/IndexedDB",
                "Library/Application Support/Microsoft/Teams/Cache",
                "Library/Application Support/Microsoft/Teams/Application Cache",
                "Library/Application Support/Microsoft/Teams/Code Cache",
                "Library/Application Support/Microsoft/Teams/blob_storage",
                "Library/Application Support/Microsoft/Teams/databases",
                "Library/Application Support/Microsoft/Teams/gpucache",
                "Library/Application Support/Microsoft/Teams/Local Storage",
                "Library/Application Support/Microsoft/Teams/tmp",
                "Library/Application Support/Microsoft/Teams/*logs*.txt",
                "Library/Application Support/Microsoft/Teams/watchdog",
                "Library/Application Support/Microsoft/Teams/*watchdog*.json",
            ])),
        )
        .when(Activation::exists(app_support("Microsoft/Teams"))),
        target(
            "poetry",
            "Deleting Poetry cache...",
            Action::delete(env.in_home_all(&["Library/Caches/pypoetry"])),
        )
        .when(Activation::exists(env.home_path("Library/Caches/pypoetry"))),
        target(
            "wget",
            "Deleting Wget log and hosts file...",
            Action::delete(env.in_home_all(&["wget-log", ".wget-hsts"])),
        ),
        target(
            "cacher",
            "Deleting Cacher logs...",
            Action::delete(env.in_home_all(&[".cacher/logs"])),
        )
        .when(Activation::exists(env.home_path(".cacher"))),
        target(
            "android",
            "Deleting Android cache...",
            Action::delete(env.in_home_all(&[".android/cache"])),
        )
        .when(Activation::exists(env.home_path(".android"))),
        target(
            "gradle",
            "Clearing Gradle caches...",
            Action::delete(env.in_home_all(&[".gradle/caches"])),
        )
        .when(Activation::exists(env.home_path(".gradle"))),
        target(
            "kite",
            "Deleting Kite logs...",
            Action::delete(env.in_home_all(&[".kite/logs"])),
        )
        .when(Activation::exists(env.home_path(".kite"))),
        target(
            "homebrew-update",
            "Updating Homebrew Recipes and upgrading formulae...",
            Action::invoke(vec![tool("brew", &["update"]), tool("brew", &["upgrade"])]),
        )
        .when(Activation::All(vec![
            Activation::UpdateRequested,
            Activation::installed("brew"),
        ])),
        target(
            "app-store-update",
            "Updating Mac App Store applications...",
            Action::invoke(vec![tool("mas", &["upgrade"])]),
        )
        .when(Activation::All(vec![
            Activation::UpdateRequested,
            Activation::installed("mas"),
        ])),
        target(
            "homebrew",
            "Cleaning up Homebrew Cache...",
            Action::invoke_then_collect(
                vec![tool("brew", &["cleanup", "-s"]), tool("brew", &["tap", "--repair"])],
                env.in_home_all(&["Library/Caches/Homebrew"]),
            ),
        )
        .when(Activation::installed("brew")),
        target(
            "gem",
            "Cleaning up any old versions of gems...",
            Action::invoke(vec![tool("gem", &["cleanup"])]),
        )
        .when(Activation::installed("gem")),
        target(
            "docker",
            "Cleaning up Docker...",
            Action::invoke(vec![
                tool("docker", &["container", "prune", "-f"]),
                tool("docker", &["image", "prune", "-f"]),
                tool("docker", &["volume", "prune", "-f"]),
                tool("docker", &["network", "prune", "-f"]),
            ]),
        )
        .when(Activation::installed("docker")),
    ];

    if let Some(cache) = env.pyenv_virtualenv_cache() {
        targets.push(
            target(
                "pyenv-virtualenv",
                "Removing Pyenv-VirtualEnv Cache...",
                Action::delete([join_pattern(cache, "")]),
            )
            .when(Activation::exists(cache)),
        );
    }

    targets.extend([
        target(
            "npm",
            "Cleaning up npm cache...",
            Action::invoke(vec![tool("npm", &["cache", "clean", "--force"])])
                .estimating(env.in_home_all(&[".npm/_cacache"])),
        )
        .when(Activation::installed("npm")),
        target(
            "yarn",
            "Cleaning up Yarn cache...",
            Action::invoke(vec![tool("yarn", &["cache", "clean", "--force"])])
                .estimating(env.in_home_all(&["Library/Caches/Yarn"])),
        )
        .when(Activation::installed("yarn")),
        target(
            "pnpm",
            "Cleaning up pnpm cache...",
            Action::invoke(vec![tool("pnpm", &["store", "prune"])])
                .estimating(env.in_home_all(&["Library/pnpm/store"])),
        )
        .when(Activation::installed("pnpm")),
        target(
            "cocoapods",
            "Cleaning up Pod cache...",
            Action::invoke(vec![tool("pod", &["cache", "clean", "--all"])])
                .estimating(env.in_home_all(&["Library/Caches/CocoaPods"])),
        )
        .when(Activation::installed("pod")),
        target(
            "go",
            "Clearing Go module cache...",
            Action::invoke(vec![tool("go", &["clean", "-modcache"])])
                .estimating([join_pattern(&env.gopath(), "pkg/mod")]),
        )
        .when(Activation::installed("go")),
        target(
            "pip",
            "Cleaning up pip cache...",
            Action::invoke(vec![tool("pip3", &["cache", "purge"])])
                .estimating(env.in_home_all(&["Library/Caches/pip"])),
        )
        .when(Activation::installed("pip3")),
        target(
            "conda",
            "Cleaning up Conda packages and caches...",
            Action::invoke(vec![tool("conda", &["clean", "--all", "-y"])])
                .estimating(env.in_home_all(&[".conda/pkgs"])),
        )
        .when(Activation::installed("conda")),
        target(
            "dns-cache",
            "Flushing the DNS cache...",
            Action::invoke(vec![
                tool("dscacheutil", &["-flushcache"]).elevated(),
                tool("killall", &["-HUP", "mDNSResponder"]).elevated(),
            ]),
        )
        .when(Activation::installed("dscacheutil")),
        target(
            "inactive-memory",
            "Purging inactive memory...",
            Action::invoke(vec![tool("purge", &[]).elevated()]),
        )
        .when(Activation::installed("purge")),
    ]);

    targets
}
