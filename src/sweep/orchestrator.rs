use std::path::PathBuf;

use super::collect::collect;
use super::delete::{DeletionReport, execute};
use super::disk::available_space;
use super::target::{Action, CleanupTarget, ToolCommand};
use super::toolbox::{ToolStatus, Toolbox};
use crate::error::Result;
use crate::logging::Logger;

/// Whether a run deletes or only estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Live,
    DryRun,
}

/// Immutable settings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMode {
    pub execution: ExecutionMode,
    /// Refresh package-manager metadata before cleaning.
    pub update: bool,
}

impl RunMode {
    pub fn live() -> Self {
        Self {
            execution: ExecutionMode::Live,
            update: false,
        }
    }

    pub fn dry_run() -> Self {
        Self {
            execution: ExecutionMode::DryRun,
            update: false,
        }
    }

    pub fn with_update(mut self, update: bool) -> Self {
        self.update = update;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.execution == ExecutionMode::DryRun
    }
}

/// Final state of a target after the orchestrator has visited it.
///
/// Targets start out pending and move to running once their activation
/// holds; only the terminal states are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetState {
    Skipped,
    Completed,
    PartiallyFailed,
}

/// An external cleaner that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub command: String,
    pub status: ToolStatus,
}

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOutcome {
    pub id: String,
    pub state: TargetState,
    /// Present when paths were collected and executed
    pub report: Option<DeletionReport>,
    /// This target's contribution to the dry-run estimate
    pub estimated_bytes: u64,
    pub tool_failures: Vec<ToolFailure>,
    /// Collection error (for example an invalid pattern)
    pub error: Option<String>,
}

impl TargetOutcome {
    fn new(id: &str, state: TargetState) -> Self {
        Self {
            id: id.to_string(),
            state,
            report: None,
            estimated_bytes: 0,
            tool_failures: Vec::new(),
            error: None,
        }
    }

    fn settle(mut self) -> Self {
        let failed = self.error.is_some()
            || !self.tool_failures.is_empty()
            || self.report.as_ref().is_some_and(|r| !r.is_clean());
        self.state = if failed {
            TargetState::PartiallyFailed
        } else {
            TargetState::Completed
        };
        self
    }
}

/// Running byte total, folded by the orchestrator over target outcomes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SizeAccumulator {
    bytes: u64,
}

impl SizeAccumulator {
    pub fn add(self, bytes: u64) -> Self {
        Self {
            bytes: self.bytes.saturating_add(bytes),
        }
    }

    pub fn bytes(self) -> u64 {
        self.bytes
    }
}

/// Free space of the measured volume around a live run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreedSpace {
    pub before: u64,
    /// `None` when the volume could not be measured after the run
    pub after: Option<u64>,
}

impl FreedSpace {
    /// Space freed. May be negative when other processes wrote to the volume
    /// during the run.
    pub fn delta(&self) -> Option<i64> {
        self.after.map(|after| {
            let delta = after as i128 - self.before as i128;
            delta.clamp(i64::MIN as i128, i64::MAX as i128) as i64
        })
    }
}

/// Result of one pass over the target list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub outcomes: Vec<TargetOutcome>,
    /// Sum of per-target estimates. Targets with overlapping paths are
    /// counted once each.
    pub estimated: SizeAccumulator,
    /// Only measured in live runs
    pub freed: Option<FreedSpace>,
}

impl RunSummary {
    pub fn outcome(&self, id: &str) -> Option<&TargetOutcome> {
        self.outcomes.iter().find(|o| o.id == id)
    }

    pub fn ran(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.state != TargetState::Skipped)
            .count()
    }

    pub fn removed(&self) -> usize {
        self.reports().map(|r| r.removed).sum()
    }

    pub fn failed_paths(&self) -> usize {
        self.reports().map(|r| r.failures.len()).sum()
    }

    fn reports(&self) -> impl Iterator<Item = &DeletionReport> {
        self.outcomes.iter().filter_map(|o| o.report.as_ref())
    }
}

/// Runs an ordered list of cleanup targets, one after another.
pub struct Sweep<'a> {
    targets: &'a [CleanupTarget],
    toolbox: &'a dyn Toolbox,
    mode: RunMode,
    volume: PathBuf,
    log: Logger,
}

pub struct SweepBuilder<'a> {
    targets: &'a [CleanupTarget],
    toolbox: Option<&'a dyn Toolbox>,
    mode: RunMode,
    volume: PathBuf,
    verbose: u8,
    log: Option<Logger>,
}

impl<'a> SweepBuilder<'a> {
    pub fn new() -> Self {
        Self {
            targets: &[],
            toolbox: None,
            mode: RunMode::dry_run(),
            volume: PathBuf::from("/"),
            verbose: 0,
            log: None,
        }
    }

    pub fn targets(mut self, targets: &'a [CleanupTarget]) -> Self {
        self.targets = targets;
        self
    }

    pub fn toolbox(mut self, toolbox: &'a dyn Toolbox) -> Self {
        self.toolbox = Some(toolbox);
        self
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    /// Volume whose free space is measured in live runs (default `/`).
    pub fn volume(mut self, volume: impl Into<PathBuf>) -> Self {
        self.volume = volume.into();
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    #[cfg(test)]
    pub(crate) fn logger(mut self, log: Logger) -> Self {
        self.log = Some(log);
        self
    }

    pub fn build(self) -> Sweep<'a> {
        let log = self
            .log
            .unwrap_or_else(|| Logger::for_run(self.mode.is_dry_run(), self.verbose));
        Sweep {
            targets: self.targets,
            toolbox: self.toolbox.unwrap_or(&NO_TOOLS),
            mode: self.mode,
            volume: self.volume,
            log,
        }
    }
}

impl Default for SweepBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Toolbox used when none is configured: nothing is installed.
struct NoTools;

static NO_TOOLS: NoTools = NoTools;

impl Toolbox for NoTools {
    fn is_installed(&self, _program: &str) -> bool {
        false
    }

    fn invoke(&self, _command: &ToolCommand) -> ToolStatus {
        ToolStatus::Missing
    }
}

impl<'a> Sweep<'a> {
    pub fn builder() -> SweepBuilder<'a> {
        SweepBuilder::new()
    }

    /// Visit every target in order.
    ///
    /// Live runs record the volume's free space before the first and after
    /// the last target. Dry runs fold per-target estimates instead and never
    /// touch the filesystem.
    ///
    /// # Errors
    ///
    /// Only the initial free-space probe can fail the run. Target failures
    /// are recorded in the returned summary.
    pub fn run(&self) -> Result<RunSummary> {
        let before = match self.mode.execution {
            ExecutionMode::Live => Some(available_space(&self.volume)?),
            ExecutionMode::DryRun => None,
        };

        let mut estimated = SizeAccumulator::default();
        let mut outcomes = Vec::with_capacity(self.targets.len());
        for target in self.targets {
            let outcome = self.run_target(target);
            estimated = estimated.add(outcome.estimated_bytes);
            outcomes.push(outcome);
        }

        let freed = before.map(|before| {
            let after = match available_space(&self.volume) {
                Ok(after) => Some(after),
                Err(err) => {
                    self.log.warn(format!("Could not measure free space: {err}"));
                    None
                }
            };
            FreedSpace { before, after }
        });

        Ok(RunSummary {
            mode: self.mode,
            outcomes,
            estimated,
            freed,
        })
    }

    /// Run a single target. Never fails; problems land in the outcome.
    pub fn run_target(&self, target: &CleanupTarget) -> TargetOutcome {
        if !target.activation().is_active(self.toolbox, self.mode) {
            return TargetOutcome::new(target.id(), TargetState::Skipped);
        }

        self.log.progress(target.message());
        let mut outcome = TargetOutcome::new(target.id(), TargetState::Completed);

        match target.action() {
            Action::Delete { patterns, elevated } => {
                self.collect_and_execute(&mut outcome, patterns, *elevated);
            }
            Action::Invoke { commands, cache } => match self.mode.execution {
                ExecutionMode::Live => self.invoke_all(&mut outcome, commands),
                ExecutionMode::DryRun => {
                    for command in commands {
                        self.log.verbose(1, format!("  Would run: {command}"));
                    }
                    self.collect_and_execute(&mut outcome, cache, false);
                }
            },
            Action::InvokeThenCollect {
                commands,
                patterns,
                elevated,
            } => {
                match self.mode.execution {
                    ExecutionMode::Live => self.invoke_all(&mut outcome, commands),
                    ExecutionMode::DryRun => {
                        for command in commands {
                            self.log.verbose(1, format!("  Would run: {command}"));
                        }
                    }
                }
                self.collect_and_execute(&mut outcome, patterns, *elevated);
            }
        }

        outcome.settle()
    }

    fn collect_and_execute(&self, outcome: &mut TargetOutcome, patterns: &[String], elevated: bool) {
        if patterns.is_empty() {
            return;
        }

        let paths = match collect(patterns) {
            Ok(paths) => paths,
            Err(err) => {
                self.log.warn(format!("Skipping {}: {err}", outcome.id));
                outcome.error = Some(err.to_string());
                return;
            }
        };

        let report = execute(&paths, self.mode.execution, elevated, &self.log);
        if let Some(bytes) = report.estimated_bytes {
            outcome.estimated_bytes = bytes;
        }
        outcome.report = Some(report);
    }

    fn invoke_all(&self, outcome: &mut TargetOutcome, commands: &[ToolCommand]) {
        for command in commands {
            self.log.verbose(1, format!("  Running: {command}"));
            let status = self.toolbox.invoke(command);
            if !status.is_success() {
                self.log
                    .verbose(1, format!("  {command} did not succeed ({status:?})"));
                outcome.tool_failures.push(ToolFailure {
                    command: command.to_string(),
                    status,
                });
            }
        }
    }
}
