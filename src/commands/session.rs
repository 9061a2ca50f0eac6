//! One operator-facing cleanup session: an optional estimate, an optional
//! confirmation, and the final report line.

use std::path::PathBuf;

use crate::error::{CleanupError, Result};
use crate::logging::Logger;
use crate::sweep::{
    CleanupTarget, RunMode, RunSummary, Sweep, TargetState, Toolbox, format_delta, format_size,
};

/// Report line printed after a dry run.
pub fn estimate_message(bytes: u64) -> String {
    format!("Approx {} of space will be cleaned up", format_size(bytes))
}

/// Report line printed after a live run.
pub fn freed_message(delta: Option<i64>) -> String {
    match delta {
        Some(delta) => format!("Success! {} of space was cleaned up", format_delta(delta)),
        None => "Cleanup finished, but the freed space could not be measured".to_string(),
    }
}

/// Summaries of the passes a session made.
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub dry_run: Option<RunSummary>,
    pub live: Option<RunSummary>,
}

pub struct Session {
    mode: RunMode,
    verbose: u8,
    volume: PathBuf,
}

#[derive(Default)]
pub struct SessionBuilder {
    mode: Option<RunMode>,
    verbose: u8,
    volume: Option<PathBuf>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn verbose(mut self, verbose: u8) -> Self {
        self.verbose = verbose;
        self
    }

    /// Volume whose free space is measured (default `/`).
    pub fn volume(mut self, volume: impl Into<PathBuf>) -> Self {
        self.volume = Some(volume.into());
        self
    }

    pub fn build(self) -> Result<Session> {
        let volume = self.volume.unwrap_or_else(|| PathBuf::from("/"));
        if !volume.is_absolute() {
            return Err(CleanupError::ConfigError {
                message: format!("volume '{}' must be an absolute path", volume.display()),
            });
        }

        Ok(Session {
            mode: self.mode.unwrap_or_else(RunMode::live),
            verbose: self.verbose,
            volume,
        })
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Run the session.
    ///
    /// A live session runs the targets once and reports the freed space. A
    /// dry-run session reports the estimate and then calls `confirm`; when it
    /// returns true the targets run again in live mode.
    pub fn run(
        &self,
        targets: &[CleanupTarget],
        toolbox: &dyn Toolbox,
        confirm: impl FnOnce() -> bool,
    ) -> Result<SessionReport> {
        let log = Logger::new(self.verbose, false);
        let mut report = SessionReport::default();

        if self.mode.is_dry_run() {
            let summary = self.pass(targets, toolbox, self.mode)?;
            println!("{}", estimate_message(summary.estimated.bytes()));
            report.dry_run = Some(summary);

            if !confirm() {
                return Ok(report);
            }
        }

        let live = RunMode::live().with_update(self.mode.update);
        let summary = self.pass(targets, toolbox, live)?;
        report_failures(&log, &summary);
        println!(
            "{}",
            freed_message(summary.freed.and_then(|freed| freed.delta()))
        );
        report.live = Some(summary);

        Ok(report)
    }

    fn pass(
        &self,
        targets: &[CleanupTarget],
        toolbox: &dyn Toolbox,
        mode: RunMode,
    ) -> Result<RunSummary> {
        Sweep::builder()
            .targets(targets)
            .toolbox(toolbox)
            .mode(mode)
            .volume(&self.volume)
            .verbose(self.verbose)
            .build()
            .run()
    }
}

fn report_failures(log: &Logger, summary: &RunSummary) {
    let failed_paths = summary.failed_paths();
    if failed_paths > 0 {
        log.warn(format!("{failed_paths} path(s) could not be removed"));
    }

    for outcome in summary
        .outcomes
        .iter()
        .filter(|o| o.state == TargetState::PartiallyFailed)
    {
        for failure in &outcome.tool_failures {
            log.verbose(
                1,
                format!("  {}: '{}' did not succeed", outcome.id, failure.command),
            );
        }
        log.verbose(1, format!("  {} finished with failures", outcome.id));
    }
}
