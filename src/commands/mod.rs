//! Entry point for a mac-cleanup run.
//!
//! [`execute`] owns the process-level concerns: color, privileges, the
//! interrupt handler and the real toolbox. The run itself lives in
//! [`Session`], which tests drive with fake tools and a scripted prompt.

use std::io::{self, BufRead, IsTerminal, Write};

use crate::catalog::{Environment, default_targets};
use crate::cli::Cli;
use crate::error::{CleanupError, Result};
use crate::logging::Logger;
use crate::privilege::SudoKeepAlive;
use crate::sweep::SystemToolbox;

pub(crate) mod session;

pub use session::{Session, SessionBuilder, SessionReport, estimate_message, freed_message};


/// Exit status used when the run is interrupted.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Run the full catalog as configured by the command line.
pub fn execute(cli: &Cli) -> Result<()> {
    if cli.no_color() {
        colored::control::set_override(false);
    }
    let log = startup_logger(cli);

    let keep_alive = SudoKeepAlive::acquire(&log)?;
    let stop = keep_alive.stop_handle();
    ctrlc::set_handler(move || {
        stop.stop();
        eprintln!();
        eprintln!("Interrupted, stopping cleanup.");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|err| CleanupError::Interrupt(err.to_string()))?;

    let env = Environment::from_process()?;
    let targets = default_targets(&env);
    let toolbox = SystemToolbox::new(cli.verbose());

    let result = Session::builder()
        .mode(cli.run_mode())
        .verbose(cli.verbose())
        .build()
        .and_then(|session| session.run(&targets, &toolbox, prompt_for_live_run));

    drop(keep_alive);
    result.map(|_| ())
}

fn startup_logger(cli: &Cli) -> Logger {
    Logger::for_run(cli.dry_run(), cli.verbose())
}

/// Ask whether a dry run should be followed by a live run.
///
/// Without a terminal on stdin the answer is always no.
pub fn prompt_for_live_run() -> bool {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return false;
    }

    print!("Run the cleanup now? [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match stdin.lock().read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
