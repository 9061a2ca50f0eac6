use std::fmt::Display;
#[cfg(test)]
use std::sync::{Arc, Mutex};

use colored::Colorize;

/// Where log lines go.
#[derive(Clone, Debug, Default)]
enum Sink {
    #[default]
    Stderr,
    #[cfg(test)]
    Memory(Arc<Mutex<Vec<String>>>),
}

#[derive(Clone, Debug)]
pub struct Logger {
    verbose: u8,
    quiet: bool,
    sink: Sink,
}

impl Logger {
    pub fn new(verbose: u8, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            sink: Sink::Stderr,
        }
    }

    /// Logger for one pass. A plain dry run only prints the final estimate.
    pub fn for_run(dry_run: bool, verbose: u8) -> Self {
        Self::new(verbose, dry_run && verbose == 0)
    }

    /// A logger that records lines instead of printing them.
    #[cfg(test)]
    pub(crate) fn capturing(verbose: u8, quiet: bool) -> (Self, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let log = Self {
            verbose,
            quiet,
            sink: Sink::Memory(Arc::clone(&lines)),
        };
        (log, lines)
    }

    fn emit(&self, line: String) {
        match &self.sink {
            Sink::Stderr => eprintln!("{line}"),
            #[cfg(test)]
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
        }
    }

    pub fn info(&self, message: impl Display) {
        if !self.quiet {
            self.emit(message.to_string());
        }
    }

    /// One line per running target.
    pub fn progress(&self, message: impl Display) {
        if !self.quiet {
            self.emit(message.to_string().green().to_string());
        }
    }

    pub fn verbose(&self, level: u8, message: impl Display) {
        if !self.quiet && self.verbose >= level {
            self.emit(message.to_string());
        }
    }

    /// Warnings are printed even when quiet.
    pub fn warn(&self, message: impl Display) {
        self.emit(message.to_string().yellow().to_string());
    }

    pub fn level(&self) -> u8 {
        self.verbose
    }

    #[cfg(test)]
    pub(crate) fn is_quiet(&self) -> bool {
        self.quiet
    }
}
