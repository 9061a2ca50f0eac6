use std::fmt;
use std::path::PathBuf;

use super::orchestrator::RunMode;
use super::toolbox::Toolbox;

/// An external cleaner invocation such as `brew cleanup -s`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Run through `sudo -n` unless already root.
    pub elevated: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
            elevated: false,
        }
    }

    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elevated {
            f.write_str("sudo ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// When a target runs. Evaluation only reads the filesystem and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Always,
    /// The path exists (symlinks are not followed).
    Exists(PathBuf),
    /// The program is on `PATH`.
    Installed(String),
    /// The operator passed `--update`.
    UpdateRequested,
    All(Vec<Activation>),
}

impl Activation {
    pub fn installed(program: impl Into<String>) -> Self {
        Activation::Installed(program.into())
    }

    pub fn exists(path: impl Into<PathBuf>) -> Self {
        Activation::Exists(path.into())
    }

    pub fn is_active(&self, toolbox: &dyn Toolbox, mode: RunMode) -> bool {
        match self {
            Activation::Always => true,
            Activation::Exists(path) => path.symlink_metadata().is_ok(),
            Activation::Installed(program) => toolbox.is_installed(program),
            Activation::UpdateRequested => mode.update,
            Activation::All(all) => all.iter().all(|a| a.is_active(toolbox, mode)),
        }
    }
}

/// What a target does once active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Collect `patterns` and delete the matches.
    Delete { patterns: Vec<String>, elevated: bool },
    /// Run external cleaners. In a dry run nothing is invoked; the `cache`
    /// patterns point at the tool's default cache and are estimated instead.
    Invoke {
        commands: Vec<ToolCommand>,
        cache: Vec<String>,
    },
    /// Run external cleaners, then collect and delete `patterns`. A dry run
    /// only estimates `patterns`.
    InvokeThenCollect {
        commands: Vec<ToolCommand>,
        patterns: Vec<String>,
        elevated: bool,
    },
}

impl Action {
    pub fn delete<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Action::Delete {
            patterns: patterns.into_iter().map(Into::into).collect(),
            elevated: false,
        }
    }

    pub fn invoke(commands: Vec<ToolCommand>) -> Self {
        Action::Invoke {
            commands,
            cache: Vec::new(),
        }
    }

    pub fn invoke_then_collect<I, S>(commands: Vec<ToolCommand>, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Action::InvokeThenCollect {
            commands,
            patterns: patterns.into_iter().map(Into::into).collect(),
            elevated: false,
        }
    }

    /// Remove collected paths with elevated privileges. No effect on
    /// [`Action::Invoke`], whose commands carry their own flag.
    pub fn elevated(mut self) -> Self {
        match &mut self {
            Action::Delete { elevated, .. } | Action::InvokeThenCollect { elevated, .. } => {
                *elevated = true;
            }
            Action::Invoke { .. } => {}
        }
        self
    }

    /// Default cache locations used for the dry-run estimate of an
    /// [`Action::Invoke`].
    pub fn estimating<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Action::Invoke { cache, .. } = &mut self {
            cache.extend(patterns.into_iter().map(Into::into));
        }
        self
    }
}

/// One named, independently activated unit of cleanup work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupTarget {
    id: String,
    message: String,
    activation: Activation,
    action: Action,
}

impl CleanupTarget {
    /// Create a target that is always active.
    pub fn new(id: impl Into<String>, message: impl Into<String>, action: Action) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            activation: Activation::Always,
            action,
        }
    }

    pub fn when(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn action(&self) -> &Action {
        &self.action
    }
}
