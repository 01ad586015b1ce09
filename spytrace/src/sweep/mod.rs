//! Runs a program once per rounding configuration with the floating-point
//! monitor preloaded, collecting each run's artifacts into a directory named
//! after the configuration.
//!
//! Launching processes and moving files go through [`CommandRunner`] and
//! [`ArtifactMover`], so the sweep itself never touches the system.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod configs;
pub mod pattern;

pub use configs::{ForceRounding, RoundingConfig, RoundingMode, ROUNDING_CONFIGS};
pub use pattern::Pattern;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error("launch mode must be `mpi` or `nompi`, got `{0}`")]
    UnknownLaunchMode(String),
    #[error("mpi launch needs at least one rank")]
    ZeroRanks,
    #[error("no program command given")]
    EmptyCommand,
    #[error("unknown rounding configuration `{0}`")]
    UnknownConfig(String),
    #[error("failed to launch `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to move artifacts into {}", destination.display())]
    Relocate {
        destination: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Mpi { ranks: usize },
    NoMpi,
}

impl LaunchMode {
    pub fn parse(mode: &str, ranks: usize) -> Result<Self, SweepError> {
        match mode {
            "mpi" if ranks == 0 => Err(SweepError::ZeroRanks),
            "mpi" => Ok(Self::Mpi { ranks }),
            "nompi" => Ok(Self::NoMpi),
            _ => Err(SweepError::UnknownLaunchMode(mode.to_owned())),
        }
    }
}

/// How the monitor library is configured for every run of the sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    pub preload: String,
    pub mode: String,
    pub aggressive: bool,
    pub except_list: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            preload: "./fpspy.so".to_owned(),
            mode: "individual".to_owned(),
            aggressive: true,
            except_list: "invalid".to_owned(),
        }
    }
}

impl MonitorSettings {
    pub fn env(&self, config: &RoundingConfig) -> Vec<(String, String)> {
        let Self {
            preload,
            mode,
            aggressive,
            except_list,
        } = self;
        let aggressive = if *aggressive { "yes" } else { "no" };
        let mut env = vec![
            ("FPSPY_MODE".to_owned(), mode.clone()),
            ("FPSPY_AGGRESSIVE".to_owned(), aggressive.to_owned()),
            ("FPSPY_EXCEPT_LIST".to_owned(), except_list.clone()),
        ];
        if let Some(forced) = config.force_rounding {
            env.push(("FPSPY_FORCE_ROUNDING".to_owned(), forced.to_string()));
        }
        env.push(("LD_PRELOAD".to_owned(), preload.clone()));
        env
    }
}

/// A fully resolved command line: `env` is set on the child, on top of the
/// inherited environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Success,
    /// Non-zero status, or `None` when killed by a signal.
    Failed(Option<i32>),
    /// Nothing was launched.
    Skipped,
}

pub trait CommandRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit, SweepError>;
}

pub trait ArtifactMover {
    /// Creates `destination` and moves every file matching one of `patterns` into it.
    /// Returns how many files were moved.
    fn relocate(&mut self, patterns: &[Pattern], destination: &Path) -> Result<usize, SweepError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigOutcome {
    pub name: &'static str,
    pub exit: Exit,
    pub moved: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub outcomes: Vec<ConfigOutcome>,
}

impl SweepReport {
    pub fn failures(&self) -> impl Iterator<Item = &ConfigOutcome> + '_ {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.exit, Exit::Failed(_)))
    }
}

#[derive(Debug, Clone)]
pub struct Sweep {
    pub launch: LaunchMode,
    pub launcher: String,
    pub monitor: MonitorSettings,
    /// The target program and its arguments, without any MPI launcher.
    pub command: Vec<String>,
    pub output_patterns: Vec<Pattern>,
    pub monitor_pattern: Pattern,
    pub out_dir: PathBuf,
}

impl Sweep {
    pub fn new(launch: LaunchMode, command: Vec<String>) -> Result<Self, SweepError> {
        if command.is_empty() {
            return Err(SweepError::EmptyCommand);
        }
        Ok(Self {
            launch,
            launcher: "mpirun".to_owned(),
            monitor: MonitorSettings::default(),
            command,
            output_patterns: vec![],
            monitor_pattern: Pattern::new("*.fpemon"),
            out_dir: PathBuf::from("."),
        })
    }

    /// The configurations named in `only`, in table order; all of them when `only` is empty.
    pub fn select(only: &[String]) -> Result<Vec<&'static RoundingConfig>, SweepError> {
        if let Some(unknown) = only.iter().find(|name| configs::find(name).is_none()) {
            return Err(SweepError::UnknownConfig(unknown.clone()));
        }
        Ok(ROUNDING_CONFIGS
            .iter()
            .filter(|config| only.is_empty() || only.iter().any(|name| name == config.name))
            .collect())
    }

    pub fn invocation(&self, config: &RoundingConfig) -> Invocation {
        let env = self.monitor.env(config);
        match self.launch {
            LaunchMode::Mpi { ranks } => {
                let mut args: Vec<String> = env
                    .into_iter()
                    .flat_map(|(key, value)| ["-x".to_owned(), format!("{key}={value}")])
                    .collect();
                args.extend(["-np".to_owned(), ranks.to_string()]);
                args.extend(self.command.iter().cloned());
                Invocation {
                    program: self.launcher.clone(),
                    args,
                    env: vec![],
                }
            }
            LaunchMode::NoMpi => Invocation {
                program: self.command[0].clone(),
                args: self.command[1..].to_vec(),
                env,
            },
        }
    }

    pub fn destination(&self, config: &RoundingConfig) -> PathBuf {
        self.out_dir.join(config.name)
    }

    pub fn run_one(
        &self,
        config: &'static RoundingConfig,
        runner: &mut impl CommandRunner,
        mover: &mut impl ArtifactMover,
    ) -> Result<ConfigOutcome, SweepError> {
        let invocation = self.invocation(config);
        tracing::info!(config = config.name, "running {invocation}");
        let exit = runner.run(&invocation)?;
        if let Exit::Failed(code) = exit {
            tracing::warn!(config = config.name, ?code, "program exited unsuccessfully");
        }
        let patterns: Vec<Pattern> = self
            .output_patterns
            .iter()
            .chain([&self.monitor_pattern])
            .cloned()
            .collect();
        let destination = self.destination(config);
        let moved = mover.relocate(&patterns, &destination)?;
        tracing::info!(
            config = config.name,
            moved,
            "artifacts moved to {}",
            destination.display()
        );
        Ok(ConfigOutcome {
            name: config.name,
            exit,
            moved,
        })
    }

    pub fn run_all(
        &self,
        configs: impl IntoIterator<Item = &'static RoundingConfig>,
        runner: &mut impl CommandRunner,
        mover: &mut impl ArtifactMover,
    ) -> Result<SweepReport, SweepError> {
        let outcomes = configs
            .into_iter()
            .map(|config| self.run_one(config, runner, mover))
            .collect::<Result<_, _>>()?;
        Ok(SweepReport { outcomes })
    }
}
