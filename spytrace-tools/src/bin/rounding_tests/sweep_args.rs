use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use spytrace::sweep::{LaunchMode, MonitorSettings, Pattern, Sweep};

#[derive(Debug, Parser)]
#[command(name = "rounding_tests")]
#[command(version)]
#[command(about = "Runs a program under the FP monitor once per rounding mode / DAZ / FTZ configuration", long_about = None)]
pub struct Args {
    /// `mpi` or `nompi`
    #[arg(value_name = "MODE")]
    pub mode: String,
    /// Number of MPI ranks (1 if nompi)
    #[arg(value_name = "THREADS")]
    pub threads: usize,
    /// Pattern matching the program's output files, e.g. `*miniaero*.yaml`
    #[arg(short = 'm', long = "output-match", value_name = "PATTERN")]
    pub output_match: Vec<Pattern>,
    /// Pattern matching the monitor's log files
    #[arg(long, value_name = "PATTERN", default_value = "*.fpemon")]
    pub monitor_match: Pattern,
    /// Monitor library to preload
    #[arg(long, default_value = "./fpspy.so")]
    pub preload: String,
    /// Monitor mode (`individual` or `aggregate`)
    #[arg(long, default_value = "individual")]
    pub fpspy_mode: String,
    /// Exceptions the monitor traps on
    #[arg(long, default_value = "invalid")]
    pub except_list: String,
    /// MPI launcher
    #[arg(long, env = "MPIRUN", default_value = "mpirun")]
    pub mpirun: String,
    /// Directory where the per-configuration directories are created
    #[arg(short = 'o', long, default_value = ".")]
    pub out_dir: PathBuf,
    /// Nest the configuration directories under a timestamped directory
    #[arg(long)]
    pub timestamped: bool,
    /// Only run these configurations (e.g. `nearest_daz_ftz`)
    #[arg(long = "only", value_name = "NAME")]
    pub only: Vec<String>,
    /// Log the commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
    /// The program to run and its arguments
    #[arg(last = true, required = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

impl Args {
    pub fn sweep(&self) -> eyre::Result<Sweep> {
        let launch = LaunchMode::parse(&self.mode, self.threads)?;
        if launch == LaunchMode::NoMpi && self.threads != 1 {
            tracing::warn!(threads = self.threads, "thread count is ignored without mpi");
        }
        let mut sweep = Sweep::new(launch, self.command.clone())?;
        sweep.launcher = self.mpirun.clone();
        sweep.monitor = MonitorSettings {
            preload: self.preload.clone(),
            mode: self.fpspy_mode.clone(),
            except_list: self.except_list.clone(),
            ..MonitorSettings::default()
        };
        sweep.output_patterns = self.output_match.clone();
        sweep.monitor_pattern = self.monitor_match.clone();
        sweep.out_dir = if self.timestamped {
            self.out_dir.join(Utc::now().to_rfc3339())
        } else {
            self.out_dir.clone()
        };
        Ok(sweep)
    }
}
