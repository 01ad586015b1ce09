mod sweep_args;

use clap::Parser;
use spytrace::sweep::{Exit, LaunchMode, Sweep};
use spytrace_tools::{
    artifacts::DirectoryMover,
    logging,
    process::{DryRun, ProcessRunner},
};
use sweep_args::Args;

fn main() -> eyre::Result<()> {
    logging::init();
    let args = Args::parse();
    let configs = Sweep::select(&args.only)?;
    let sweep = args.sweep()?;
    match sweep.launch {
        LaunchMode::Mpi { ranks } => tracing::info!(ranks, "running in MPI mode"),
        LaunchMode::NoMpi => tracing::info!("running in non-mpi mode"),
    }
    let report = if args.dry_run {
        sweep.run_all(configs, &mut DryRun, &mut DryRun)?
    } else {
        sweep.run_all(configs, &mut ProcessRunner, &mut DirectoryMover::new("."))?
    };
    for outcome in report.failures() {
        if let Exit::Failed(code) = outcome.exit {
            tracing::warn!(config = outcome.name, ?code, "configuration failed");
        }
    }
    tracing::info!(
        configs = report.outcomes.len(),
        failed = report.failures().count(),
        "rounding tests concluded"
    );
    Ok(())
}
