use std::{
    fs::File,
    io::{stdin, BufRead, BufReader},
    path::PathBuf,
};

use clap::Parser;
use eyre::WrapErr;
use spytrace::{IntervalMs, TimestampColumn, TraceSettings};
use spytrace_tools::logging;

#[derive(Debug, Parser)]
#[command(name = "eventtrace")]
#[command(version)]
#[command(about = "Counts timestamped events per time interval and writes them as CSV", long_about = None)]
struct Args {
    /// Bucket width in milliseconds
    #[arg(value_name = "INTERVAL_MS")]
    interval: IntervalMs,
    /// CSV file to write
    #[arg(short = 'o', default_value = "trace.csv")]
    output: PathBuf,
    /// Whitespace-separated token holding the timestamp (0 is the first)
    #[arg(short = 'c', long = "column", default_value_t = TimestampColumn::default())]
    column: TimestampColumn,
    /// Event log to read (defaults to stdin)
    #[arg(short = 'i')]
    input: Option<PathBuf>,
}

fn main() -> eyre::Result<()> {
    logging::init();
    let Args {
        interval,
        output,
        column,
        input,
    } = Args::parse();
    let input: Box<dyn BufRead> = match &input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(stdin().lock()),
    };
    let sink =
        File::create(&output).wrap_err_with(|| format!("failed to create {}", output.display()))?;
    let summary = spytrace::run(TraceSettings { interval, column }, input, sink)?;
    tracing::info!(
        %interval,
        events = summary.events,
        buckets = summary.buckets,
        "wrote {}",
        output.display()
    );
    if summary.regressions > 0 {
        tracing::warn!(
            regressions = summary.regressions,
            "some timestamps went backwards"
        );
    }
    Ok(())
}
