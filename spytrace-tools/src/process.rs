use std::{path::Path, process::Command};

use spytrace::sweep::{ArtifactMover, CommandRunner, Exit, Invocation, Pattern, SweepError};

/// Runs each invocation to completion, inheriting stdio.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit, SweepError> {
        let Invocation { program, args, env } = invocation;
        let status = Command::new(program)
            .args(args)
            .envs(env.iter().map(|(key, value)| (key, value)))
            .status()
            .map_err(|source| SweepError::Spawn {
                program: program.clone(),
                source,
            })?;
        if status.success() {
            Ok(Exit::Success)
        } else {
            Ok(Exit::Failed(status.code()))
        }
    }
}

/// Logs what would happen instead of doing it.
pub struct DryRun;

impl CommandRunner for DryRun {
    fn run(&mut self, invocation: &Invocation) -> Result<Exit, SweepError> {
        tracing::info!("dry run: would launch {invocation}");
        Ok(Exit::Skipped)
    }
}

impl ArtifactMover for DryRun {
    fn relocate(&mut self, patterns: &[Pattern], destination: &Path) -> Result<usize, SweepError> {
        let patterns: Vec<&str> = patterns.iter().map(Pattern::as_str).collect();
        tracing::info!(
            "dry run: would move {patterns:?} into {}",
            destination.display()
        );
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use equator::assert;

    fn sh(script: &str, env: Vec<(String, String)>) -> Invocation {
        Invocation {
            program: "sh".to_owned(),
            args: vec!["-c".to_owned(), script.to_owned()],
            env,
        }
    }

    #[cfg(unix)]
    #[test]
    fn exit_status_is_reported() {
        let mut runner = ProcessRunner;
        assert!(runner.run(&sh("exit 0", vec![])).unwrap() == Exit::Success);
        assert!(runner.run(&sh("exit 3", vec![])).unwrap() == Exit::Failed(Some(3)));
    }

    #[cfg(unix)]
    #[test]
    fn environment_reaches_the_child() {
        let mut runner = ProcessRunner;
        let env = vec![("FPSPY_FORCE_ROUNDING".to_owned(), "zero,ftz".to_owned())];
        let check = sh(r#"test "$FPSPY_FORCE_ROUNDING" = "zero,ftz""#, env);
        assert!(runner.run(&check).unwrap() == Exit::Success);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let mut runner = ProcessRunner;
        let invocation = Invocation {
            program: "./definitely-not-a-program-4f1c".to_owned(),
            args: vec![],
            env: vec![],
        };
        assert!(matches!(
            runner.run(&invocation),
            Err(SweepError::Spawn { .. })
        ));
    }

    #[test]
    fn dry_run_touches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let destination = tmp.path().join("nearest");
        assert!(DryRun.run(&sh("exit 1", vec![])).unwrap() == Exit::Skipped);
        assert!(DryRun.relocate(&[Pattern::new("*")], &destination).unwrap() == 0);
        assert!(!destination.exists());
    }
}
