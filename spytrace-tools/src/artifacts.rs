use std::{
    ffi::OsString,
    fs::{copy, create_dir_all, remove_file, rename},
    io,
    path::{Path, PathBuf},
};

use spytrace::sweep::{ArtifactMover, Pattern, SweepError};

/// Moves matching files out of the directory the program ran in.
pub struct DirectoryMover {
    source_dir: PathBuf,
}

impl DirectoryMover {
    pub fn new<P: AsRef<Path>>(source_dir: P) -> Self {
        Self {
            source_dir: source_dir.as_ref().to_path_buf(),
        }
    }

    fn matching_files(&self, patterns: &[Pattern]) -> io::Result<Vec<(PathBuf, OsString)>> {
        let files = self
            .source_dir
            .read_dir()?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_file()))
            .filter_map(|entry| {
                let name = entry.file_name();
                let matched = patterns
                    .iter()
                    .any(|pattern| pattern.matches(&name.to_string_lossy()));
                matched.then(|| (entry.path(), name))
            })
            .collect();
        Ok(files)
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    // rename cannot cross file systems
    if let Err(err) = rename(from, to) {
        copy(from, to).map_err(|_| err)?;
        remove_file(from)?;
    }
    Ok(())
}

impl ArtifactMover for DirectoryMover {
    fn relocate(&mut self, patterns: &[Pattern], destination: &Path) -> Result<usize, SweepError> {
        let relocate_err = |source| SweepError::Relocate {
            destination: destination.to_path_buf(),
            source,
        };
        create_dir_all(destination).map_err(relocate_err)?;
        let files = self.matching_files(patterns).map_err(relocate_err)?;
        for (path, name) in &files {
            tracing::debug!("moving {}", path.display());
            move_file(path, &destination.join(name)).map_err(relocate_err)?;
        }
        Ok(files.len())
    }
}

#[cfg(test)]
mod tests {
    use std::fs::{read_to_string, write};

    use super::*;
    use equator::assert;

    fn patterns() -> Vec<Pattern> {
        vec![Pattern::new("*miniaero*.yaml"), Pattern::new("*.fpemon")]
    }

    #[test]
    fn moves_only_matching_files() {
        let tmp = tempfile::tempdir().unwrap();
        let run_dir = tmp.path();
        write(run_dir.join("miniaero.yaml"), "energy: 1").unwrap();
        write(run_dir.join("__miniaero.1712.77.individual.fpemon"), "trace").unwrap();
        write(run_dir.join("input.yaml"), "mesh: 3").unwrap();
        let mut mover = DirectoryMover::new(run_dir);
        let destination = run_dir.join("zero_ftz");

        let moved = mover.relocate(&patterns(), &destination).unwrap();

        assert!(moved == 2);
        assert!(read_to_string(destination.join("miniaero.yaml")).unwrap() == "energy: 1");
        assert!(destination
            .join("__miniaero.1712.77.individual.fpemon")
            .exists());
        assert!(!run_dir.join("miniaero.yaml").exists());
        assert!(run_dir.join("input.yaml").exists());
    }

    #[test]
    fn destination_is_created_even_without_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mover = DirectoryMover::new(tmp.path());
        let destination = tmp.path().join("sweep").join("nearest");

        let moved = mover.relocate(&patterns(), &destination).unwrap();

        assert!(moved == 0);
        assert!(destination.is_dir());
    }

    #[test]
    fn directories_are_left_alone() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("old.fpemon")).unwrap();
        let mut mover = DirectoryMover::new(tmp.path());

        let moved = mover.relocate(&patterns(), &tmp.path().join("nearest")).unwrap();

        assert!(moved == 0);
        assert!(tmp.path().join("old.fpemon").is_dir());
    }

    #[test]
    fn missing_source_directory_is_a_relocate_error() {
        let tmp = tempfile::tempdir().unwrap();
        let mut mover = DirectoryMover::new(tmp.path().join("gone"));

        let result = mover.relocate(&patterns(), &tmp.path().join("nearest"));

        assert!(matches!(result, Err(SweepError::Relocate { .. })));
    }
}
