// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Filesystem side of the generator.
//!
//! Files are always regenerated from scratch: existing files with the same
//! name are truncated and overwritten, never merged.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf}
};

use tracing::debug;

use crate::error::{self, Error};

/// Scratch file created and removed to confirm the directory accepts writes.
const WRITE_CHECK_FILE: &str = ".monitor2tf-write-check";

/// Output directory that generated files are written into.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf
}

impl OutputDir {
    /// Creates the directory hierarchy if needed and checks that files can be
    /// created inside it.
    ///
    /// Calling this on an existing writable directory leaves it untouched, so
    /// reruns are safe.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDir`](Error::OutputDir) when the directory cannot
    /// be created or does not accept new files.
    pub fn create(root: &Path) -> Result<Self, Error> {
        fs::create_dir_all(root).map_err(|source| error::output_dir_error(root, source))?;
        let check = root.join(WRITE_CHECK_FILE);
        File::create(&check).map_err(|source| error::output_dir_error(root, source))?;
        fs::remove_file(&check).map_err(|source| error::output_dir_error(root, source))?;
        debug!("Output directory ready at {}", root.display());
        Ok(Self {
            root: root.to_path_buf()
        })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Writes `contents` to `file_name` inside the directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Write`](Error::Write) when the file cannot be created
    /// or written.
    pub fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf, Error> {
        let path = self.root.join(file_name);
        let file = File::create(&path).map_err(|source| error::write_error(&path, source))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(contents.as_bytes())
            .map_err(|source| error::write_error(&path, source))?;
        writer
            .flush()
            .map_err(|source| error::write_error(&path, source))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use tempfile::tempdir;

    use super::OutputDir;
    use crate::error::Error;

    #[test]
    fn create_builds_nested_directories_and_is_idempotent() {
        let temp = tempdir().expect("failed to create tempdir");
        let root = temp.path().join("nested/terraform");

        OutputDir::create(&root).expect("first create");
        OutputDir::create(&root).expect("second create");
        assert!(root.is_dir());
    }

    #[test]
    fn create_fails_below_a_regular_file() {
        let temp = tempdir().expect("failed to create tempdir");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").expect("write blocker");

        let error = OutputDir::create(&blocker.join("terraform")).expect_err("expected failure");
        assert!(matches!(error, Error::OutputDir { .. }));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn create_rejects_existing_directory_that_refuses_files() {
        let error = OutputDir::create(Path::new("/proc")).expect_err("expected failure");
        match error {
            Error::OutputDir {
                path, ..
            } => assert_eq!(path, Path::new("/proc")),
            other => panic!("expected output dir error, got {other:?}")
        }
    }

    #[test]
    fn create_leaves_no_scratch_file_behind() {
        let temp = tempdir().expect("failed to create tempdir");
        OutputDir::create(temp.path()).expect("create");

        let entries = fs::read_dir(temp.path()).expect("read dir").count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn write_file_overwrites_existing_contents() {
        let temp = tempdir().expect("failed to create tempdir");
        let output = OutputDir::create(temp.path()).expect("create");

        output.write_file("provider.tf", "old contents that are longer").expect("first write");
        let path = output.write_file("provider.tf", "new").expect("second write");

        assert_eq!(fs::read_to_string(path).expect("read back"), "new");
    }

    #[test]
    fn write_file_reports_path_on_failure() {
        let temp = tempdir().expect("failed to create tempdir");
        let output = OutputDir::create(temp.path()).expect("create");
        fs::create_dir(temp.path().join("monitor_taken.tf")).expect("create blocker dir");

        let error = output.write_file("monitor_taken.tf", "x").expect_err("expected failure");
        match error {
            Error::Write {
                path, ..
            } => assert!(path.ends_with("monitor_taken.tf")),
            other => panic!("expected write error, got {other:?}")
        }
    }
}
