use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use tracing::debug;

pub const MARK_EXTENSION: &str = "mark";

/// A `.mark` file on disk. Only the path is held; contents are read on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkFile {
    path: PathBuf,
    name: String,
}

impl MarkFile {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name without its directory, e.g. `cohort-1.mark`.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MarkFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// Lists the regular files in `dir` with a `.mark` extension, sorted by file name ignoring case.
#[tracing::instrument(level = "debug")]
pub fn list_mark_files(dir: &Path) -> Result<Vec<MarkFile>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("could not list marks directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("could not read entry in {}", dir.display()))?;
        let path = entry.path();
        let is_file = entry
            .file_type()
            .with_context(|| format!("could not stat {}", path.display()))?
            .is_file();

        if is_file && path.extension() == Some(OsStr::new(MARK_EXTENSION)) {
            files.push(MarkFile::new(path));
        }
    }

    let files = files
        .into_iter()
        .sorted_by(|a, b| {
            let (a, b) = (a.name(), b.name());
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        })
        .collect_vec();
    debug!(num_files = files.len(), "found mark files");
    Ok(files)
}
