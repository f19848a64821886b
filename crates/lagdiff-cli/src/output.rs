//! Output destinations for the result table and the run report.

use std::fmt;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

/// Argument value selecting standard output.
pub const STDOUT_ARG: &str = "-";

/// Where the result table goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_arg(path: &Path) -> Self {
        if path.as_os_str() == STDOUT_ARG {
            Self::Stdout
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Run `write` against this target.
    ///
    /// File targets are written through a temporary file in the same directory
    /// and renamed into place only after `write` succeeds.
    pub fn write_with<R>(&self, write: impl FnOnce(&mut dyn Write) -> Result<R>) -> Result<R> {
        match self {
            Self::Stdout => {
                let mut stdout = io::stdout().lock();
                let result = write(&mut stdout)?;
                stdout.flush().context("flush stdout")?;
                Ok(result)
            }
            Self::File(path) => write_atomically(path, write),
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("stdout"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Write a file via temp file and rename. The temp file is removed on failure.
pub fn write_atomically<R>(
    path: &Path,
    write: impl FnOnce(&mut dyn Write) -> Result<R>,
) -> Result<R> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {}", dir.display()))?;
    let result = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let result = write(&mut writer)?;
        writer
            .flush()
            .with_context(|| format!("write {}", path.display()))?;
        result
    };
    temp.as_file()
        .sync_all()
        .with_context(|| format!("sync {}", path.display()))?;
    debug!(
        temp_path = %temp.path().display(),
        target_path = %path.display(),
        "persisting output"
    );
    temp.persist(path)
        .with_context(|| format!("move output into {}", path.display()))?;
    Ok(result)
}
