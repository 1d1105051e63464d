//! File system adapter for the submit capability.

use crate::application::ports::{DocumentSink, WriteError};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Sink writing each submitted document to a file under a root directory.
///
/// The destination is a path relative to the root; an existing file is
/// replaced. Missing parent directories are created. Absolute destinations
/// and destinations containing `..` are rejected with `WriteError::Rejected`.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    /// Create a sink writing below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory all destinations are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path a destination resolves to.
    ///
    /// Does not check the destination; `write` does.
    pub fn path_for(&self, destination: &str) -> PathBuf {
        self.root.join(destination)
    }
}

/// A destination must stay below the root.
fn check_destination(destination: &str) -> Result<(), WriteError> {
    let escapes = Path::new(destination)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));

    if destination.is_empty() || escapes {
        return Err(WriteError::Rejected {
            destination: destination.to_string(),
            message: "destination must be a relative path below the sink root".to_string(),
        });
    }
    Ok(())
}

impl DocumentSink for FileSink {
    fn write(&self, destination: &str, payload: &str) -> Result<(), WriteError> {
        check_destination(destination)?;
        let path = self.path_for(destination);
        let io_error = |source| WriteError::Io {
            destination: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(&path, payload).map_err(io_error)?;

        tracing::debug!(path = %path.display(), bytes = payload.len(), "document written");
        Ok(())
    }
}
