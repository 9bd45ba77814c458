//! Reading and writing the JSON record documents.
//!
//! Each document is a top-level JSON array of objects. The student document
//! is rewritten pretty-printed after every mutation; the course document is
//! only ever read.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};

/// How the student document is written back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Stage in a temporary file next to the target, then rename over it.
    #[default]
    Atomic,
    /// Truncate and write the target in place.
    InPlace,
}

impl WriteMode {
    /// Pick a mode from the `atomic_writes` config flag.
    #[must_use]
    pub fn from_atomic(atomic: bool) -> Self {
        if atomic {
            Self::Atomic
        } else {
            Self::InPlace
        }
    }
}

/// Read and parse a document as an array of records.
///
/// # Errors
///
/// Returns [`Error::Read`] if the file cannot be read and [`Error::Parse`]
/// if its contents are not a valid array of records.
pub async fn load<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    debug!("Reading {}", path.display());
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize records as pretty-printed JSON with two-space indentation.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render<T: Serialize>(records: &[T]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Write rendered document text to `path`, replacing previous content.
///
/// # Errors
///
/// Returns [`Error::Persist`] if the write fails.
pub async fn save(path: &Path, text: String, mode: WriteMode) -> Result<()> {
    let target = path.to_path_buf();
    let outcome = match mode {
        WriteMode::InPlace => tokio::fs::write(&target, text.as_bytes()).await,
        WriteMode::Atomic => {
            let staged_target = target.clone();
            tokio::task::spawn_blocking(move || write_staged(&staged_target, &text))
                .await
                .map_err(|e| Error::internal(format!("write task failed: {e}")))?
        }
    };

    outcome.map_err(|source| Error::Persist {
        path: target,
        source,
    })?;

    debug!("Wrote {} ({:?})", path.display(), mode);
    Ok(())
}

fn write_staged(target: &Path, text: &str) -> std::io::Result<()> {
    let dir = parent_dir(target);
    let mut staged = tempfile::NamedTempFile::new_in(&dir)?;
    staged.write_all(text.as_bytes())?;
    // Keep the existing document's mode; staged files start out 0600
    if let Ok(metadata) = std::fs::metadata(target) {
        staged.as_file().set_permissions(metadata.permissions())?;
    }
    staged.as_file().sync_all()?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
