use std::{fs, io, path};

use serde::Deserialize;
use superstar_core_store::Value;

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("Could not read snapshot {}: {}", .path.display(), .error)]
    Read { path: path::PathBuf, error: io::Error },
    #[error("Snapshot {} is not a valid document: {}", .path.display(), .error)]
    Parse {
        path: path::PathBuf,
        error: serde_json::Error,
    },
    #[error("Could not write snapshot {}: {}", .path.display(), .error)]
    Write { path: path::PathBuf, error: io::Error },
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

/// The on-disk copy of a document.
///
/// The whole document lives in one JSON file that is replaced wholesale on
/// every save. Writes go to a sibling temporary file first and are renamed
/// over the snapshot, so a crash mid-save leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: path::PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<path::PathBuf>) -> SnapshotFile {
        SnapshotFile { path: path.into() }
    }

    pub fn path(&self) -> &path::Path {
        &self.path
    }

    fn staging_path(&self) -> path::PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the snapshot, returning `None` when no snapshot exists yet.
    pub fn read(&self) -> Result<Option<Value>, SnapshotError> {
        log::debug!("Reading {}...", self.path.display());

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    error,
                })
            }
        };

        parse_document(&bytes)
            .map(Some)
            .map_err(|error| SnapshotError::Parse {
                path: self.path.clone(),
                error,
            })
    }

    /// Replace the snapshot with `document`.
    ///
    /// Serialization is deterministic: saving the same document twice
    /// produces byte-identical files.
    pub fn write(&self, document: &Value) -> Result<(), SnapshotError> {
        use io::Write;

        let mut bytes = serde_json::to_vec_pretty(document)?;
        bytes.push(b'\n');

        let staging = self.staging_path();
        log::debug!("Writing {}...", staging.display());

        let write_err = |error: io::Error| SnapshotError::Write {
            path: self.path.clone(),
            error,
        };

        let mut f = fs::File::create(&staging).map_err(write_err)?;
        f.write_all(&bytes).map_err(write_err)?;
        f.sync_all().map_err(write_err)?;
        drop(f);

        fs::rename(&staging, &self.path).map_err(write_err)?;
        Ok(())
    }
}

/// Parse a whole document with no nesting limit.
///
/// Paths alone can nest a document far deeper than serde_json's default
/// limit of 128, and everything `write` produces must read back. The stack
/// grows on the heap as needed.
fn parse_document(bytes: &[u8]) -> Result<Value, serde_json::Error> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
