// Persistence helpers shared by the credential store and the ledger

use crate::error::{TrackerError, TrackerResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// How a store's backing file looked when it was loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file yet - a valid empty state
    Fresh,
    /// File read successfully
    Loaded { records: usize },
    /// File present but unusable; the store started empty
    Recovered { reason: String },
}

impl LoadStatus {
    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadStatus::Recovered { .. })
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            LoadStatus::Recovered { reason } => Some(reason),
            _ => None,
        }
    }
}

/// Replace `path` with whatever `write` produces.
///
/// The content goes to a sibling temp file first and is renamed over the
/// target, so a failure never leaves a half-written file behind.
pub fn replace_file<F>(path: &Path, write: F) -> TrackerResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> TrackerResult<()>,
{
    let tmp = temp_sibling(path);

    let result = File::create(&tmp)
        .map_err(|e| TrackerError::io(path, e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush().map_err(|e| TrackerError::io(path, e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| TrackerError::io(path, e))
        })
        .and_then(|_| fs::rename(&tmp, path).map_err(|e| TrackerError::io(path, e)));

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }

    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "store".to_string());
    path.with_file_name(format!(".{}.tmp", name))
}
