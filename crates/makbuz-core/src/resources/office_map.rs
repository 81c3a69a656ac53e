//! Persisted tax-office number → name mapping.
//!
//! When a receipt yields both the office number and a confidently resolved
//! name, the pair is recorded; later receipts where only the number
//! survives OCR can then still report the office name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::ResourceError;

/// JSON-file-backed number → name store.
///
/// Updates are serialized through a mutex so concurrent batch workers
/// cannot lose writes; reads go through the same lock (the map is tiny).
#[derive(Debug)]
pub struct TaxOfficeMap {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl TaxOfficeMap {
    /// Open the store, loading existing entries if the file is present.
    /// A missing file starts an empty map; a corrupt one is an error.
    pub fn open(path: &Path) -> Result<Self, ResourceError> {
        let entries = if path.exists() {
            let bytes = std::fs::read(path).map_err(|source| ResourceError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            serde_json::from_slice(&bytes).map_err(|e| ResourceError::MalformedMap {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?
        } else {
            HashMap::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Open the store, degrading to an empty in-memory map on failure.
    pub fn open_or_empty(path: &Path) -> Self {
        match Self::open(path) {
            Ok(map) => map,
            Err(e) => {
                warn!("could not open office map: {e}");
                Self {
                    path: path.to_path_buf(),
                    entries: Mutex::new(HashMap::new()),
                }
            }
        }
    }

    pub fn get(&self, number: &str) -> Option<String> {
        self.entries.lock().ok()?.get(number).cloned()
    }

    /// Record a pair and persist the whole map. Persistence failures are
    /// logged, not propagated: the in-memory mapping still serves the rest
    /// of the batch.
    pub fn insert(&self, number: &str, name: &str) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let stale = entries
            .insert(number.to_string(), name.to_string())
            .as_deref()
            == Some(name);
        if stale {
            return;
        }
        debug!(number, name, "recorded tax office mapping");

        match serde_json::to_vec_pretty(&*entries) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&self.path, bytes) {
                    warn!("could not persist office map: {e}");
                }
            }
            Err(e) => warn!("could not serialize office map: {e}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
