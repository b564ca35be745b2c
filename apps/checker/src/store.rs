use std::path::{Path, PathBuf};
use std::{fs, io};

use serde_json::Value;
use tracing::info;

use crate::error::StoreError;
use crate::migration::StoredService;
use crate::models::Service;

/// Whole-document persistence for the service list. One load at run start,
/// at most one save at run end; element order is preserved verbatim so the
/// document stays diff-friendly.
pub struct ServiceStore {
    path: PathBuf,
}

impl ServiceStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    /// Read and validate the document, migrating legacy-shaped elements as
    /// they are deserialized. Missing file, malformed JSON, and a non-array
    /// top level are all fatal.
    pub fn load(&self, now: i64) -> Result<Vec<Service>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::Missing(self.path.clone()));
            }
            Err(err) => return Err(StoreError::Read(err)),
        };

        let document: Value = serde_json::from_str(&raw)?;
        if !document.is_array() {
            return Err(StoreError::InvalidShape);
        }

        let stored: Vec<StoredService> = serde_json::from_value(document)?;
        Ok(stored.into_iter().map(|service| service.into_current(now)).collect())
    }

    /// Write the full list back, pretty-printed with 2-space indentation.
    pub fn save(&self, services: &[Service]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string_pretty(services)?;
        fs::write(&self.path, serialized).map_err(StoreError::Write)?;
        info!("Database updated successfully");
        Ok(())
    }
}
