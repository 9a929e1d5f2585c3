//! JSON array store.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::VacancyRecord;
use crate::storage::{VacancyStore, local};

/// Pretty-printed JSON array of flat vacancy rows.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VacancyStore for JsonFileStore {
    fn read_all(&self) -> Result<Vec<VacancyRecord>> {
        let Some(bytes) = local::read_optional(&self.path)? else {
            return Ok(Vec::new());
        };

        // A freshly touched file counts as an empty store
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| AppError::unreadable(self.location(), e))
    }

    fn write_all(&self, records: &[VacancyRecord]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(records)?;
        local::write_atomic(&self.path, &bytes)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
