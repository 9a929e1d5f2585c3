//! CSV store: one header row, one row per vacancy.

use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::{RECORD_COLUMNS, VacancyRecord};
use crate::storage::{VacancyStore, local};

#[derive(Debug, Clone)]
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VacancyStore for CsvFileStore {
    fn read_all(&self) -> Result<Vec<VacancyRecord>> {
        let Some(bytes) = local::read_optional(&self.path)? else {
            return Ok(Vec::new());
        };

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        reader
            .deserialize::<VacancyRecord>()
            .map(|row| row.map_err(|e| AppError::unreadable(self.location(), e)))
            .collect()
    }

    fn write_all(&self, records: &[VacancyRecord]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());

        // serde only emits the header alongside the first row
        if records.is_empty() {
            writer.write_record(RECORD_COLUMNS)?;
        }
        for record in records {
            writer.serialize(record)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Io(e.into_error()))?;
        local::write_atomic(&self.path, &bytes)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
