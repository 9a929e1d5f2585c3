//! Storage abstractions for vacancy persistence.
//!
//! A [`VacancyStore`] is a whole-file backend that can only read everything
//! or replace everything. [`VacancyRepository`] layers the id-keyed merge on
//! top: append-if-new, remove-by-id and tolerant loading.
//!
//! ## Directory Structure
//!
//! ```text
//! data/vacancies/
//! ├── python.json           # one file per keyword and format
//! ├── python.csv
//! └── python.xlsx
//! ```

pub mod csv_file;
pub mod json_file;
pub mod local;
pub mod xlsx_file;

use std::collections::HashSet;
use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::models::{StorageConfig, StorageFormat, UpperBoundPolicy, Vacancy, VacancyRecord};

// Re-export for convenience
pub use csv_file::CsvFileStore;
pub use json_file::JsonFileStore;
pub use xlsx_file::XlsxFileStore;

/// Trait for vacancy storage backends.
pub trait VacancyStore {
    /// Every stored row. A missing backing file is an empty store;
    /// an undecodable one is [`AppError::StoreUnreadable`].
    fn read_all(&self) -> Result<Vec<VacancyRecord>>;

    /// Replace the stored rows in one atomic write.
    fn write_all(&self, records: &[VacancyRecord]) -> Result<()>;

    /// Human-readable location for logs and reports.
    fn location(&self) -> String;
}

impl<S: VacancyStore + ?Sized> VacancyStore for Box<S> {
    fn read_all(&self) -> Result<Vec<VacancyRecord>> {
        (**self).read_all()
    }

    fn write_all(&self, records: &[VacancyRecord]) -> Result<()> {
        (**self).write_all(records)
    }

    fn location(&self) -> String {
        (**self).location()
    }
}

/// Build the backend for one format at `path`.
pub fn open_store(format: StorageFormat, path: impl Into<PathBuf>) -> Box<dyn VacancyStore> {
    match format {
        StorageFormat::Json => Box::new(JsonFileStore::new(path)),
        StorageFormat::Csv => Box::new(CsvFileStore::new(path)),
        StorageFormat::Xlsx => Box::new(XlsxFileStore::new(path)),
    }
}

/// One backend per configured format for a keyword, duplicates dropped.
pub fn open_stores(config: &StorageConfig, keyword: &str) -> Vec<Box<dyn VacancyStore>> {
    let mut seen = HashSet::new();
    config
        .formats
        .iter()
        .filter(|format| seen.insert(**format))
        .map(|format| open_store(*format, config.path_for(keyword, *format)))
        .collect()
}

/// Result of [`VacancyRepository::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddOutcome {
    /// Rows appended by this call
    pub added: usize,
    /// Rows in the store afterwards
    pub total: usize,
}

impl AddOutcome {
    pub fn is_unchanged(&self) -> bool {
        self.added == 0
    }
}

/// Result of [`VacancyRepository::remove`] and [`VacancyRepository::remove_by_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { count: usize },
    NotFound,
}

/// Id-keyed merge over a whole-file store.
///
/// Read-modify-write is unguarded: one writer per store file is assumed.
pub struct VacancyRepository<S: VacancyStore> {
    store: S,
    policy: UpperBoundPolicy,
}

impl<S: VacancyStore> VacancyRepository<S> {
    pub fn new(store: S, policy: UpperBoundPolicy) -> Self {
        Self { store, policy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    /// Stored rows; unreadable stores are logged and treated as empty.
    pub fn load(&self) -> Vec<VacancyRecord> {
        match self.store.read_all() {
            Ok(records) => records,
            Err(e) => {
                log::warn!(
                    "Treating store {} as empty: {}",
                    self.store.location(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Stored rows normalized into vacancies, in file order.
    pub fn vacancies(&self) -> Vec<Vacancy> {
        self.load()
            .into_iter()
            .map(|record| Vacancy::from_record(record, self.policy))
            .collect()
    }

    /// Append vacancies whose id is not stored yet.
    ///
    /// Duplicates inside `new` collapse to their first occurrence. Nothing
    /// is written when every id is already present.
    pub fn add(&self, new: &[Vacancy]) -> Result<AddOutcome> {
        let mut records = self.load();
        let mut ids: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();

        let before = records.len();
        for vacancy in new {
            if ids.insert(vacancy.id().to_string()) {
                records.push(vacancy.to_record());
            }
        }
        let added = records.len() - before;

        if added == 0 {
            log::debug!("No new vacancies for {}", self.store.location());
        } else {
            self.write(&records)?;
            log::info!(
                "Stored {} new vacancies in {} ({} total)",
                added,
                self.store.location(),
                records.len()
            );
        }

        Ok(AddOutcome {
            added,
            total: records.len(),
        })
    }

    /// Remove every row sharing this vacancy's id.
    pub fn remove(&self, vacancy: &Vacancy) -> Result<RemoveOutcome> {
        self.remove_by_id(vacancy.id())
    }

    pub fn remove_by_id(&self, id: &str) -> Result<RemoveOutcome> {
        let mut records = self.load();
        let before = records.len();
        records.retain(|record| record.id != id);

        let count = before - records.len();
        if count == 0 {
            return Ok(RemoveOutcome::NotFound);
        }

        self.write(&records)?;
        log::info!("Removed {} from {}", id, self.store.location());
        Ok(RemoveOutcome::Removed { count })
    }

    fn write(&self, records: &[VacancyRecord]) -> Result<()> {
        self.store.write_all(records).map_err(|e| match e {
            AppError::StoreUnwritable { .. } => e,
            other => AppError::unwritable(self.store.location(), other),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSalary;
    use crate::models::vacancy::fixtures::{backend, ids, junior_qa, qa_engineer, record, trio};
    use std::cell::{Cell, RefCell};
    use tempfile::TempDir;

    const POLICY: UpperBoundPolicy = UpperBoundPolicy::Unbounded;

    /// In-memory store counting writes.
    #[derive(Default)]
    struct MemoryStore {
        rows: RefCell<Vec<VacancyRecord>>,
        writes: Cell<usize>,
        corrupt: bool,
    }

    impl VacancyStore for MemoryStore {
        fn read_all(&self) -> Result<Vec<VacancyRecord>> {
            if self.corrupt {
                return Err(AppError::unreadable("memory", "garbled"));
            }
            Ok(self.rows.borrow().clone())
        }

        fn write_all(&self, records: &[VacancyRecord]) -> Result<()> {
            self.writes.set(self.writes.get() + 1);
            *self.rows.borrow_mut() = records.to_vec();
            Ok(())
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    #[test]
    fn test_add_appends_only_new_ids() {
        let repo = VacancyRepository::new(MemoryStore::default(), POLICY);

        let first = repo.add(&[backend(POLICY), qa_engineer(POLICY)]).unwrap();
        assert_eq!(first, AddOutcome { added: 2, total: 2 });

        let second = repo.add(&trio(POLICY)).unwrap();
        assert_eq!(second, AddOutcome { added: 1, total: 3 });
        assert_eq!(
            ids(&repo.vacancies()),
            vec!["123052790", "123754650", "123752740"]
        );
    }

    #[test]
    fn test_add_without_new_ids_does_not_write() {
        let repo = VacancyRepository::new(MemoryStore::default(), POLICY);
        repo.add(&trio(POLICY)).unwrap();
        assert_eq!(repo.store().writes.get(), 1);

        let outcome = repo.add(&trio(POLICY)).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(repo.store().writes.get(), 1);

        let outcome = repo.add(&[]).unwrap();
        assert!(outcome.is_unchanged());
        assert_eq!(repo.store().writes.get(), 1);
    }

    #[test]
    fn test_add_collapses_duplicates_within_batch() {
        let repo = VacancyRepository::new(MemoryStore::default(), POLICY);
        let outcome = repo
            .add(&[junior_qa(POLICY), junior_qa(POLICY), backend(POLICY)])
            .unwrap();
        assert_eq!(outcome, AddOutcome { added: 2, total: 2 });
    }

    #[test]
    fn test_remove_outcomes() {
        let repo = VacancyRepository::new(MemoryStore::default(), POLICY);
        repo.add(&trio(POLICY)).unwrap();

        assert_eq!(
            repo.remove(&qa_engineer(POLICY)).unwrap(),
            RemoveOutcome::Removed { count: 1 }
        );
        assert_eq!(repo.store().writes.get(), 2);

        assert_eq!(
            repo.remove_by_id("123754650").unwrap(),
            RemoveOutcome::NotFound
        );
        assert_eq!(repo.store().writes.get(), 2);
        assert_eq!(ids(&repo.vacancies()), vec!["123052790", "123752740"]);
    }

    #[test]
    fn test_remove_drops_every_duplicate_row() {
        let store = MemoryStore::default();
        let row = backend(POLICY).to_record();
        *store.rows.borrow_mut() = vec![row.clone(), row];

        let repo = VacancyRepository::new(store, POLICY);
        assert_eq!(
            repo.remove_by_id("123052790").unwrap(),
            RemoveOutcome::Removed { count: 2 }
        );
        assert!(repo.load().is_empty());
    }

    #[test]
    fn test_corrupt_store_loads_empty() {
        let store = MemoryStore {
            corrupt: true,
            ..MemoryStore::default()
        };
        let repo = VacancyRepository::new(store, POLICY);
        assert!(repo.load().is_empty());
        assert_eq!(repo.remove_by_id("1").unwrap(), RemoveOutcome::NotFound);
    }

    #[test]
    fn test_file_stores_merge_the_same_way() {
        let tmp = TempDir::new().unwrap();
        let config = StorageConfig {
            dir: tmp.path().to_path_buf(),
            ..StorageConfig::default()
        };

        let stores = open_stores(&config, "Python");
        assert_eq!(stores.len(), 3);

        for store in stores {
            let repo = VacancyRepository::new(store, POLICY);
            assert_eq!(repo.add(&trio(POLICY)).unwrap().added, 3);
            assert!(repo.add(&[backend(POLICY)]).unwrap().is_unchanged());
            assert_eq!(
                repo.remove(&junior_qa(POLICY)).unwrap(),
                RemoveOutcome::Removed { count: 1 }
            );

            let stored = repo.vacancies();
            assert_eq!(ids(&stored), vec!["123052790", "123754650"]);
            assert_eq!(stored[1].to_record(), qa_engineer(POLICY).to_record());
        }

        assert!(tmp.path().join("python.json").exists());
        assert!(tmp.path().join("python.csv").exists());
        assert!(tmp.path().join("python.xlsx").exists());
        assert!(!tmp.path().join("python.json.tmp").exists());
    }

    #[test]
    fn test_failed_write_keeps_previous_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("python.json");
        let repo = VacancyRepository::new(JsonFileStore::new(&path), POLICY);
        repo.add(&trio(POLICY)).unwrap();
        let before = std::fs::read(&path).unwrap();

        // The temporary file cannot be created over a directory
        std::fs::create_dir(local::temp_path(&path)).unwrap();

        let extra = Vacancy::from_record(
            record("999", "Rust", RawSalary::Unsigned(1), RawSalary::Absent),
            POLICY,
        );
        let err = repo.add(&[extra]).unwrap_err();
        assert!(matches!(err, AppError::StoreUnwritable { .. }));

        let err = repo.remove_by_id("123052790").unwrap_err();
        assert!(matches!(err, AppError::StoreUnwritable { .. }));

        assert_eq!(std::fs::read(&path).unwrap(), before);
        assert_eq!(repo.vacancies().len(), 3);
    }

    #[test]
    fn test_open_stores_skips_repeated_formats() {
        let config = StorageConfig {
            formats: vec![StorageFormat::Csv, StorageFormat::Csv, StorageFormat::Json],
            ..StorageConfig::default()
        };
        let locations: Vec<_> = open_stores(&config, "go")
            .iter()
            .map(|store| store.location())
            .collect();
        assert_eq!(locations.len(), 2);
        assert!(locations[0].ends_with("go.csv"));
        assert!(locations[1].ends_with("go.json"));
    }
}
