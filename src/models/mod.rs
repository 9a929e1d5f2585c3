// src/models/mod.rs

//! Domain models for the vacancy pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod config;
pub mod payload;
pub mod salary;
pub mod vacancy;

// Re-export all public types
pub use config::{
    ApiConfig, Config, DisplayConfig, LoggingConfig, SalaryConfig, StorageConfig, StorageFormat,
};
pub use payload::{RawVacancy, SearchPage};
pub use salary::{RawSalary, SALARY_UNBOUNDED, SalaryRange, UpperBoundPolicy, normalize};
pub use vacancy::{AREA_UNSPECIFIED, RECORD_COLUMNS, Vacancy, VacancyRecord};
