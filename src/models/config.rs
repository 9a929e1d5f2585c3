//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::salary::UpperBoundPolicy;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Upstream API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Where and how fetched vacancies are kept
    #[serde(default)]
    pub storage: StorageConfig,

    /// Salary normalization rules
    #[serde(default)]
    pub salary: SalaryConfig,

    /// Operator-facing output
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log verbosity
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url)?;
        if self.api.user_agent.trim().is_empty() {
            return Err(AppError::validation("api.user_agent is empty"));
        }
        if self.api.timeout_secs == 0 {
            return Err(AppError::validation("api.timeout_secs must be > 0"));
        }
        if !(1..=100).contains(&self.api.per_page) {
            return Err(AppError::validation("api.per_page must be within 1..=100"));
        }
        if self.api.max_pages == 0 {
            return Err(AppError::validation("api.max_pages must be > 0"));
        }
        if self.storage.formats.is_empty() {
            return Err(AppError::validation("storage.formats is empty"));
        }
        if self.storage.default_stem.trim().is_empty() {
            return Err(AppError::validation("storage.default_stem is empty"));
        }
        if self.display.top_n == 0 {
            return Err(AppError::validation("display.top_n must be > 0"));
        }
        Ok(())
    }
}

/// hh.ru search API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Vacancy search endpoint
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// User-Agent header, the only client identification the API needs
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Items per page (the API caps this at 100)
    #[serde(default = "defaults::per_page")]
    pub per_page: u32,

    /// Maximum number of pages fetched per search
    #[serde(default = "defaults::max_pages")]
    pub max_pages: u32,

    /// Ask the API for vacancies with a published salary only
    #[serde(default = "defaults::only_with_salary")]
    pub only_with_salary: bool,

    /// Region filter (113 is Russia); omit to search everywhere
    #[serde(default = "defaults::area")]
    pub area: Option<u32>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            per_page: defaults::per_page(),
            max_pages: defaults::max_pages(),
            only_with_salary: defaults::only_with_salary(),
            area: defaults::area(),
        }
    }
}

/// On-disk format of a vacancy store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    Json,
    Csv,
    Xlsx,
}

impl StorageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Json => "json",
            StorageFormat::Csv => "csv",
            StorageFormat::Xlsx => "xlsx",
        }
    }
}

/// Storage location settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the store files
    #[serde(default = "defaults::storage_dir")]
    pub dir: PathBuf,

    /// Every format listed here receives each fetched batch
    #[serde(default = "defaults::formats")]
    pub formats: Vec<StorageFormat>,

    /// Name store files after the search keyword
    #[serde(default = "defaults::per_keyword_files")]
    pub per_keyword_files: bool,

    /// File stem used when keyword naming is off or yields nothing usable
    #[serde(default = "defaults::default_stem")]
    pub default_stem: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
            formats: defaults::formats(),
            per_keyword_files: defaults::per_keyword_files(),
            default_stem: defaults::default_stem(),
        }
    }
}

impl StorageConfig {
    /// File stem for a keyword.
    ///
    /// Letters and digits are kept (lowercased), a space becomes `_` and any
    /// other character is written as `%XX` per UTF-8 byte, so distinct
    /// keywords such as `C`, `C++` and `C#` never share a file.
    pub fn stem_for(&self, keyword: &str) -> String {
        if !self.per_keyword_files {
            return self.default_stem.clone();
        }

        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return self.default_stem.clone();
        }

        let mut stem = String::with_capacity(keyword.len());
        let mut buf = [0u8; 4];
        for c in keyword.chars() {
            if c.is_alphanumeric() {
                stem.push(c);
            } else if c == ' ' {
                stem.push('_');
            } else {
                for byte in c.encode_utf8(&mut buf).bytes() {
                    stem.push_str(&format!("%{byte:02X}"));
                }
            }
        }
        stem
    }

    /// Path of the store file for a keyword and format.
    pub fn path_for(&self, keyword: &str, format: StorageFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", self.stem_for(keyword), format.extension()))
    }
}

/// Salary normalization settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SalaryConfig {
    /// How "from X" vacancies without an upper bound are ranged
    #[serde(default)]
    pub upper_bound_policy: UpperBoundPolicy,
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// How many vacancies the top list shows
    #[serde(default = "defaults::top_n")]
    pub top_n: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_n: defaults::top_n(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is not set
    #[serde(default = "defaults::level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::level(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::StorageFormat;

    // API defaults
    pub fn base_url() -> String {
        "https://api.hh.ru/vacancies".into()
    }
    pub fn user_agent() -> String {
        "api-test-agent".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn per_page() -> u32 {
        100
    }
    pub fn max_pages() -> u32 {
        5
    }
    pub fn only_with_salary() -> bool {
        true
    }
    pub fn area() -> Option<u32> {
        Some(113)
    }

    // Storage defaults
    pub fn storage_dir() -> PathBuf {
        PathBuf::from("data/vacancies")
    }
    pub fn formats() -> Vec<StorageFormat> {
        vec![StorageFormat::Json, StorageFormat::Csv, StorageFormat::Xlsx]
    }
    pub fn per_keyword_files() -> bool {
        true
    }
    pub fn default_stem() -> String {
        "vacancies".into()
    }

    // Display defaults
    pub fn top_n() -> usize {
        10
    }

    // Logging defaults
    pub fn level() -> String {
        "info".into()
    }
}
