// src/pipeline/search.rs

//! Search pipeline: fetch, normalize, persist, filter, rank.
//!
//! One [`SearchPipeline::run`] walks a fixed sequence of [`Stage`]s. Upstream
//! and storage failures are absorbed along the way, so a run always reaches
//! [`Stage::Ready`] and the operator sees whatever could be produced.

use std::collections::HashSet;
use std::fmt;

use crate::error::Result;
use crate::models::{Config, RawSalary, UpperBoundPolicy, Vacancy};
use crate::services::{HeadHunterSource, VacancySource};
use crate::storage::{
    AddOutcome, RemoveOutcome, VacancyRepository, VacancyStore, open_stores,
};

use super::filter::{KeywordFilter, SalaryFilter};
use super::rank::{sort_by_salary, split_top};

/// Builds the stores a keyword's results are written to.
pub type StoreFactory = Box<dyn Fn(&str) -> Vec<Box<dyn VacancyStore>>>;

/// Pipeline position, in the order a run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    Normalizing,
    Persisting,
    Filtering,
    Sorting,
    Ready,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Fetching => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Persisting => "persisting",
            Stage::Filtering => "filtering",
            Stage::Sorting => "sorting",
            Stage::Ready => "ready",
        };
        f.write_str(name)
    }
}

/// What the operator asked for.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub keyword: String,
    pub filter_words: Vec<String>,
    pub min_salary: RawSalary,
    pub max_salary: RawSalary,
    pub top_n: usize,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>, top_n: usize) -> Self {
        Self {
            keyword: keyword.into(),
            filter_words: Vec::new(),
            min_salary: RawSalary::Absent,
            max_salary: RawSalary::Absent,
            top_n,
        }
    }

    pub fn with_filter_words(mut self, words: Vec<String>) -> Self {
        self.filter_words = words;
        self
    }

    pub fn with_salary(mut self, min: RawSalary, max: RawSalary) -> Self {
        self.min_salary = min;
        self.max_salary = max;
        self
    }
}

/// Outcome of persisting one batch to one store.
#[derive(Debug)]
pub struct PersistReport {
    pub location: String,
    pub result: Result<AddOutcome>,
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct SearchOutcome {
    pub keyword: String,
    /// Vacancies received from upstream
    pub fetched: usize,
    /// Upstream failure, if the fetch was abandoned
    pub fetch_error: Option<String>,
    pub persisted: Vec<PersistReport>,
    /// Filtered vacancies, highest salary first
    pub ranked: Vec<Vacancy>,
    pub top_n: usize,
    pub stages: Vec<Stage>,
}

impl SearchOutcome {
    pub fn total(&self) -> usize {
        self.ranked.len()
    }

    pub fn top(&self) -> &[Vacancy] {
        split_top(&self.ranked, self.top_n).0
    }

    pub fn remainder(&self) -> &[Vacancy] {
        split_top(&self.ranked, self.top_n).1
    }

    pub fn persist_failures(&self) -> usize {
        self.persisted.iter().filter(|r| r.result.is_err()).count()
    }
}

/// Records and logs the stages a run walks through.
struct StageTrail {
    keyword: String,
    stages: Vec<Stage>,
}

impl StageTrail {
    fn start(keyword: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            stages: vec![Stage::Idle],
        }
    }

    fn enter(&mut self, stage: Stage) {
        log::debug!("[{}] {}", self.keyword, stage);
        self.stages.push(stage);
    }
}

/// Fetch-to-ranking orchestrator.
pub struct SearchPipeline<S: VacancySource> {
    source: S,
    stores: StoreFactory,
    policy: UpperBoundPolicy,
}

impl SearchPipeline<HeadHunterSource> {
    /// hh.ru source and file stores, all from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = HeadHunterSource::from_config(&config.api)?;
        let storage = config.storage.clone();
        Ok(Self::new(
            source,
            Box::new(move |keyword: &str| open_stores(&storage, keyword)),
            config.salary.upper_bound_policy,
        ))
    }
}

impl<S: VacancySource> SearchPipeline<S> {
    pub fn new(source: S, stores: StoreFactory, policy: UpperBoundPolicy) -> Self {
        Self {
            source,
            stores,
            policy,
        }
    }

    fn repositories(&self, keyword: &str) -> Vec<VacancyRepository<Box<dyn VacancyStore>>> {
        (self.stores)(keyword)
            .into_iter()
            .map(|store| VacancyRepository::new(store, self.policy))
            .collect()
    }

    /// Run one search.
    ///
    /// Only an unusable query is an error; fetch and store failures are
    /// reported in the outcome instead.
    pub fn run(&self, query: &SearchQuery) -> Result<SearchOutcome> {
        let keywords = KeywordFilter::new(query.filter_words.as_slice())?;
        let window = SalaryFilter::new(&query.min_salary, &query.max_salary);
        let mut trail = StageTrail::start(&query.keyword);

        trail.enter(Stage::Fetching);
        let (raw, fetch_error) = match self.source.fetch(&query.keyword) {
            Ok(raw) => (raw, None),
            Err(e) => {
                log::error!("Fetch for {:?} failed: {}", query.keyword, e);
                (Vec::new(), Some(e.to_string()))
            }
        };
        let fetched = raw.len();

        trail.enter(Stage::Normalizing);
        let vacancies: Vec<Vacancy> = raw
            .into_iter()
            .map(|item| item.into_vacancy(self.policy))
            .collect();

        trail.enter(Stage::Persisting);
        let persisted = self
            .repositories(&query.keyword)
            .into_iter()
            .map(|repo| {
                let result = repo.add(&vacancies);
                if let Err(e) = &result {
                    log::error!("Persisting to {} failed: {}", repo.location(), e);
                }
                PersistReport {
                    location: repo.location(),
                    result,
                }
            })
            .collect();

        trail.enter(Stage::Filtering);
        let filtered = window.apply(&keywords.apply(&vacancies));

        trail.enter(Stage::Sorting);
        let ranked = sort_by_salary(filtered);

        trail.enter(Stage::Ready);
        log::info!(
            "Search {:?}: {} fetched, {} matched",
            query.keyword,
            fetched,
            ranked.len()
        );

        Ok(SearchOutcome {
            keyword: query.keyword.clone(),
            fetched,
            fetch_error,
            persisted,
            ranked,
            top_n: query.top_n,
            stages: trail.stages,
        })
    }

    /// Stored vacancies for a keyword, highest salary first.
    ///
    /// Stores are read in configuration order; an id seen in an earlier
    /// store is not repeated.
    pub fn stored(&self, keyword: &str) -> Vec<Vacancy> {
        let mut seen = HashSet::new();
        let merged: Vec<Vacancy> = self
            .repositories(keyword)
            .iter()
            .flat_map(|repo| repo.vacancies())
            .filter(|vacancy| seen.insert(vacancy.id().to_string()))
            .collect();
        sort_by_salary(merged)
    }

    /// Remove a vacancy id from every store of a keyword.
    pub fn remove(&self, keyword: &str, id: &str) -> Vec<(String, Result<RemoveOutcome>)> {
        self.repositories(keyword)
            .iter()
            .map(|repo| (repo.location(), repo.remove_by_id(id)))
            .collect()
    }
}
