// src/services/headhunter.rs

//! hh.ru vacancy search client.
//!
//! Walks result pages for a keyword until the API reports no more pages or
//! the configured page cap is reached. Any failed page fails the whole fetch.

use reqwest::blocking::Client;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ApiConfig, RawVacancy, SearchPage};
use crate::utils::http::{create_client, fetch_text};

/// Query for one result page. Built fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub text: String,
    pub page: u32,
    pub per_page: u32,
    pub only_with_salary: bool,
    pub area: Option<u32>,
}

impl SearchRequest {
    /// First page of a search for `text`.
    pub fn first(text: &str, config: &ApiConfig) -> Self {
        Self {
            text: text.to_string(),
            page: 0,
            per_page: config.per_page,
            only_with_salary: config.only_with_salary,
            area: config.area,
        }
    }

    /// Same query, another page.
    pub fn at_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("text", self.text.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
            ("only_with_salary", self.only_with_salary.to_string()),
        ];
        if let Some(area) = self.area {
            pairs.push(("area", area.to_string()));
        }
        pairs
    }
}

/// Retrieves one page of search results.
pub trait PageFetcher {
    fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage>;
}

/// [`PageFetcher`] over HTTP.
pub struct HttpPageFetcher {
    client: Client,
    base_url: Url,
}

impl HttpPageFetcher {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: create_client(config)?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    pub fn request_url(&self, request: &SearchRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().extend_pairs(request.query_pairs());
        url
    }
}

impl PageFetcher for HttpPageFetcher {
    fn fetch_page(&self, request: &SearchRequest) -> Result<SearchPage> {
        let url = self.request_url(request);
        log::debug!("GET {}", url);

        let body = fetch_text(&self.client, &url)?;
        serde_json::from_str(&body).map_err(AppError::malformed)
    }
}

/// Where raw vacancies for a keyword come from.
pub trait VacancySource {
    /// All vacancies for `keyword`, or the first failure.
    ///
    /// A failure on any page discards the pages already fetched; callers
    /// never see a partial result.
    fn fetch(&self, keyword: &str) -> Result<Vec<RawVacancy>>;
}

/// Paginated hh.ru search.
pub struct HeadHunterSource<F: PageFetcher = HttpPageFetcher> {
    fetcher: F,
    config: ApiConfig,
}

impl HeadHunterSource<HttpPageFetcher> {
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Ok(Self::new(HttpPageFetcher::new(config)?, config))
    }
}

impl<F: PageFetcher> HeadHunterSource<F> {
    pub fn new(fetcher: F, config: &ApiConfig) -> Self {
        Self {
            fetcher,
            config: config.clone(),
        }
    }
}

impl<F: PageFetcher> VacancySource for HeadHunterSource<F> {
    fn fetch(&self, keyword: &str) -> Result<Vec<RawVacancy>> {
        let first = SearchRequest::first(keyword, &self.config);
        let mut vacancies = Vec::new();
        let mut page = 0;

        loop {
            let result = self.fetcher.fetch_page(&first.at_page(page))?;
            let items = result.vacancies();
            log::debug!(
                "Page {}/{} for {:?}: {} vacancies",
                page + 1,
                result.pages,
                keyword,
                items.len()
            );
            vacancies.extend(items);

            if page + 1 >= self.config.max_pages || page + 1 >= result.pages {
                break;
            }
            page += 1;
        }

        log::info!("Fetched {} vacancies for {:?}", vacancies.len(), keyword);
        Ok(vacancies)
    }
}
