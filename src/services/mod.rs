//! Service layer for the vacancy pipeline.
//!
//! This module contains the upstream clients:
//! - hh.ru paginated search (`HeadHunterSource`)

mod headhunter;

pub use headhunter::{
    HeadHunterSource, HttpPageFetcher, PageFetcher, SearchRequest, VacancySource,
};
