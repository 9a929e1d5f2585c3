//! Pipeline entry points for vacancy searches.
//!
//! - `filter`: keyword and salary-window filters
//! - `rank`: salary ordering
//! - `search`: the fetch → persist → filter → rank run

pub mod filter;
pub mod rank;
pub mod search;

pub use filter::{KeywordFilter, SalaryFilter, filter_by_keywords, filter_by_salary};
pub use rank::{sort_by_salary, split_top};
pub use search::{
    PersistReport, SearchOutcome, SearchPipeline, SearchQuery, Stage, StoreFactory,
};
