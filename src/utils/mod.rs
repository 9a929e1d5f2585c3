//! Utility functions and helpers.

pub mod http;

use crate::models::RawSalary;

/// Split operator input into filter words on whitespace and commas.
pub fn split_words(input: &str) -> Vec<String> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

/// Salary typed by the operator; blank input is no bound.
pub fn parse_salary_input(input: &str) -> RawSalary {
    match input.trim() {
        "" => RawSalary::Absent,
        text => RawSalary::Text(text.to_string()),
    }
}

/// Size of the top list typed by the operator; zero or non-numbers are `None`.
pub fn parse_top_n(input: &str) -> Option<usize> {
    input.trim().parse::<usize>().ok().filter(|&n| n > 0)
}
