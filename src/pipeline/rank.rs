//! Salary ranking.

use crate::models::Vacancy;

/// Highest salary first. Stable: equal ranges keep their input order.
pub fn sort_by_salary(mut vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
    vacancies.sort_by(|a, b| b.cmp(a));
    vacancies
}

/// Split a ranked list into the first `n` and the rest.
pub fn split_top(vacancies: &[Vacancy], n: usize) -> (&[Vacancy], &[Vacancy]) {
    vacancies.split_at(n.min(vacancies.len()))
}
