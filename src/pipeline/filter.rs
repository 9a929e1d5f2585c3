//! Keyword and salary-range filters.
//!
//! Both filters preserve input order and never mutate the vacancies they see.

use regex::{Regex, RegexBuilder};

use crate::error::{AppError, Result};
use crate::models::{RawSalary, Vacancy};

/// Case-insensitive whole-word match over name and requirements.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    /// `None` when no usable word was given
    pattern: Option<Regex>,
}

impl KeywordFilter {
    pub fn new<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let alternatives: Vec<String> = words
            .iter()
            .map(|word| word.as_ref().trim())
            .filter(|word| !word.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let pattern = RegexBuilder::new(&format!(
            r"(?:^|[^\w])(?:{})(?:$|[^\w])",
            alternatives.join("|")
        ))
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::validation(format!("unusable filter words: {e}")))?;

        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn is_noop(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        match &self.pattern {
            Some(pattern) => {
                let haystack = format!("{} {}", vacancy.name(), vacancy.requirements());
                pattern.is_match(&haystack)
            }
            None => true,
        }
    }

    pub fn apply(&self, vacancies: &[Vacancy]) -> Vec<Vacancy> {
        vacancies
            .iter()
            .filter(|vacancy| self.matches(vacancy))
            .cloned()
            .collect()
    }
}

/// Vacancies mentioning any of `words`; all of them when `words` is blank.
pub fn filter_by_keywords<S: AsRef<str>>(
    vacancies: &[Vacancy],
    words: &[S],
) -> Result<Vec<Vacancy>> {
    Ok(KeywordFilter::new(words)?.apply(vacancies))
}

/// Salary window; a `0` bound is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SalaryFilter {
    pub min: u64,
    pub max: u64,
}

impl SalaryFilter {
    /// Targets are coerced like salary cells; anything unusable becomes `0`.
    pub fn new(min: &RawSalary, max: &RawSalary) -> Self {
        Self {
            min: min.coerce_or_zero(),
            max: max.coerce_or_zero(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.min == 0 && self.max == 0
    }

    pub fn matches(&self, vacancy: &Vacancy) -> bool {
        vacancy.min_salary() >= self.min && (self.max == 0 || vacancy.max_salary() <= self.max)
    }

    pub fn apply(&self, vacancies: &[Vacancy]) -> Vec<Vacancy> {
        vacancies
            .iter()
            .filter(|vacancy| self.matches(vacancy))
            .cloned()
            .collect()
    }
}

pub fn filter_by_salary(
    vacancies: &[Vacancy],
    min: &RawSalary,
    max: &RawSalary,
) -> Vec<Vacancy> {
    SalaryFilter::new(min, max).apply(vacancies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UpperBoundPolicy;
    use crate::models::vacancy::fixtures::{ids, record, trio};

    const POLICY: UpperBoundPolicy = UpperBoundPolicy::Unbounded;

    fn vacancy(id: &str, name: &str, requirements: &str) -> Vacancy {
        let mut row = record(id, name, RawSalary::Absent, RawSalary::Absent);
        row.requirements = requirements.to_string();
        Vacancy::from_record(row, POLICY)
    }

    #[test]
    fn test_keywords_match_name_or_requirements() {
        let vacancies = trio(POLICY);
        let found = filter_by_keywords(&vacancies, &["тестировщик", "SQL"]).unwrap();
        assert_eq!(ids(&found), vec!["123754650", "123752740"]);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let vacancies = trio(POLICY);
        let found = filter_by_keywords(&vacancies, &["python"]).unwrap();
        assert_eq!(ids(&found), vec!["123052790"]);

        let found = filter_by_keywords(&vacancies, &["ТЕСТИРОВЩИК"]).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_keywords_need_whole_words() {
        let vacancies = vec![
            vacancy("1", "Java Developer", ""),
            vacancy("2", "JavaScript Developer", ""),
            vacancy("3", "Fullstack", "Опыт с Java/Kotlin"),
        ];
        let found = filter_by_keywords(&vacancies, &["java"]).unwrap();
        assert_eq!(ids(&found), vec!["1", "3"]);
    }

    #[test]
    fn test_keywords_are_matched_literally() {
        let vacancies = vec![
            vacancy("1", "C++ разработчик", ""),
            vacancy("2", "C разработчик", ""),
            vacancy("3", "Аналитик", "SQL (PostgreSQL)"),
        ];
        assert_eq!(ids(&filter_by_keywords(&vacancies, &["C++"]).unwrap()), vec!["1"]);
        assert_eq!(
            ids(&filter_by_keywords(&vacancies, &["(PostgreSQL)"]).unwrap()),
            vec!["3"]
        );
    }

    #[test]
    fn test_blank_word_list_keeps_everything() {
        let vacancies = trio(POLICY);
        let empty: [&str; 0] = [];
        assert_eq!(filter_by_keywords(&vacancies, &empty).unwrap().len(), 3);
        assert_eq!(filter_by_keywords(&vacancies, &["", "  "]).unwrap().len(), 3);
        assert!(KeywordFilter::new(&[" "]).unwrap().is_noop());
    }

    #[test]
    fn test_salary_window_with_mirrored_upper_bound() {
        let vacancies = trio(UpperBoundPolicy::MirrorLower);
        let found = filter_by_salary(
            &vacancies,
            &RawSalary::Unsigned(80000),
            &RawSalary::Unsigned(120000),
        );
        assert_eq!(ids(&found), vec!["123754650"]);
    }

    #[test]
    fn test_salary_window_excludes_open_ended() {
        let vacancies = trio(POLICY);
        let found = filter_by_salary(
            &vacancies,
            &RawSalary::Unsigned(80000),
            &RawSalary::Unsigned(120000),
        );
        assert!(found.is_empty());

        let found = filter_by_salary(
            &vacancies,
            &RawSalary::Unsigned(100000),
            &RawSalary::Absent,
        );
        assert_eq!(ids(&found), vec!["123754650"]);
    }

    #[test]
    fn test_salary_zero_bounds_are_noop() {
        let vacancies = trio(POLICY);
        let found = filter_by_salary(&vacancies, &RawSalary::Absent, &RawSalary::Unsigned(0));
        assert_eq!(found.len(), 3);
        assert!(SalaryFilter::new(&"abc".into(), &RawSalary::Signed(-10)).is_noop());
    }

    #[test]
    fn test_salary_upper_only() {
        let vacancies = trio(POLICY);
        let found = filter_by_salary(&vacancies, &RawSalary::Absent, &"100000".into());
        assert_eq!(ids(&found), vec!["123752740"]);
    }
}
