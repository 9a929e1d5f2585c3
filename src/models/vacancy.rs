//! Vacancy data structures.
//!
//! [`VacancyRecord`] is the flat row every storage backend reads and writes.
//! [`Vacancy`] is the normalized, immutable listing built from a record; it
//! compares and orders by salary range only.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::salary::{RawSalary, SalaryRange, UpperBoundPolicy, normalize};

/// Substituted for an empty or missing area.
pub const AREA_UNSPECIFIED: &str = "не указано";

/// Column order shared by the tabular backends.
pub const RECORD_COLUMNS: [&str; 9] = [
    "id",
    "name",
    "url",
    "min_salary",
    "max_salary",
    "employer_name",
    "employer_url",
    "requirements",
    "area",
];

/// A vacancy as a flat mapping of columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VacancyRecord {
    #[serde(alias = "vac_id")]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub url: String,

    #[serde(default, alias = "salary_from")]
    pub min_salary: RawSalary,

    #[serde(default, alias = "salary_to")]
    pub max_salary: RawSalary,

    #[serde(default)]
    pub employer_name: String,

    #[serde(default)]
    pub employer_url: String,

    #[serde(default)]
    pub requirements: String,

    #[serde(default)]
    pub area: String,
}

/// A normalized job posting.
#[derive(Debug, Clone)]
pub struct Vacancy {
    id: String,
    name: String,
    url: String,
    salary: SalaryRange,
    employer_name: String,
    employer_url: String,
    requirements: String,
    area: String,
}

impl Vacancy {
    /// Normalize a flat record into a vacancy.
    pub fn from_record(record: VacancyRecord, policy: UpperBoundPolicy) -> Self {
        let salary = normalize(&record.min_salary, &record.max_salary, policy);
        let area = if record.area.trim().is_empty() {
            AREA_UNSPECIFIED.to_string()
        } else {
            record.area
        };

        Self {
            id: record.id,
            name: record.name,
            url: record.url,
            salary,
            employer_name: record.employer_name,
            employer_url: record.employer_url,
            requirements: record.requirements,
            area,
        }
    }

    /// Flatten into a record whose salary cells hold the normalized bounds.
    pub fn to_record(&self) -> VacancyRecord {
        VacancyRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            url: self.url.clone(),
            min_salary: RawSalary::Unsigned(self.salary.min),
            max_salary: RawSalary::Unsigned(self.salary.max),
            employer_name: self.employer_name.clone(),
            employer_url: self.employer_url.clone(),
            requirements: self.requirements.clone(),
            area: self.area.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn min_salary(&self) -> u64 {
        self.salary.min
    }

    pub fn max_salary(&self) -> u64 {
        self.salary.max
    }

    pub fn salary_range(&self) -> SalaryRange {
        self.salary
    }

    pub fn employer_name(&self) -> &str {
        &self.employer_name
    }

    pub fn employer_url(&self) -> &str {
        &self.employer_url
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn has_salary_from(&self) -> bool {
        self.salary.has_lower()
    }

    pub fn has_salary_to(&self) -> bool {
        self.salary.has_upper()
    }

    /// Compare against a value whose type is only known at runtime.
    ///
    /// Anything other than a [`Vacancy`] is a caller bug and yields
    /// [`AppError::UnsupportedComparison`].
    pub fn try_compare(&self, other: &dyn Any) -> Result<Ordering> {
        match other.downcast_ref::<Vacancy>() {
            Some(vacancy) => Ok(self.cmp(vacancy)),
            None => Err(AppError::UnsupportedComparison {
                found: describe_type(other),
            }),
        }
    }

    /// Runtime equality with the same contract as [`Vacancy::try_compare`].
    pub fn try_equals(&self, other: &dyn Any) -> Result<bool> {
        self.try_compare(other).map(|ordering| ordering == Ordering::Equal)
    }
}

fn describe_type(value: &dyn Any) -> String {
    if value.is::<String>() || value.is::<&'static str>() {
        "a string".to_string()
    } else if value.is::<VacancyRecord>() {
        "an unnormalized record".to_string()
    } else if value.is::<SalaryRange>() {
        "a bare salary range".to_string()
    } else {
        "a non-vacancy value".to_string()
    }
}

impl PartialEq for Vacancy {
    fn eq(&self, other: &Self) -> bool {
        self.salary == other.salary
    }
}

impl Eq for Vacancy {}

impl PartialOrd for Vacancy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vacancy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.salary.cmp(&other.salary)
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "Зарплата: {}", self.salary)?;
        writeln!(f, "Компания: {}", self.employer_name)?;
        writeln!(f, "Город: {}", self.area)?;
        writeln!(f, "Ссылка на вакансию: {}", self.url)?;
        writeln!(f, "Ссылка на компанию: {}", self.employer_url)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(id: &str, name: &str, min: RawSalary, max: RawSalary) -> VacancyRecord {
        VacancyRecord {
            id: id.to_string(),
            name: name.to_string(),
            url: format!("https://hh.ru/vacancy/{id}"),
            min_salary: min,
            max_salary: max,
            ..VacancyRecord::default()
        }
    }

    pub fn backend(policy: UpperBoundPolicy) -> Vacancy {
        Vacancy::from_record(
            VacancyRecord {
                id: "123052790".into(),
                name: "Backend-разработчик (Junior/Middle)".into(),
                url: "https://hh.ru/vacancy/123052790".into(),
                min_salary: RawSalary::Unsigned(80000),
                max_salary: RawSalary::Unsigned(180000),
                employer_name: "Панин Павел Сергеевич".into(),
                employer_url: "https://hh.ru/employer/10044585".into(),
                requirements: "Уверенное знание Python. Опыт веб-разработки".into(),
                area: "Москва".into(),
            },
            policy,
        )
    }

    pub fn qa_engineer(policy: UpperBoundPolicy) -> Vacancy {
        Vacancy::from_record(
            VacancyRecord {
                id: "123754650".into(),
                name: "Тестировщик / QA Engineer".into(),
                url: "https://hh.ru/vacancy/123754650".into(),
                min_salary: RawSalary::Unsigned(110000),
                max_salary: RawSalary::Absent,
                employer_name: "Люмера".into(),
                employer_url: "https://hh.ru/employer/12155707".into(),
                requirements: "Готовность к обучению и командной работе. Опыт работы с Superset"
                    .into(),
                area: "Москва".into(),
            },
            policy,
        )
    }

    pub fn junior_qa(policy: UpperBoundPolicy) -> Vacancy {
        Vacancy::from_record(
            VacancyRecord {
                id: "123752740".into(),
                name: "Junior QA/тестировщик".into(),
                url: "https://hh.ru/vacancy/123752740".into(),
                min_salary: RawSalary::Absent,
                max_salary: RawSalary::Unsigned(80000),
                employer_name: "Your CodeReview".into(),
                employer_url: "https://hh.ru/employer/5962259".into(),
                requirements: "Знание SQL для проверки данных в БД. Опыт работы с Postman".into(),
                area: "Волгоград".into(),
            },
            policy,
        )
    }

    /// The three listings most tests run against, in fetch order.
    pub fn trio(policy: UpperBoundPolicy) -> Vec<Vacancy> {
        vec![backend(policy), qa_engineer(policy), junior_qa(policy)]
    }

    pub fn ids(vacancies: &[Vacancy]) -> Vec<&str> {
        vacancies.iter().map(Vacancy::id).collect()
    }
}
