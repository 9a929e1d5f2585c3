//! Upstream vacancy payloads as returned by the hh.ru search API.
//!
//! Parsing is lenient: text fields accept numbers and nulls,
//! salary fields accept any JSON shape, a nested block of the wrong shape
//! reads as absent, and a page keeps its items as raw values so one broken
//! item does not sink the whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::salary::{RawSalary, UpperBoundPolicy};
use crate::models::vacancy::{Vacancy, VacancyRecord};

/// One page of search results.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub items: Vec<Value>,

    /// Total number of pages the API reports for the query
    #[serde(default = "default_pages")]
    pub pages: u32,
}

fn default_pages() -> u32 {
    1
}

impl SearchPage {
    /// Decode the items of this page, skipping any that are not vacancy objects.
    pub fn vacancies(&self) -> Vec<RawVacancy> {
        self.items
            .iter()
            .filter_map(|item| match RawVacancy::deserialize(item) {
                Ok(raw) => Some(raw),
                Err(error) => {
                    log::warn!("Skipping malformed vacancy item: {}", error);
                    None
                }
            })
            .collect()
    }
}

/// A single vacancy item as the API shapes it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVacancy {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub alternate_url: String,

    #[serde(default, deserialize_with = "lenient_block")]
    pub salary: Option<RawSalaryBlock>,

    #[serde(default, deserialize_with = "lenient_block")]
    pub employer: Option<RawNamedLink>,

    #[serde(default, deserialize_with = "lenient_block")]
    pub snippet: Option<RawSnippet>,

    #[serde(default, deserialize_with = "lenient_block")]
    pub area: Option<RawNamedLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSalaryBlock {
    #[serde(default)]
    pub from: RawSalary,

    #[serde(default)]
    pub to: RawSalary,

    #[serde(default, deserialize_with = "lenient_text")]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawNamedLink {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_text")]
    pub alternate_url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSnippet {
    #[serde(default, deserialize_with = "lenient_text")]
    pub requirement: String,
}

impl RawVacancy {
    /// Flatten the nested API shape into a storage row.
    pub fn into_record(self) -> VacancyRecord {
        let (min_salary, max_salary) = self
            .salary
            .map(|salary| (salary.from, salary.to))
            .unwrap_or_default();
        let employer = self.employer.unwrap_or_default();

        VacancyRecord {
            id: self.id,
            name: self.name,
            url: self.alternate_url,
            min_salary,
            max_salary,
            employer_name: employer.name,
            employer_url: employer.alternate_url,
            requirements: self.snippet.map(|s| s.requirement).unwrap_or_default(),
            area: self.area.map(|a| a.name).unwrap_or_default(),
        }
    }

    pub fn into_vacancy(self, policy: UpperBoundPolicy) -> Vacancy {
        Vacancy::from_record(self.into_record(), policy)
    }
}

/// Accept strings, numbers and booleans as text; anything else is empty.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

/// Decode a nested object, treating null or a mismatched shape as absent.
fn lenient_block<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(block) => Ok(Some(block)),
        Err(error) => {
            log::debug!("Ignoring malformed nested block: {}", error);
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::salary::{SALARY_UNBOUNDED, SalaryRange};
    use serde_json::json;

    #[test]
    fn test_full_item_maps_every_field() {
        let item = json!({
            "id": "123",
            "name": "Python Developer",
            "alternate_url": "http://example.com/vacancy/123",
            "salary": {"from": 100000, "to": 150000, "currency": "RUR"},
            "employer": {
                "name": "SuperCompany",
                "alternate_url": "http://example.com/employer/1"
            },
            "snippet": {"requirement": "Python, Django"},
            "area": {"name": "Москва"}
        });

        let raw: RawVacancy = serde_json::from_value(item).unwrap();
        assert_eq!(raw.salary.as_ref().unwrap().currency, "RUR");

        let vacancy = raw.into_vacancy(UpperBoundPolicy::Unbounded);
        assert_eq!(vacancy.id(), "123");
        assert_eq!(vacancy.name(), "Python Developer");
        assert_eq!(vacancy.url(), "http://example.com/vacancy/123");
        assert_eq!(vacancy.salary_range(), SalaryRange::new(100000, 150000));
        assert_eq!(vacancy.employer_name(), "SuperCompany");
        assert_eq!(vacancy.employer_url(), "http://example.com/employer/1");
        assert_eq!(vacancy.requirements(), "Python, Django");
        assert_eq!(vacancy.area(), "Москва");
    }

    #[test]
    fn test_sparse_item_uses_defaults() {
        let item = json!({"id": 4, "name": "Go Dev", "salary": null, "snippet": {"requirement": null}});

        let vacancy = RawVacancy::deserialize(&item)
            .unwrap()
            .into_vacancy(UpperBoundPolicy::Unbounded);

        assert_eq!(vacancy.id(), "4");
        assert_eq!(vacancy.salary_range(), SalaryRange::new(0, 0));
        assert_eq!(vacancy.requirements(), "");
        assert_eq!(vacancy.area(), "не указано");
    }

    #[test]
    fn test_salary_from_only() {
        let item = json!({"id": "1", "salary": {"currency": "RUR", "from": 100000}});
        let vacancy = RawVacancy::deserialize(&item)
            .unwrap()
            .into_vacancy(UpperBoundPolicy::Unbounded);
        assert_eq!(
            vacancy.salary_range(),
            SalaryRange::new(100000, SALARY_UNBOUNDED)
        );
    }

    #[test]
    fn test_page_skips_non_object_items() {
        let page: SearchPage = serde_json::from_value(json!({
            "items": [{"id": 1, "name": "Vacancy 1"}, "garbage", 42, {"id": 2}],
            "pages": 3
        }))
        .unwrap();

        let vacancies = page.vacancies();
        assert_eq!(page.pages, 3);
        assert_eq!(vacancies.len(), 2);
        assert_eq!(vacancies[0].name, "Vacancy 1");
        assert_eq!(vacancies[1].id, "2");
    }

    #[test]
    fn test_misshapen_blocks_keep_the_item() {
        let page: SearchPage = serde_json::from_value(json!({
            "items": [
                {"id": "1", "name": "QA", "salary": "договорная", "area": "Москва"},
                {"id": "2", "employer": ["x"], "snippet": 7, "area": {"name": "Казань"}}
            ]
        }))
        .unwrap();

        let vacancies: Vec<_> = page
            .vacancies()
            .into_iter()
            .map(|raw| raw.into_vacancy(UpperBoundPolicy::Unbounded))
            .collect();

        assert_eq!(vacancies.len(), 2);
        assert_eq!(vacancies[0].id(), "1");
        assert_eq!(vacancies[0].salary_range(), SalaryRange::new(0, 0));
        assert_eq!(vacancies[0].area(), "не указано");
        assert_eq!(vacancies[1].employer_name(), "");
        assert_eq!(vacancies[1].requirements(), "");
        assert_eq!(vacancies[1].area(), "Казань");
    }

    #[test]
    fn test_page_defaults_when_keys_missing() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pages, 1);
    }
}
