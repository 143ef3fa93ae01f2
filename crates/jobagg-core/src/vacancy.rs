//! The normalized vacancy record and its validation rules

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

use crate::ValidationError;
use crate::url_check::UrlChecker;

/// Date format accepted for publication dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated salary as it arrives from a platform or a file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSalary {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: Option<String>,
}

impl RawSalary {
    pub fn new(min: i64, max: i64, currency: impl Into<String>) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            currency: Some(currency.into()),
        }
    }
}

/// Validated salary range, always `min <= max`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Salary {
    min: i64,
    max: i64,
    currency: String,
}

impl Salary {
    /// Validate a raw salary. Zero amounts and an empty currency count as missing,
    /// and a reversed range is swapped.
    pub fn validate(raw: Option<RawSalary>) -> Result<Self, ValidationError> {
        let raw = raw.ok_or(ValidationError::MissingSalary)?;

        let min = raw.min.filter(|v| *v != 0);
        let max = raw.max.filter(|v| *v != 0);
        let currency = raw.currency.filter(|c| !c.trim().is_empty());

        match (min, max, currency) {
            (Some(min), Some(max), Some(currency)) => Ok(Self {
                min: min.min(max),
                max: min.max(max),
                currency,
            }),
            (min, max, currency) => {
                let missing: Vec<&str> = [
                    ("min", min.is_none()),
                    ("max", max.is_none()),
                    ("currency", currency.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, absent)| absent.then_some(name))
                .collect();
                Err(ValidationError::IncompleteSalary(format!(
                    "missing {}",
                    missing.join(", ")
                )))
            }
        }
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Midpoint of the range, rounded half to even
    pub fn average(&self) -> i64 {
        let sum = i128::from(self.min) + i128::from(self.max);
        let half = sum.div_euclid(2);
        let rounded = if sum.rem_euclid(2) == 0 || half % 2 == 0 {
            half
        } else {
            half + 1
        };
        rounded as i64
    }
}

/// Unvalidated vacancy fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacancyDraft {
    pub title: Option<String>,
    pub url: Option<String>,
    pub salary: Option<RawSalary>,
    #[serde(rename = "pub_date", alias = "publication_date")]
    pub publication_date: Option<String>,
    pub requirements: Option<String>,
}

/// Plain mapping of the five vacancy fields, as written to disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VacancyRecord {
    pub title: String,
    pub url: String,
    pub salary: Salary,
    #[serde(rename = "pub_date")]
    pub publication_date: String,
    pub requirements: String,
}

impl From<VacancyRecord> for VacancyDraft {
    fn from(record: VacancyRecord) -> Self {
        Self {
            title: Some(record.title),
            url: Some(record.url),
            salary: Some(RawSalary::new(
                record.salary.min,
                record.salary.max,
                record.salary.currency,
            )),
            publication_date: Some(record.publication_date),
            requirements: Some(record.requirements),
        }
    }
}

/// A validated job posting.
///
/// Equality and ordering compare the average salary only: two vacancies with the
/// same salary midpoint are equal whatever their titles or urls.
#[derive(Debug, Clone)]
pub struct Vacancy {
    title: String,
    url: String,
    salary: Salary,
    publication_date: NaiveDate,
    requirements: String,
}

impl Vacancy {
    /// Validate every field and build a vacancy.
    ///
    /// Fields are checked in a fixed order (title, salary, publication date,
    /// requirements, url) and the first failure is returned. The url check runs last
    /// because it goes through `checker`, which may hit the network.
    pub async fn from_draft(
        draft: VacancyDraft,
        checker: &dyn UrlChecker,
    ) -> Result<Self, ValidationError> {
        let title = non_empty(draft.title).ok_or(ValidationError::EmptyTitle)?;
        let salary = Salary::validate(draft.salary)?;
        let publication_date = parse_publication_date(draft.publication_date.as_deref())?;
        let requirements =
            non_empty(draft.requirements).ok_or(ValidationError::EmptyRequirements)?;
        let url = non_empty(draft.url).ok_or(ValidationError::MissingUrl)?;

        checker.check(&url).await?;

        Ok(Self {
            title,
            url,
            salary,
            publication_date,
            requirements,
        })
    }

    /// Build a vacancy from already-known field values
    pub async fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        salary: Option<RawSalary>,
        publication_date: &str,
        requirements: impl Into<String>,
        checker: &dyn UrlChecker,
    ) -> Result<Self, ValidationError> {
        let draft = VacancyDraft {
            title: Some(title.into()),
            url: Some(url.into()),
            salary,
            publication_date: Some(publication_date.to_string()),
            requirements: Some(requirements.into()),
        };
        Self::from_draft(draft, checker).await
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn salary(&self) -> &Salary {
        &self.salary
    }

    pub fn publication_date(&self) -> NaiveDate {
        self.publication_date
    }

    pub fn requirements(&self) -> &str {
        &self.requirements
    }

    pub fn average_salary(&self) -> i64 {
        self.salary.average()
    }

    /// Replace the salary wholesale; the current salary is kept if `raw` is invalid
    pub fn set_salary(&mut self, raw: RawSalary) -> Result<(), ValidationError> {
        self.salary = Salary::validate(Some(raw))?;
        Ok(())
    }

    /// The five input fields, without derived values
    pub fn to_record(&self) -> VacancyRecord {
        VacancyRecord {
            title: self.title.clone(),
            url: self.url.clone(),
            salary: self.salary.clone(),
            publication_date: self.publication_date.format(DATE_FORMAT).to_string(),
            requirements: self.requirements.clone(),
        }
    }
}

impl PartialEq for Vacancy {
    fn eq(&self, other: &Self) -> bool {
        self.average_salary() == other.average_salary()
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
        self.average_salary().cmp(&other.average_salary())
    }
}

impl Serialize for Vacancy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl fmt::Display for Vacancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" from {}, salary {} to {} {}",
            self.title,
            self.publication_date.format(DATE_FORMAT),
            self.salary.min,
            self.salary.max,
            self.salary.currency
        )
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse a `YYYY-MM-DD` date, rejecting anything that does not format back to the input
fn parse_publication_date(value: Option<&str>) -> Result<NaiveDate, ValidationError> {
    let value = value.unwrap_or_default();
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))?;

    if date.format(DATE_FORMAT).to_string() == value {
        Ok(date)
    } else {
        Err(ValidationError::InvalidDate(value.to_string()))
    }
}
