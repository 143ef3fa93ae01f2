//! Normalizing batches of drafts into vacancies without letting one item sink the batch

use thiserror::Error;
use tracing::{debug, info};

use crate::ValidationError;
use crate::url_check::UrlChecker;
use crate::vacancy::{Vacancy, VacancyDraft};

/// Why a single item of a batch was dropped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// The item did not have the expected structure
    #[error("malformed item: {0}")]
    Malformed(String),

    /// The item was well-formed but failed vacancy validation
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A dropped item and its position in the batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub index: usize,
    pub error: ItemError,
}

/// Vacancies that survived normalization, plus what was dropped
#[derive(Debug, Default)]
pub struct BatchReport {
    pub vacancies: Vec<Vacancy>,
    pub rejected: Vec<Rejection>,
}

impl BatchReport {
    pub fn malformed_count(&self) -> usize {
        self.rejected
            .iter()
            .filter(|r| matches!(r.error, ItemError::Malformed(_)))
            .count()
    }

    pub fn invalid_count(&self) -> usize {
        self.rejected.len() - self.malformed_count()
    }
}

/// Validate every draft in order, keeping the ones that pass
pub async fn normalize_batch(
    drafts: Vec<Result<VacancyDraft, ItemError>>,
    checker: &dyn UrlChecker,
    source: &str,
) -> BatchReport {
    let mut report = BatchReport::default();

    for (index, draft) in drafts.into_iter().enumerate() {
        let outcome = match draft {
            Ok(draft) => Vacancy::from_draft(draft, checker)
                .await
                .map_err(ItemError::from),
            Err(err) => Err(err),
        };

        match outcome {
            Ok(vacancy) => report.vacancies.push(vacancy),
            Err(error) => {
                debug!(source, index, %error, "dropping item");
                report.rejected.push(Rejection { index, error });
            }
        }
    }

    info!(
        source,
        accepted = report.vacancies.len(),
        malformed = report.malformed_count(),
        invalid = report.invalid_count(),
        "normalized batch"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::url_check::SkipUrlCheck;
    use crate::vacancy::RawSalary;

    fn draft(title: &str, min: i64) -> VacancyDraft {
        VacancyDraft {
            title: Some(title.to_string()),
            url: Some("https://hh.ru/vacancy/1".to_string()),
            salary: Some(RawSalary::new(min, min, "RUR")),
            publication_date: Some("2024-01-15".to_string()),
            requirements: Some("Rust".to_string()),
        }
    }

    #[tokio::test]
    async fn test_bad_items_do_not_abort_batch() {
        let drafts = vec![
            Ok(draft("first", 100)),
            Err(ItemError::Malformed("not an object".to_string())),
            Ok(draft("", 200)),
            Ok(draft("last", 300)),
        ];

        let report = normalize_batch(drafts, &SkipUrlCheck, "test").await;

        let titles: Vec<&str> = report.vacancies.iter().map(|v| v.title()).collect();
        assert_eq!(titles, vec!["first", "last"]);
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.malformed_count(), 1);
        assert_eq!(report.invalid_count(), 1);
        assert_eq!(
            report.rejected[1],
            Rejection {
                index: 2,
                error: ItemError::Invalid(ValidationError::EmptyTitle),
            }
        );
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let report = normalize_batch(Vec::new(), &SkipUrlCheck, "test").await;
        assert!(report.vacancies.is_empty());
        assert!(report.rejected.is_empty());
    }
}
