//! In-memory operations over a vacancy collection

use crate::vacancy::Vacancy;

/// Most recent first, keeping at most `limit` vacancies when a limit is given
pub fn sort_by_date(mut vacancies: Vec<Vacancy>, limit: Option<usize>) -> Vec<Vacancy> {
    vacancies.sort_by(|a, b| b.publication_date().cmp(&a.publication_date()));
    if let Some(limit) = limit {
        vacancies.truncate(limit);
    }
    vacancies
}

/// Highest average salary first
pub fn sort_by_salary(mut vacancies: Vec<Vacancy>) -> Vec<Vacancy> {
    vacancies.sort_by(|a, b| b.cmp(a));
    vacancies
}

/// Keep vacancies whose requirements contain `keyword`, ignoring case
pub fn filter_by_keyword(vacancies: Vec<Vacancy>, keyword: &str) -> Vec<Vacancy> {
    let keyword = keyword.to_lowercase();
    vacancies
        .into_iter()
        .filter(|v| v.requirements().to_lowercase().contains(&keyword))
        .collect()
}

/// Result of merging incoming vacancies into an existing collection
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub vacancies: Vec<Vacancy>,
    pub added: usize,
    pub duplicates: usize,
}

/// Append every incoming vacancy that is not already present.
///
/// Presence uses vacancy equality, i.e. the average salary, and includes vacancies
/// appended earlier in the same merge.
pub fn merge_unique(
    existing: Vec<Vacancy>,
    incoming: impl IntoIterator<Item = Vacancy>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome {
        vacancies: existing,
        ..MergeOutcome::default()
    };

    for vacancy in incoming {
        if outcome.vacancies.contains(&vacancy) {
            outcome.duplicates += 1;
        } else {
            outcome.vacancies.push(vacancy);
            outcome.added += 1;
        }
    }

    outcome
}
