//! JSON file persistence for vacancy collections
//!
//! A collection is stored as a pretty-printed JSON array of vacancy records. Saving
//! merges into whatever the destination already holds, and loading rebuilds every
//! entry through the validating constructor.

use jobagg_core::{
    BatchReport, Error, ItemError, Result, UrlChecker, Vacancy, VacancyDraft, VacancyRecord,
    merge_unique, normalize_batch,
};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tempfile::Builder;
use tracing::{info, warn};

/// What a save did to the destination file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    /// Vacancies in the file after the save
    pub written: usize,
    /// Vacancies from this save that were appended
    pub added: usize,
    /// Vacancies from this save skipped because an equal one was already present
    pub duplicates: usize,
    /// Stored entries that no longer validate and were left out of the rewrite
    pub dropped_existing: usize,
}

/// Stores vacancy collections as JSON files
pub struct JsonFileStore {
    checker: Arc<dyn UrlChecker>,
}

impl JsonFileStore {
    /// Create a store that validates loaded urls with `checker`
    pub fn new(checker: Arc<dyn UrlChecker>) -> Self {
        Self { checker }
    }

    /// Merge `vacancies` into the file at `destination`, creating it if needed
    pub async fn save(&self, vacancies: &[Vacancy], destination: &Path) -> Result<SaveReport> {
        let (collection, report) = match self.load(destination).await {
            Ok(existing) => {
                let dropped_existing = existing.rejected.len();
                if dropped_existing > 0 {
                    warn!(
                        path = %destination.display(),
                        dropped = dropped_existing,
                        "stored entries failed validation and will not be rewritten"
                    );
                }
                let merged = merge_unique(existing.vacancies, vacancies.iter().cloned());
                let report = SaveReport {
                    written: merged.vacancies.len(),
                    added: merged.added,
                    duplicates: merged.duplicates,
                    dropped_existing,
                };
                (merged.vacancies, report)
            }
            Err(Error::NotFound(_)) => {
                let report = SaveReport {
                    written: vacancies.len(),
                    added: vacancies.len(),
                    ..SaveReport::default()
                };
                (vacancies.to_vec(), report)
            }
            Err(err) => return Err(err),
        };

        write_atomically(&collection, destination).await?;
        info!(
            path = %destination.display(),
            written = report.written,
            added = report.added,
            duplicates = report.duplicates,
            "saved vacancies"
        );

        Ok(report)
    }

    /// Read the collection stored at `source`, skipping entries that fail validation
    pub async fn load(&self, source: &Path) -> Result<BatchReport> {
        let content = match tokio::fs::read_to_string(source).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(Error::NotFound(source.to_path_buf()));
            }
            Err(err) => return Err(err.into()),
        };

        let entries = match serde_json::from_str::<Value>(&content)? {
            Value::Array(entries) => entries,
            other => {
                return Err(Error::Serialization(format!(
                    "{} does not hold a JSON array of vacancies, found {}",
                    source.display(),
                    kind_of(&other)
                )));
            }
        };

        let drafts = entries
            .into_iter()
            .map(|entry| {
                serde_json::from_value::<VacancyDraft>(entry)
                    .map_err(|err| ItemError::Malformed(err.to_string()))
            })
            .collect();

        let source_name = source.display().to_string();
        let report = normalize_batch(drafts, self.checker.as_ref(), &source_name).await;
        info!(
            path = %source.display(),
            loaded = report.vacancies.len(),
            skipped = report.rejected.len(),
            "loaded vacancies"
        );

        Ok(report)
    }
}

/// Write to a temporary file next to `destination`, then rename it into place.
///
/// The result keeps the permissions of the file it replaces; a new file gets the
/// same mode a plain create would give it.
async fn write_atomically(vacancies: &[Vacancy], destination: &Path) -> Result<()> {
    let records: Vec<VacancyRecord> = vacancies.iter().map(Vacancy::to_record).collect();
    let json = serde_json::to_string_pretty(&records)?;

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let existing_permissions = match tokio::fs::metadata(destination).await {
        Ok(metadata) => Some(metadata.permissions()),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => return Err(err.into()),
    };

    let temp_path = temp_file_builder().tempfile_in(dir)?.into_temp_path();
    tokio::fs::write(&temp_path, json).await?;
    if let Some(permissions) = existing_permissions {
        tokio::fs::set_permissions(&temp_path, permissions).await?;
    }
    temp_path
        .persist(destination)
        .map_err(|err| Error::Io(err.error))?;

    Ok(())
}

/// Temp files are created with the umask-filtered default mode instead of 0600
fn temp_file_builder() -> Builder<'static, 'static> {
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    builder
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
