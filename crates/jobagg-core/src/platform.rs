//! Job platform abstraction for multi-platform search

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::batch::{BatchReport, ItemError, normalize_batch};
use crate::transport::HttpResponse;
use crate::url_check::UrlChecker;
use crate::vacancy::{Vacancy, VacancyDraft};
use crate::{Error, Result};

/// Supported job platforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformType {
    /// hh.ru
    HeadHunter,
    /// superjob.ru
    SuperJob,
}

impl PlatformType {
    /// Get the display name for this platform
    pub fn display_name(&self) -> &'static str {
        match self {
            PlatformType::HeadHunter => "HeadHunter",
            PlatformType::SuperJob => "SuperJob",
        }
    }

    /// Key the user types to pick this platform
    pub fn menu_key(&self) -> &'static str {
        match self {
            PlatformType::HeadHunter => "1",
            PlatformType::SuperJob => "2",
        }
    }

    /// Get all supported platforms, in menu order
    pub fn all() -> Vec<PlatformType> {
        vec![PlatformType::HeadHunter, PlatformType::SuperJob]
    }

    /// Parse a menu choice
    pub fn from_choice(choice: &str) -> Option<PlatformType> {
        let choice = choice.trim();
        Self::all().into_iter().find(|p| p.menu_key() == choice)
    }
}

impl std::fmt::Display for PlatformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Trait for platform-specific search and field extraction
#[async_trait]
pub trait JobPlatform: Send + Sync {
    /// Get the platform type
    fn platform_type(&self) -> PlatformType;

    /// Checker applied to every vacancy url this platform returns
    fn url_checker(&self) -> &dyn UrlChecker;

    /// Fetch one page of raw result items
    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>>;

    /// Map one raw item onto the common vacancy fields
    fn extract(&self, item: &Value) -> std::result::Result<VacancyDraft, ItemError>;

    /// Search and report which items were dropped
    async fn search_report(&self, query: &str, limit: usize) -> Result<BatchReport> {
        let items = self.fetch(query, limit).await?;
        let drafts = items.iter().map(|item| self.extract(item)).collect();
        let source = self.platform_type().display_name();

        Ok(normalize_batch(drafts, self.url_checker(), source).await)
    }

    /// Search and keep only the vacancies that passed validation
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Vacancy>> {
        Ok(self.search_report(query, limit).await?.vacancies)
    }
}

/// Pull the result array out of a platform response.
///
/// A non-success status or a non-JSON body fails the whole search; a JSON body
/// without `items_key` yields no items.
pub fn items_from_response(
    platform: PlatformType,
    response: HttpResponse,
    items_key: &str,
) -> Result<Vec<Value>> {
    if !response.is_success() {
        warn!(%platform, status = response.status, "search request failed");
        return Err(Error::Platform {
            platform: platform.display_name().to_string(),
            status: response.status,
            message: truncate(&response.body, 200),
        });
    }

    let mut body: Value = serde_json::from_str(&response.body)?;
    match body.get_mut(items_key).map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) | None => {
            warn!(%platform, items_key, "response has no result items");
            Ok(Vec::new())
        }
        Some(other) => Err(Error::Serialization(format!(
            "{platform} response field {items_key:?} is not an array: {other}"
        ))),
    }
}

/// String at a JSON pointer; `None` when missing or null
pub fn str_at(item: &Value, pointer: &str) -> std::result::Result<Option<String>, ItemError> {
    match item.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ItemError::Malformed(format!(
            "{pointer} should be a string, got {other}"
        ))),
    }
}

/// Integer at a JSON pointer; `None` when missing or null. Whole floats are accepted.
pub fn int_at(item: &Value, pointer: &str) -> std::result::Result<Option<i64>, ItemError> {
    match item.pointer(pointer) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(Some)
            .ok_or_else(|| ItemError::Malformed(format!("{pointer} is not an integer: {n}"))),
        Some(other) => Err(ItemError::Malformed(format!(
            "{pointer} should be a number, got {other}"
        ))),
    }
}

/// Fail with `Malformed` unless the item is a JSON object
pub fn expect_object(item: &Value) -> std::result::Result<(), ItemError> {
    if item.is_object() {
        Ok(())
    } else {
        Err(ItemError::Malformed(format!("expected an object, got {item}")))
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
