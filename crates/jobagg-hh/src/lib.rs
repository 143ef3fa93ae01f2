//! HeadHunter platform implementation for jobagg

use async_trait::async_trait;
use jobagg_core::platform::{expect_object, int_at, items_from_response, str_at};
use jobagg_core::{
    HttpRequest, HttpTransport, ItemError, JobPlatform, PlatformType, RawSalary, Result,
    UrlChecker, VacancyDraft,
};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};
use tracing::info;

/// Default search endpoint
pub const DEFAULT_API_URL: &str = "https://api.hh.ru/vacancies";

/// Search terms are wrapped in these tags inside snippets
static HIGHLIGHT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?highlighttext>").expect("valid highlight regex"));

/// HeadHunter configuration
#[derive(Debug, Clone)]
pub struct HeadHunterConfig {
    /// Search endpoint
    pub api_url: String,
}

impl Default for HeadHunterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// HeadHunter platform
pub struct HeadHunterPlatform {
    config: HeadHunterConfig,
    transport: Arc<dyn HttpTransport>,
    checker: Arc<dyn UrlChecker>,
}

impl HeadHunterPlatform {
    /// Create a new HeadHunter platform against the public API
    pub fn new(transport: Arc<dyn HttpTransport>, checker: Arc<dyn UrlChecker>) -> Self {
        Self::with_config(HeadHunterConfig::default(), transport, checker)
    }

    /// Create a new HeadHunter platform with configuration
    pub fn with_config(
        config: HeadHunterConfig,
        transport: Arc<dyn HttpTransport>,
        checker: Arc<dyn UrlChecker>,
    ) -> Self {
        Self {
            config,
            transport,
            checker,
        }
    }

    fn search_request(&self, query: &str, limit: usize) -> HttpRequest {
        HttpRequest::get(&self.config.api_url)
            .with_query("text", query)
            .with_query("per_page", limit)
            .with_query("page", 0)
            .with_query("only_with_salary", true)
    }
}

#[async_trait]
impl JobPlatform for HeadHunterPlatform {
    fn platform_type(&self) -> PlatformType {
        PlatformType::HeadHunter
    }

    fn url_checker(&self) -> &dyn UrlChecker {
        self.checker.as_ref()
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        info!(query, limit, "searching HeadHunter");
        let response = self.transport.get(&self.search_request(query, limit)).await?;
        items_from_response(self.platform_type(), response, "items")
    }

    fn extract(&self, item: &Value) -> std::result::Result<VacancyDraft, ItemError> {
        expect_object(item)?;

        let salary = match item.get("salary") {
            None | Some(Value::Null) => None,
            Some(_) => {
                let from = int_at(item, "/salary/from")?;
                let to = int_at(item, "/salary/to")?;
                Some(RawSalary {
                    min: from,
                    max: to.or(from),
                    currency: str_at(item, "/salary/currency")?,
                })
            }
        };

        let publication_date =
            str_at(item, "/published_at")?.map(|published| published.chars().take(10).collect());

        let requirements = str_at(item, "/snippet/requirement")?
            .map(|text| HIGHLIGHT_TAG.replace_all(&text, "").into_owned());

        Ok(VacancyDraft {
            title: str_at(item, "/name")?,
            url: str_at(item, "/url")?,
            salary,
            publication_date,
            requirements,
        })
    }
}
