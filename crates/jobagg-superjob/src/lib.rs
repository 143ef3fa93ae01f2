//! SuperJob platform implementation for jobagg

use async_trait::async_trait;
use chrono::DateTime;
use jobagg_core::platform::{expect_object, int_at, items_from_response, str_at};
use jobagg_core::vacancy::DATE_FORMAT;
use jobagg_core::{
    HttpRequest, HttpTransport, ItemError, JobPlatform, PlatformType, RawSalary, Result,
    UrlChecker, VacancyDraft,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Default API base
pub const DEFAULT_API_URL: &str = "https://api.superjob.ru/2.0";

/// Header carrying the application key
pub const API_KEY_HEADER: &str = "X-Api-App-Id";

/// SuperJob configuration
#[derive(Debug, Clone)]
pub struct SuperJobConfig {
    /// API base, the search endpoint is `{api_url}/vacancies/`
    pub api_url: String,
    /// Application key sent as `X-Api-App-Id`
    pub api_key: Option<String>,
}

impl Default for SuperJobConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
        }
    }
}

/// SuperJob platform
pub struct SuperJobPlatform {
    config: SuperJobConfig,
    transport: Arc<dyn HttpTransport>,
    checker: Arc<dyn UrlChecker>,
}

impl SuperJobPlatform {
    /// Create a new SuperJob platform with configuration
    pub fn with_config(
        config: SuperJobConfig,
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
        let url = format!("{}/vacancies/", self.config.api_url.trim_end_matches('/'));
        let request = HttpRequest::get(url)
            .with_query("keyword", query)
            .with_query("count", limit);

        match &self.config.api_key {
            Some(key) => request.with_header(API_KEY_HEADER, key.clone()),
            None => request,
        }
    }
}

#[async_trait]
impl JobPlatform for SuperJobPlatform {
    fn platform_type(&self) -> PlatformType {
        PlatformType::SuperJob
    }

    fn url_checker(&self) -> &dyn UrlChecker {
        self.checker.as_ref()
    }

    async fn fetch(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        if self.config.api_key.is_none() {
            warn!("no SuperJob API key configured, the request will be rejected");
        }
        info!(query, limit, "searching SuperJob");
        let response = self.transport.get(&self.search_request(query, limit)).await?;
        items_from_response(self.platform_type(), response, "objects")
    }

    fn extract(&self, item: &Value) -> std::result::Result<VacancyDraft, ItemError> {
        expect_object(item)?;

        let min = int_at(item, "/payment_from")?.unwrap_or(0);
        let max = match int_at(item, "/payment_to")? {
            None | Some(0) => min,
            Some(to) => to,
        };

        let publication_date = int_at(item, "/date_published")?
            .map(|timestamp| {
                DateTime::from_timestamp(timestamp, 0)
                    .map(|published| published.date_naive().format(DATE_FORMAT).to_string())
                    .ok_or_else(|| {
                        ItemError::Malformed(format!("date_published {timestamp} is out of range"))
                    })
            })
            .transpose()?;

        Ok(VacancyDraft {
            title: str_at(item, "/profession")?,
            url: str_at(item, "/link")?,
            salary: Some(RawSalary {
                min: Some(min),
                max: Some(max),
                currency: str_at(item, "/currency")?,
            }),
            publication_date,
            requirements: str_at(item, "/candidat")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobagg_core::{Error, HttpResponse, SkipUrlCheck, ValidationError};
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeTransport {
        response: HttpResponse,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl FakeTransport {
        fn new(status: u16, body: Value) -> Arc<Self> {
            Arc::new(Self {
                response: HttpResponse {
                    status,
                    body: body.to_string(),
                },
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn platform(transport: Arc<FakeTransport>, api_key: Option<&str>) -> SuperJobPlatform {
        let config = SuperJobConfig {
            api_key: api_key.map(str::to_string),
            ..SuperJobConfig::default()
        };
        SuperJobPlatform::with_config(config, transport, Arc::new(SkipUrlCheck))
    }

    fn sample_response() -> Value {
        json!({
            "total": 4,
            "more": false,
            "objects": [
                {
                    "id": 101,
                    "profession": "Backend developer (Rust)",
                    "link": "https://www.superjob.ru/vakansii/backend-101.html",
                    "payment_from": 120000,
                    "payment_to": 180000,
                    "currency": "rub",
                    "date_published": 1705312800,
                    "candidat": "Rust, PostgreSQL, Docker"
                },
                {
                    "id": 102,
                    "profession": "Разработчик",
                    "link": "https://www.superjob.ru/vakansii/dev-102.html",
                    "payment_from": 90000,
                    "payment_to": 0,
                    "currency": "rub",
                    "date_published": 1705226400,
                    "candidat": "Опыт работы с Rust"
                },
                {
                    "id": 103,
                    "profession": "Salary on request",
                    "link": "https://www.superjob.ru/vakansii/103.html",
                    "payment_from": 0,
                    "payment_to": 0,
                    "currency": "rub",
                    "date_published": 1705140000,
                    "candidat": "Rust"
                },
                {
                    "id": 104,
                    "profession": "Broken",
                    "link": "https://www.superjob.ru/vakansii/104.html",
                    "payment_from": 100,
                    "currency": "rub",
                    "date_published": "yesterday",
                    "candidat": "Rust"
                }
            ]
        })
    }

    #[tokio::test]
    async fn test_search_request_parameters() {
        let transport = FakeTransport::new(200, json!({"objects": []}));
        let superjob = platform(transport.clone(), Some("v3.r.secret"));

        superjob.search("rust", 7).await.unwrap();

        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].url, "https://api.superjob.ru/2.0/vacancies/");
        assert_eq!(
            requests[0].query,
            vec![
                ("keyword".to_string(), "rust".to_string()),
                ("count".to_string(), "7".to_string()),
            ]
        );
        assert_eq!(
            requests[0].headers,
            vec![(API_KEY_HEADER.to_string(), "v3.r.secret".to_string())]
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_sends_no_header() {
        let transport = FakeTransport::new(200, json!({"objects": []}));
        let superjob = platform(transport.clone(), None);

        superjob.search("rust", 7).await.unwrap();

        assert!(transport.requests.lock().unwrap()[0].headers.is_empty());
    }

    #[tokio::test]
    async fn test_search_maps_fields_and_drops_bad_items() {
        let superjob = platform(FakeTransport::new(200, sample_response()), Some("key"));

        let report = superjob.search_report("rust", 4).await.unwrap();

        assert_eq!(report.vacancies.len(), 2);
        let first = &report.vacancies[0];
        assert_eq!(first.title(), "Backend developer (Rust)");
        assert_eq!(first.url(), "https://www.superjob.ru/vakansii/backend-101.html");
        assert_eq!(first.salary().min(), 120_000);
        assert_eq!(first.salary().max(), 180_000);
        assert_eq!(first.salary().currency(), "rub");
        assert_eq!(first.publication_date().to_string(), "2024-01-15");
        assert_eq!(first.requirements(), "Rust, PostgreSQL, Docker");

        let second = &report.vacancies[1];
        assert_eq!(second.title(), "Разработчик");
        assert_eq!(second.salary().min(), 90_000);
        assert_eq!(second.salary().max(), 90_000);
        assert_eq!(second.publication_date().to_string(), "2024-01-14");

        assert_eq!(report.rejected.len(), 2);
        assert!(matches!(
            report.rejected[0].error,
            ItemError::Invalid(ValidationError::IncompleteSalary(_))
        ));
        assert!(matches!(report.rejected[1].error, ItemError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_auth_error_fails_search() {
        let superjob = platform(
            FakeTransport::new(
                403,
                json!({"error": {"code": 403, "message": "Invalid app_id"}}),
            ),
            None,
        );

        let err = superjob.search("rust", 5).await.unwrap_err();
        assert!(matches!(err, Error::Platform { status: 403, .. }));
    }

    #[test]
    fn test_absent_payment_from_is_zero() {
        let superjob = platform(FakeTransport::new(200, json!({})), None);
        let draft = superjob
            .extract(&json!({"payment_to": 5000, "currency": "rub"}))
            .unwrap();
        let salary = draft.salary.unwrap();
        assert_eq!(salary.min, Some(0));
        assert_eq!(salary.max, Some(5000));
    }

    #[test]
    fn test_trailing_slash_in_api_url() {
        let config = SuperJobConfig {
            api_url: "http://localhost:9000/2.0/".to_string(),
            api_key: None,
        };
        let superjob = SuperJobPlatform::with_config(
            config,
            FakeTransport::new(200, json!({})),
            Arc::new(SkipUrlCheck),
        );
        assert_eq!(
            superjob.search_request("rust", 1).url,
            "http://localhost:9000/2.0/vacancies/"
        );
    }
}
