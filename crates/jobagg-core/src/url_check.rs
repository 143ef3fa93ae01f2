//! Vacancy url reachability checks

use async_trait::async_trait;
use std::sync::Arc;
use url::Url;

use crate::ValidationError;
use crate::transport::{HttpRequest, HttpTransport};

/// Capability deciding whether a vacancy url is acceptable
#[async_trait]
pub trait UrlChecker: Send + Sync {
    async fn check(&self, url: &str) -> Result<(), ValidationError>;
}

/// Accepts a url only if a GET on it answers with status 200
pub struct HttpUrlChecker {
    transport: Arc<dyn HttpTransport>,
}

impl HttpUrlChecker {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl UrlChecker for HttpUrlChecker {
    async fn check(&self, url: &str) -> Result<(), ValidationError> {
        Url::parse(url).map_err(|e| ValidationError::UrlCheckFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let response = self
            .transport
            .get(&HttpRequest::get(url))
            .await
            .map_err(|e| ValidationError::UrlCheckFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if response.status == 200 {
            Ok(())
        } else {
            Err(ValidationError::UnreachableUrl {
                url: url.to_string(),
                status: response.status,
            })
        }
    }
}

/// Accepts every url without touching the network
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipUrlCheck;

#[async_trait]
impl UrlChecker for SkipUrlCheck {
    async fn check(&self, _url: &str) -> Result<(), ValidationError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpResponse;
    use crate::{Error, Result};

    struct StatusTransport(std::result::Result<u16, String>);

    #[async_trait]
    impl HttpTransport for StatusTransport {
        async fn get(&self, _request: &HttpRequest) -> Result<HttpResponse> {
            match &self.0 {
                Ok(status) => Ok(HttpResponse {
                    status: *status,
                    body: String::new(),
                }),
                Err(message) => Err(Error::Timeout(message.clone())),
            }
        }
    }

    fn checker(outcome: std::result::Result<u16, String>) -> HttpUrlChecker {
        HttpUrlChecker::new(Arc::new(StatusTransport(outcome)))
    }

    #[tokio::test]
    async fn test_status_200_is_reachable() {
        assert!(checker(Ok(200)).check("https://hh.ru/vacancy/1").await.is_ok());
    }

    #[tokio::test]
    async fn test_other_status_is_unreachable() {
        let err = checker(Ok(404))
            .check("https://hh.ru/vacancy/1")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnreachableUrl {
                url: "https://hh.ru/vacancy/1".to_string(),
                status: 404,
            }
        );
    }

    #[tokio::test]
    async fn test_redirect_status_is_not_200() {
        let err = checker(Ok(301)).check("https://hh.ru/vacancy/1").await;
        assert!(matches!(err, Err(ValidationError::UnreachableUrl { status: 301, .. })));
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let err = checker(Err("timed out".to_string()))
            .check("https://hh.ru/vacancy/1")
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationError::UrlCheckFailed { .. }));
    }

    #[tokio::test]
    async fn test_malformed_url_never_hits_transport() {
        let err = checker(Ok(200)).check("not a url").await.unwrap_err();
        assert!(matches!(err, ValidationError::UrlCheckFailed { .. }));
    }

    #[tokio::test]
    async fn test_skip_accepts_anything() {
        assert!(SkipUrlCheck.check("not a url").await.is_ok());
    }
}
