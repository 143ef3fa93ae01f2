//! Application configuration

use jobagg_core::{Error, Result};
use jobagg_hh::HeadHunterConfig;
use jobagg_superjob::SuperJobConfig;
use std::env;
use std::time::Duration;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration for the jobagg binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub superjob_api_key: Option<String>,
    pub hh_api_url: String,
    pub superjob_api_url: String,
    pub http_timeout: Duration,
    pub user_agent: String,
    pub skip_url_check: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            superjob_api_key: None,
            hh_api_url: jobagg_hh::DEFAULT_API_URL.to_string(),
            superjob_api_url: jobagg_superjob::DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            skip_url_check: false,
        }
    }
}

impl AppConfig {
    /// Create configuration from the process environment; `.env` loading is left to the caller
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create configuration from any variable lookup; unset or blank values use defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let superjob_api_key = var("API_SUPERJOB_KEY").or_else(|| var("SUPERJOB_API_KEY"));

        let hh_api_url = match var("HH_API_URL") {
            Some(value) => parse_url("HH_API_URL", &value)?,
            None => defaults.hh_api_url,
        };

        let superjob_api_url = match var("SUPERJOB_API_URL") {
            Some(value) => parse_url("SUPERJOB_API_URL", &value)?,
            None => defaults.superjob_api_url,
        };

        let http_timeout = match var("JOBAGG_HTTP_TIMEOUT_SECS") {
            Some(value) => parse_timeout(&value)?,
            None => defaults.http_timeout,
        };

        let user_agent = var("JOBAGG_USER_AGENT").unwrap_or(defaults.user_agent);

        let skip_url_check = match var("JOBAGG_SKIP_URL_CHECK") {
            Some(value) => parse_flag("JOBAGG_SKIP_URL_CHECK", &value)?,
            None => defaults.skip_url_check,
        };

        Ok(Self {
            superjob_api_key,
            hh_api_url,
            superjob_api_url,
            http_timeout,
            user_agent,
            skip_url_check,
        })
    }

    pub fn headhunter(&self) -> HeadHunterConfig {
        HeadHunterConfig {
            api_url: self.hh_api_url.clone(),
        }
    }

    pub fn superjob(&self) -> SuperJobConfig {
        SuperJobConfig {
            api_url: self.superjob_api_url.clone(),
            api_key: self.superjob_api_key.clone(),
        }
    }
}

fn default_user_agent() -> String {
    format!("jobagg/{}", env!("CARGO_PKG_VERSION"))
}

fn parse_url(name: &str, value: &str) -> Result<String> {
    let value = value.trim();
    Url::parse(value)
        .map(|_| value.to_string())
        .map_err(|e| Error::Configuration(format!("{name} is not a valid url ({value}): {e}")))
}

fn parse_timeout(value: &str) -> Result<Duration> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Configuration(format!(
            "JOBAGG_HTTP_TIMEOUT_SECS must be a positive number of seconds, got {value:?}"
        ))),
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "{name} must be true or false, got {value:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.hh_api_url, "https://api.hh.ru/vacancies");
        assert_eq!(config.superjob_api_url, "https://api.superjob.ru/2.0");
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert!(config.user_agent.starts_with("jobagg/"));
        assert!(!config.skip_url_check);
        assert_eq!(config.superjob_api_key, None);
    }

    #[test]
    fn test_superjob_key_fallback() {
        let config = config_from(&[("SUPERJOB_API_KEY", "fallback")]).unwrap();
        assert_eq!(config.superjob_api_key.as_deref(), Some("fallback"));

        let config = config_from(&[
            ("API_SUPERJOB_KEY", "primary"),
            ("SUPERJOB_API_KEY", "fallback"),
        ])
        .unwrap();
        assert_eq!(config.superjob_api_key.as_deref(), Some("primary"));
        assert_eq!(config.superjob().api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = config_from(&[("API_SUPERJOB_KEY", "  "), ("HH_API_URL", "")]).unwrap();
        assert_eq!(config.superjob_api_key, None);
        assert_eq!(config.headhunter().api_url, jobagg_hh::DEFAULT_API_URL);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HH_API_URL", "http://localhost:8080/vacancies"),
            ("SUPERJOB_API_URL", "http://localhost:8081/2.0"),
            ("JOBAGG_HTTP_TIMEOUT_SECS", "3"),
            ("JOBAGG_USER_AGENT", "tester/1.0"),
            ("JOBAGG_SKIP_URL_CHECK", "yes"),
        ])
        .unwrap();

        assert_eq!(config.headhunter().api_url, "http://localhost:8080/vacancies");
        assert_eq!(config.superjob().api_url, "http://localhost:8081/2.0");
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.user_agent, "tester/1.0");
        assert!(config.skip_url_check);
    }

    #[test]
    fn test_invalid_values() {
        for vars in [
            [("JOBAGG_HTTP_TIMEOUT_SECS", "0")],
            [("JOBAGG_HTTP_TIMEOUT_SECS", "soon")],
            [("JOBAGG_SKIP_URL_CHECK", "maybe")],
            [("HH_API_URL", "not a url")],
        ] {
            let err = config_from(&vars).unwrap_err();
            assert!(
                matches!(err, Error::Configuration(_)),
                "{vars:?} should be rejected"
            );
        }
    }
}
