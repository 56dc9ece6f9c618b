use axum::http::{HeaderValue, Method, header};
use core_config::{ConfigError, FromEnv, env_or_default};
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

const CORS_ENV: &str = "CORS_ALLOWED_ORIGIN";

/// Browser origins allowed to call the API.
///
/// Loaded from `CORS_ALLOWED_ORIGIN`, a comma-separated list
/// (default `http://localhost:3000`). An explicitly empty value disables CORS.
#[derive(Clone, Debug, Default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<HeaderValue>,
}

impl CorsConfig {
    pub fn new<I, S>(origins: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed_origins = origins
            .into_iter()
            .map(|origin| origin.as_ref().trim().to_owned())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| ConfigError::ParseError {
                    key: CORS_ENV.to_string(),
                    details: format!("{origin}: {e}"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { allowed_origins })
    }

    /// `None` when no origin is allowed.
    pub fn layer(&self) -> Option<CorsLayer> {
        if self.allowed_origins.is_empty() {
            return None;
        }

        let layer = CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed_origins.clone()))
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .max_age(Duration::from_secs(3600));

        Some(layer)
    }
}

impl FromEnv for CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default(CORS_ENV, "http://localhost:3000");
        Self::new(raw.split(','))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_comma_separated_origins() {
        temp_env::with_var(
            CORS_ENV,
            Some("http://localhost:3000, https://example.com"),
            || {
                let config = CorsConfig::from_env().unwrap();
                assert_eq!(config.allowed_origins.len(), 2);
                assert_eq!(config.allowed_origins[1], "https://example.com");
                assert!(config.layer().is_some());
            },
        );
    }

    #[test]
    fn test_default_origin() {
        temp_env::with_var_unset(CORS_ENV, || {
            let config = CorsConfig::from_env().unwrap();
            assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        });
    }

    #[test]
    fn test_empty_value_disables_cors() {
        temp_env::with_var(CORS_ENV, Some(""), || {
            let config = CorsConfig::from_env().unwrap();
            assert!(config.layer().is_none());
        });
    }

    #[test]
    fn test_invalid_origin() {
        let err = CorsConfig::new(["http://ok.com", "bad\norigin"]).unwrap_err();
        assert!(err.to_string().contains(CORS_ENV));
    }
}
