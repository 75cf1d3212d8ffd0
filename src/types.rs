// src/types.rs
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// One provider's single finding or single failure.
///
/// The outcome is a tagged union, so a result that is both a success and a
/// failure (or neither) cannot be built.
#[derive(Debug)]
pub struct SourceResult {
    source: &'static str,
    outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Success(String),
    Failure(SourceError),
}

impl SourceResult {
    pub fn success(source: &'static str, value: impl Into<String>) -> Self {
        Self {
            source,
            outcome: Outcome::Success(value.into()),
        }
    }

    pub fn failure(source: &'static str, error: SourceError) -> Self {
        Self {
            source,
            outcome: Outcome::Failure(error),
        }
    }

    /// Tag of the provider that produced this result.
    pub fn source(&self) -> &'static str {
        self.source
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failure(_))
    }

    pub fn value(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SourceError> {
        match &self.outcome {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }
}

impl fmt::Display for SourceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Success(value) => write!(f, "{} {}", self.source, value),
            Outcome::Failure(error) => write!(f, "{} {}", self.source, error),
        }
    }
}

/// Errors a provider can hit while processing one domain. Each one ends
/// that provider's stream with a single failure result.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid root domain: {0}")]
    Construction(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response status: {status}")]
    Protocol { status: StatusCode },

    #[error("request rejected: {0}")]
    Rejected(String),

    /// The output stream was dropped by its consumer, or the run was
    /// cancelled. Never surfaced as a failure result.
    #[error("enumeration abandoned")]
    Abandoned,
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if !status.is_success() => SourceError::Protocol { status },
            _ => SourceError::Transport(err.to_string()),
        }
    }
}

/// Process-level errors: configuration, command line, registry setup.
#[derive(Debug, Error)]
pub enum SubzeroError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub timeout: Duration,
    pub user_agent: String,
    pub proxy: Option<String>,
    /// Requests per minute allowed for each named source.
    pub rate_limits: HashMap<String, Option<u32>>,
    /// Maximum number of providers running at once, across all enumerations
    /// sharing one engine.
    pub concurrency: usize,
    /// Hard page cap for paginated providers.
    pub max_pages: usize,
    /// Output stream slack per registered provider.
    pub buffer_factor: usize,
    pub deadline: Option<Duration>,
    pub sources: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut rate_limits = HashMap::new();
        rate_limits.insert("hackertarget".to_string(), Some(30));
        rate_limits.insert("threatminer".to_string(), Some(10));
        rate_limits.insert("dogpile".to_string(), Some(60));
        rate_limits.insert("archiveis".to_string(), Some(30));
        rate_limits.insert("commoncrawldotorg".to_string(), Some(30));

        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("subzero/{}", env!("CARGO_PKG_VERSION")),
            proxy: None,
            rate_limits,
            concurrency: 16,
            max_pages: 10,
            buffer_factor: 4,
            deadline: None,
            sources: crate::sources::ALL_SOURCES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

pub struct SourceInfo {
    pub name: &'static str,
    pub paginated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_not_failure() {
        let result = SourceResult::success("crtsh", "www.example.com");
        assert!(result.is_success());
        assert!(!result.is_failure());
        assert_eq!(result.value(), Some("www.example.com"));
        assert!(result.error().is_none());
        assert_eq!(result.to_string(), "crtsh www.example.com");
    }

    #[test]
    fn test_failure_is_not_success() {
        let result = SourceResult::failure(
            "riddler",
            SourceError::Protocol {
                status: StatusCode::SERVICE_UNAVAILABLE,
            },
        );
        assert!(result.is_failure());
        assert!(!result.is_success());
        assert!(result.value().is_none());
        assert_eq!(
            result.to_string(),
            "riddler unexpected response status: 503 Service Unavailable"
        );
    }

    #[test]
    fn test_default_config_enables_every_source() {
        let config = Config::default();
        assert_eq!(config.sources.len(), crate::sources::ALL_SOURCES.len());
        assert_eq!(config.buffer_factor, 4);
        assert!(config.max_pages > 0);
    }
}
