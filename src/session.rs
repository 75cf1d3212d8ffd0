// src/session.rs
use crate::types::{Config, SourceError, SubzeroError};
use governor::{DefaultDirectRateLimiter, Jitter, Quota, RateLimiter};
use log::debug;
use reqwest::Client;
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport shared by every provider: one connection pool and one
/// rate limiter per throttled source.
#[derive(Clone)]
pub struct Session {
    pub client: Client,
    rate_limiters: Arc<HashMap<String, Arc<DefaultDirectRateLimiter>>>,
}

impl Session {
    pub fn new(config: &Config) -> Result<Self, SubzeroError> {
        let mut client_builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(10);

        if let Some(proxy_url) = &config.proxy {
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| SubzeroError::ConfigError(format!("Invalid proxy URL: {}", e)))?;
            client_builder = client_builder.proxy(proxy);
        }

        let client = client_builder.build()?;

        let rate_limiters: HashMap<String, Arc<DefaultDirectRateLimiter>> = config
            .rate_limits
            .iter()
            .filter_map(|(source, limit)| {
                let per_minute = NonZeroU32::new((*limit)?)?;
                let quota = Quota::per_minute(per_minute).allow_burst(NonZeroU32::MIN);
                Some((source.clone(), Arc::new(RateLimiter::direct(quota))))
            })
            .collect();

        Ok(Session {
            client,
            rate_limiters: Arc::new(rate_limiters),
        })
    }

    pub async fn wait_for_rate_limit(&self, source: &str) {
        if let Some(limiter) = self.rate_limiters.get(source) {
            limiter
                .until_ready_with_jitter(Jitter::up_to(Duration::from_millis(100)))
                .await;
        }
    }

    /// GET `url` on behalf of `source` and return the body. Non-success
    /// statuses become `SourceError::Protocol`.
    pub async fn get_text(&self, source: &str, url: &str) -> Result<String, SourceError> {
        self.wait_for_rate_limit(source).await;
        debug!("[{}] GET {}", source, url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Protocol { status });
        }

        Ok(response.text().await?)
    }
}
