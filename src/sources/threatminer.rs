// src/sources/threatminer.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ThreatMinerResponse {
    #[serde(default)]
    status_message: String,
    #[serde(default)]
    results: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ThreatMinerSource {
    base_url: String,
}

impl Default for ThreatMinerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreatMinerSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.threatminer.org".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for ThreatMinerSource {
    fn name(&self) -> &'static str {
        "threatminer"
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: self.name(),
            paginated: false,
        }
    }

    async fn run(
        &self,
        domain: &str,
        session: &Session,
        emitter: &mut Emitter,
    ) -> Result<(), SourceError> {
        // rt=5 is the subdomain report.
        let url = format!("{}/v2/domain.php?q={}&rt=5", self.base_url, domain);
        let text = session.get_text(self.name(), &url).await?;

        let response: ThreatMinerResponse = match serde_json::from_str(&text) {
            Ok(response) => response,
            Err(e) => {
                debug!("[{}] Response is not JSON ({}), scanning raw body", self.name(), e);
                emitter.scan(&text).await?;
                return Ok(());
            }
        };

        if response.results.is_empty() {
            debug!("[{}] {}: {}", self.name(), domain, response.status_message);
        }

        for name in &response.results {
            emitter.scan(name).await?;
        }

        Ok(())
    }
}
