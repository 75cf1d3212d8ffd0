// src/sources/certspotter.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Issuance {
    #[serde(default)]
    dns_names: Vec<String>,
}

/// Cert Spotter issuance search.
#[derive(Debug, Clone)]
pub struct CertSpotterSource {
    base_url: String,
}

impl Default for CertSpotterSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CertSpotterSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.certspotter.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for CertSpotterSource {
    fn name(&self) -> &'static str {
        "certspotter"
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
        let url = format!(
            "{}/v1/issuances?domain={}&include_subdomains=true&expand=dns_names",
            self.base_url, domain
        );
        let text = session.get_text(self.name(), &url).await?;

        let issuances: Vec<Issuance> = match serde_json::from_str(&text) {
            Ok(issuances) => issuances,
            Err(e) => {
                debug!("[{}] Response is not JSON ({}), scanning raw body", self.name(), e);
                emitter.scan(&text).await?;
                return Ok(());
            }
        };

        for name in issuances.iter().flat_map(|issuance| &issuance.dns_names) {
            emitter.scan(name).await?;
        }

        Ok(())
    }
}
