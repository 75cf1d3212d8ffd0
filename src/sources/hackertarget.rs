// src/sources/hackertarget.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;

const QUOTA_EXCEEDED: &str = "API count exceeded";

/// HackerTarget host search. Plain `host,ip` lines.
#[derive(Debug, Clone)]
pub struct HackerTargetSource {
    base_url: String,
}

impl Default for HackerTargetSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HackerTargetSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://api.hackertarget.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for HackerTargetSource {
    fn name(&self) -> &'static str {
        "hackertarget"
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
        let url = format!("{}/hostsearch/?q={}", self.base_url, domain);
        let text = session.get_text(self.name(), &url).await?;

        // Quota and input errors come back as 200 with a plain-text message.
        if let Some(line) = text.lines().find(|line| line.contains(QUOTA_EXCEEDED)) {
            return Err(SourceError::Rejected(line.trim().to_string()));
        }
        let first_line = text.lines().next().unwrap_or("").trim();
        if first_line.starts_with("error") {
            return Err(SourceError::Rejected(first_line.to_string()));
        }

        emitter.scan(&text).await?;
        Ok(())
    }
}
