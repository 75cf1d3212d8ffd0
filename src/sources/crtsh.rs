// src/sources/crtsh.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CrtShEntry {
    name_value: String,
}

/// CRT.sh certificate transparency logs source
#[derive(Debug, Clone)]
pub struct CrtShSource {
    base_url: String,
}

impl Default for CrtShSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CrtShSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://crt.sh".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl Source for CrtShSource {
    fn name(&self) -> &'static str {
        "crtsh"
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
        let url = format!("{}/?q=%25.{}&output=json", self.base_url, domain);
        let text = session.get_text(self.name(), &url).await?;

        let entries: Vec<CrtShEntry> = match serde_json::from_str(&text) {
            Ok(entries) => entries,
            Err(e) => {
                debug!("[{}] Response is not JSON ({}), scanning raw body", self.name(), e);
                emitter.scan(&text).await?;
                return Ok(());
            }
        };

        // name_value holds one name per line; wildcards are dropped by the
        // extractor.
        for entry in entries {
            emitter.scan(&entry.name_value).await?;
        }

        Ok(())
    }
}
