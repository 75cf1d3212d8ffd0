// src/sources/commoncrawl.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CrawlIndex {
    id: String,
    #[serde(rename = "cdx-api")]
    cdx_api: String,
}

/// Common Crawl URL index.
///
/// Reads the list of crawl indexes, newest first, then asks each CDX
/// endpoint for captured URLs under `*.domain`. Every index queried counts
/// as one page.
#[derive(Debug, Clone)]
pub struct CommonCrawlSource {
    base_url: String,
    max_pages: usize,
}

impl Default for CommonCrawlSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CommonCrawlSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://index.commoncrawl.org".to_string(),
            max_pages: 10,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    fn query_url(cdx_api: &str, domain: &str) -> String {
        format!("{}?url=*.{}&output=json&fl=url", cdx_api, domain)
    }
}

#[async_trait]
impl Source for CommonCrawlSource {
    fn name(&self) -> &'static str {
        "commoncrawldotorg"
    }

    fn info(&self) -> SourceInfo {
        SourceInfo {
            name: self.name(),
            paginated: true,
        }
    }

    async fn run(
        &self,
        domain: &str,
        session: &Session,
        emitter: &mut Emitter,
    ) -> Result<(), SourceError> {
        let url = format!("{}/collinfo.json", self.base_url);
        let text = session.get_text(self.name(), &url).await?;
        let indexes: Vec<CrawlIndex> = serde_json::from_str(&text)
            .map_err(|e| SourceError::Rejected(format!("unreadable index list: {}", e)))?;

        for index in indexes.iter().take(self.max_pages) {
            emitter.check_cancelled()?;

            let url = Self::query_url(&index.cdx_api, domain);
            let text = match session.get_text(self.name(), &url).await {
                Ok(text) => text,
                // The CDX server answers 404 when an index has no captures.
                Err(SourceError::Protocol { status }) if status == StatusCode::NOT_FOUND => {
                    debug!("[{}] No captures for {} in {}", self.name(), domain, index.id);
                    continue;
                }
                Err(e) => return Err(e),
            };

            let scan = emitter.scan(&text).await?;
            debug!(
                "[{}] {} new of {} matches for {} in {}",
                self.name(),
                scan.new,
                scan.matches,
                domain,
                index.id
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_url() {
        assert_eq!(
            CommonCrawlSource::query_url(
                "https://index.commoncrawl.org/CC-MAIN-2024-10-index",
                "example.com"
            ),
            "https://index.commoncrawl.org/CC-MAIN-2024-10-index?url=*.example.com&output=json&fl=url"
        );
    }

    #[test]
    fn test_index_list_shape() {
        let indexes: Vec<CrawlIndex> = serde_json::from_str(
            r#"[{"id": "CC-MAIN-2024-10", "name": "February/March 2024 Index",
                 "timegate": "https://index.commoncrawl.org/CC-MAIN-2024-10/",
                 "cdx-api": "https://index.commoncrawl.org/CC-MAIN-2024-10-index"}]"#,
        )
        .unwrap();
        assert_eq!(indexes.len(), 1);
        assert_eq!(indexes[0].id, "CC-MAIN-2024-10");
        assert!(indexes[0].cdx_api.ends_with("-index"));
    }
}
