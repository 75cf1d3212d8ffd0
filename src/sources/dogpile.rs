// src/sources/dogpile.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;

/// Results per DogPile page; `qsi` is the 1-based offset of the first one.
const PAGE_STRIDE: usize = 15;

/// DogPile web search, scraped page by page.
///
/// Stops on the first page that adds nothing new, or after `max_pages`.
#[derive(Debug, Clone)]
pub struct DogPileSource {
    base_url: String,
    max_pages: usize,
}

impl Default for DogPileSource {
    fn default() -> Self {
        Self::new()
    }
}

impl DogPileSource {
    pub fn new() -> Self {
        Self {
            base_url: "https://www.dogpile.com".to_string(),
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

    fn page_url(&self, domain: &str, page: usize) -> String {
        format!(
            "{}/search/web?q={}&qsi={}",
            self.base_url,
            urlencoding::encode(domain),
            page * PAGE_STRIDE + 1
        )
    }
}

#[async_trait]
impl Source for DogPileSource {
    fn name(&self) -> &'static str {
        "dogpile"
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
        for page in 0..self.max_pages {
            emitter.check_cancelled()?;

            let text = session.get_text(self.name(), &self.page_url(domain, page)).await?;
            let scan = emitter.scan(&text).await?;

            if scan.new == 0 {
                debug!(
                    "[{}] Page {} for {} added nothing new, stopping",
                    self.name(),
                    page + 1,
                    domain
                );
                break;
            }
        }

        Ok(())
    }
}
