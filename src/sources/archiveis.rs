// src/sources/archiveis.rs
use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use url::Url;

/// archive.is listing of captured pages, followed through its "next" links.
///
/// Stops when a page has no `id="next"` anchor, when that anchor points
/// back at the current page, or after `max_pages`.
#[derive(Debug, Clone)]
pub struct ArchiveIsSource {
    base_url: String,
    max_pages: usize,
    next_anchor: Regex,
    href: Regex,
}

impl Default for ArchiveIsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveIsSource {
    pub fn new() -> Self {
        Self {
            base_url: "http://archive.is".to_string(),
            max_pages: 10,
            next_anchor: Regex::new(r#"(?i)<a\b[^>]*\bid\s*=\s*["']next["'][^>]*>"#)
                .expect("static regex"),
            href: Regex::new(r#"(?i)\bhref\s*=\s*["']([^"']+)["']"#).expect("static regex"),
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

    /// Absolute URL of the page after `current`, if the page links one.
    fn next_page(&self, current: &Url, html: &str) -> Option<Url> {
        let anchor = self.next_anchor.find(html)?;
        let href = self.href.captures(anchor.as_str())?.get(1)?.as_str();
        let next = current.join(&href.replace("&amp;", "&")).ok()?;
        (next != *current).then_some(next)
    }
}

#[async_trait]
impl Source for ArchiveIsSource {
    fn name(&self) -> &'static str {
        "archiveis"
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
        let first = format!("{}/*.{}", self.base_url, domain);
        let mut page_url = Url::parse(&first)
            .map_err(|e| SourceError::Transport(format!("bad url {}: {}", first, e)))?;

        for page in 0..self.max_pages {
            emitter.check_cancelled()?;

            let html = session.get_text(self.name(), page_url.as_str()).await?;
            emitter.scan(&html).await?;

            match self.next_page(&page_url, &html) {
                Some(next) => page_url = next,
                None => {
                    debug!(
                        "[{}] No next link after page {} for {}",
                        self.name(),
                        page + 1,
                        domain
                    );
                    break;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_relative_and_absolute() {
        let source = ArchiveIsSource::new();
        let current = Url::parse("http://archive.is/*.example.com").unwrap();

        let html = r#"<a href="/offset=100/*.example.com" id="next">&rarr;</a>"#;
        assert_eq!(
            source.next_page(&current, html).unwrap().as_str(),
            "http://archive.is/offset=100/*.example.com"
        );

        let html = r#"<A ID='next' HREF='http://archive.ph/offset=200/*.example.com'>next</A>"#;
        assert_eq!(
            source.next_page(&current, html).unwrap().as_str(),
            "http://archive.ph/offset=200/*.example.com"
        );
    }

    #[test]
    fn test_no_next_page() {
        let source = ArchiveIsSource::new();
        let current = Url::parse("http://archive.is/*.example.com").unwrap();
        assert!(source.next_page(&current, "<a href=\"/prev\" id=\"prev\">").is_none());
        assert!(source
            .next_page(&current, r#"<a id="next" href="/*.example.com">"#)
            .is_none());
    }
}
