// src/sources/scrapers.rs
// Single-request sources whose whole response body is scanned as text.

use crate::session::Session;
use crate::sources::{Emitter, Source};
use crate::types::{SourceError, SourceInfo};
use async_trait::async_trait;

macro_rules! text_source {
    ($(#[$meta:meta])* $name:ident, $tag:expr, $base_url:expr, $url:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name {
            base_url: String,
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self {
                    base_url: $base_url.to_string(),
                }
            }

            pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
                self.base_url = base_url.into();
                self
            }

            fn url(&self, domain: &str) -> String {
                let build: fn(&str, &str) -> String = $url;
                build(&self.base_url, domain)
            }
        }

        #[async_trait]
        impl Source for $name {
            fn name(&self) -> &'static str {
                $tag
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
                let text = session.get_text(self.name(), &self.url(domain)).await?;
                emitter.scan(&text).await?;
                Ok(())
            }
        }
    };
}

text_source!(
    /// dnsdb.org forward listing.
    DnsDbSource,
    "dnsdbdotcom",
    "http://www.dnsdb.org",
    |base, domain| format!("{}/f/{}.dnsdb.org/", base, domain)
);

text_source!(
    /// Riddler CSV export for a pay-level domain.
    RiddlerSource,
    "riddler",
    "https://riddler.io",
    |base, domain| format!("{}/search/exportcsv?q=pld:{}", base, domain)
);

text_source!(
    /// Wayback Machine CDX index of archived URLs.
    WaybackArchiveSource,
    "waybackarchive",
    "http://web.archive.org",
    |base, domain| {
        format!(
            "{}/cdx/search/cdx?url=*.{}/*&output=txt&fl=original&collapse=urlkey",
            base, domain
        )
    }
);
