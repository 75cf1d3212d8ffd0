// src/sources/mod.rs
use crate::cancel::CancelSignal;
use crate::extractor::SubdomainExtractor;
use crate::session::Session;
use crate::types::{Config, SourceError, SourceInfo, SourceResult, SubzeroError};
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

mod archiveis;
mod certspotter;
mod commoncrawl;
mod crtsh;
mod dogpile;
mod emitter;
mod hackertarget;
mod scrapers;
mod threatminer;

pub use archiveis::ArchiveIsSource;
pub use certspotter::CertSpotterSource;
pub use commoncrawl::CommonCrawlSource;
pub use crtsh::CrtShSource;
pub use dogpile::DogPileSource;
pub use emitter::{Emitter, PageScan};
pub use hackertarget::HackerTargetSource;
pub use scrapers::{DnsDbSource, RiddlerSource, WaybackArchiveSource};
pub use threatminer::ThreatMinerSource;

/// Stream of results for one provider run or one whole enumeration. Closed
/// once every producer behind it has finished.
pub type ResultStream = mpsc::Receiver<SourceResult>;

/// Slack on each provider's own stream.
const SOURCE_BUFFER: usize = 16;

pub const ALL_SOURCES: &[&str] = &[
    "archiveis",
    "certspotter",
    "commoncrawldotorg",
    "crtsh",
    "dnsdbdotcom",
    "dogpile",
    "hackertarget",
    "riddler",
    "threatminer",
    "waybackarchive",
];

/// One place to look for subdomains.
///
/// Implementations only fetch and hand text to the `Emitter`; extraction,
/// dedup and stream lifetime are handled by `process_domain`.
#[async_trait]
pub trait Source: Send + Sync {
    fn name(&self) -> &'static str;

    fn info(&self) -> SourceInfo;

    /// Fetch everything this source knows about `domain` and scan it
    /// through `emitter`. An `Err` ends the run with one failure result.
    async fn run(
        &self,
        domain: &str,
        session: &Session,
        emitter: &mut Emitter,
    ) -> Result<(), SourceError>;
}

/// Start `source` on `domain` and return its stream.
///
/// The root domain is validated before any request is made. The stream
/// carries every first-seen value, then at most one failure, then closes.
/// Cancellation closes it without a failure.
pub fn process_domain(
    source: Arc<dyn Source>,
    domain: &str,
    session: Session,
    cancel: CancelSignal,
) -> ResultStream {
    let (tx, rx) = mpsc::channel(SOURCE_BUFFER);
    let domain = domain.to_string();

    tokio::spawn(async move {
        let name = source.name();

        let extractor = match SubdomainExtractor::new(&domain) {
            Ok(extractor) => extractor,
            Err(e) => {
                debug!("[{}] {}", name, e);
                let _ = tx.send(SourceResult::failure(name, e)).await;
                return;
            }
        };

        let root = extractor.root().to_string();
        let mut emitter = Emitter::new(name, extractor, tx, cancel.clone());
        let start = Instant::now();

        let outcome = tokio::select! {
            outcome = source.run(&root, &session, &mut emitter) => outcome,
            _ = cancel.cancelled() => Err(SourceError::Abandoned),
        };

        match outcome {
            Ok(()) => {
                info!(
                    "[{}] Found {} subdomains for {} in {:?}",
                    name,
                    emitter.emitted(),
                    root,
                    start.elapsed()
                );
            }
            Err(SourceError::Abandoned) => {
                debug!("[{}] Stopped early for {}", name, root);
            }
            Err(e) => {
                warn!("[{}] Failed to enumerate {}: {}", name, root, e);
                emitter.fail(e).await;
            }
        }
    });

    rx
}

pub fn create_source(name: &str, config: &Config) -> Option<Arc<dyn Source>> {
    let source: Arc<dyn Source> = match name.to_lowercase().as_str() {
        "archiveis" => Arc::new(ArchiveIsSource::new().with_max_pages(config.max_pages)),
        "certspotter" => Arc::new(CertSpotterSource::new()),
        "commoncrawldotorg" => {
            Arc::new(CommonCrawlSource::new().with_max_pages(config.max_pages))
        }
        "crtsh" => Arc::new(CrtShSource::new()),
        "dnsdbdotcom" => Arc::new(DnsDbSource::new()),
        "dogpile" => Arc::new(DogPileSource::new().with_max_pages(config.max_pages)),
        "hackertarget" => Arc::new(HackerTargetSource::new()),
        "riddler" => Arc::new(RiddlerSource::new()),
        "threatminer" => Arc::new(ThreatMinerSource::new()),
        "waybackarchive" => Arc::new(WaybackArchiveSource::new()),
        _ => return None,
    };
    Some(source)
}

/// Ordered, fixed set of providers an enumeration fans out to.
#[derive(Clone)]
pub struct SourceRegistry {
    sources: Arc<[Arc<dyn Source>]>,
}

impl SourceRegistry {
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self {
            sources: sources.into(),
        }
    }

    /// Build the sources named in `config.sources`, skipping unknown names.
    pub fn from_config(config: &Config) -> Result<Self, SubzeroError> {
        Self::from_names(&config.sources, config)
    }

    pub fn from_names<S: AsRef<str>>(names: &[S], config: &Config) -> Result<Self, SubzeroError> {
        let mut sources = Vec::new();
        for name in names {
            match create_source(name.as_ref(), config) {
                Some(source) => sources.push(source),
                None => warn!("Unknown source: {}", name.as_ref()),
            }
        }

        if sources.is_empty() {
            return Err(SubzeroError::ConfigError(
                "No valid sources configured".to_string(),
            ));
        }

        Ok(Self::new(sources))
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    pub fn infos(&self) -> Vec<SourceInfo> {
        self.sources.iter().map(|source| source.info()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_source() {
        let config = Config::default();

        let source = create_source("crtsh", &config);
        assert_eq!(source.unwrap().name(), "crtsh");

        let source = create_source("DogPile", &config);
        assert!(source.unwrap().info().paginated);

        let source = create_source("invalid", &config);
        assert!(source.is_none());
    }

    #[test]
    fn test_every_listed_source_exists() {
        let config = Config::default();
        for name in ALL_SOURCES {
            let source = create_source(name, &config).unwrap();
            assert_eq!(source.name(), *name);
            assert_eq!(source.info().name, *name);
        }
    }

    #[test]
    fn test_registry_keeps_order_and_skips_unknown() {
        let config = Config::default();
        let registry =
            SourceRegistry::from_names(&["riddler", "nope", "crtsh"], &config).unwrap();
        let names: Vec<_> = registry.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["riddler", "crtsh"]);
    }

    #[test]
    fn test_default_registry_infos() {
        let registry = SourceRegistry::from_config(&Config::default()).unwrap();
        let infos = registry.infos();
        let names: Vec<_> = infos.iter().map(|info| info.name).collect();
        assert_eq!(names, ALL_SOURCES);

        let paginated: Vec<_> = infos
            .iter()
            .filter(|info| info.paginated)
            .map(|info| info.name)
            .collect();
        assert_eq!(paginated, vec!["archiveis", "commoncrawldotorg", "dogpile"]);
    }

    #[test]
    fn test_empty_registry_is_config_error() {
        let config = Config::default();
        assert!(matches!(
            SourceRegistry::from_names(&["nope"], &config),
            Err(SubzeroError::ConfigError(_))
        ));
    }
}
