// src/engine.rs
use crate::cancel::CancelSignal;
use crate::session::Session;
use crate::sources::{process_domain, ResultStream, SourceRegistry};
use crate::types::{Config, SubzeroError};
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, error};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};

/// Fans one domain out to every registered source and merges their streams.
///
/// Results are relayed untouched: no filtering, no cross-source dedup, and a
/// failure from one source never stops another. Each source's own order is
/// kept; nothing is promised across sources.
#[derive(Clone)]
pub struct Enumerator {
    registry: SourceRegistry,
    session: Session,
    permits: Arc<Semaphore>,
    buffer_factor: usize,
}

impl Enumerator {
    pub fn new(config: &Config, registry: SourceRegistry) -> Result<Self, SubzeroError> {
        let session = Session::new(config)?;
        Ok(Self::with_session(config, registry, session))
    }

    pub fn with_session(config: &Config, registry: SourceRegistry, session: Session) -> Self {
        Self {
            registry,
            session,
            permits: Arc::new(Semaphore::new(config.concurrency.max(1))),
            buffer_factor: config.buffer_factor.max(1),
        }
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    pub fn enumerate(&self, domain: &str) -> ResultStream {
        self.enumerate_with_cancel(domain, CancelSignal::never())
    }

    /// Like `enumerate`, but every source stops once `cancel` fires. The
    /// merged stream still closes, after the last source has wound down.
    pub fn enumerate_with_cancel(&self, domain: &str, cancel: CancelSignal) -> ResultStream {
        let (tx, rx) = mpsc::channel(self.registry.len().max(1) * self.buffer_factor);
        let domain = domain.to_string();
        let enumerator = self.clone();

        tokio::spawn(async move {
            let mut workers = FuturesUnordered::new();

            for source in enumerator.registry.iter() {
                let source = Arc::clone(source);
                let tx = tx.clone();
                let session = enumerator.session.clone();
                let permits = Arc::clone(&enumerator.permits);
                let cancel = cancel.clone();
                let domain = domain.clone();

                workers.push(tokio::spawn(async move {
                    let name = source.name();
                    let _permit = tokio::select! {
                        permit = permits.acquire_owned() => match permit {
                            Ok(permit) => permit,
                            Err(_) => return,
                        },
                        _ = cancel.cancelled() => return,
                    };

                    let mut results = process_domain(source, &domain, session, cancel);
                    while let Some(result) = results.recv().await {
                        if tx.send(result).await.is_err() {
                            debug!("[{}] Consumer for {} went away", name, domain);
                            return;
                        }
                    }
                }));
            }

            while let Some(joined) = workers.next().await {
                if let Err(e) = joined {
                    error!("Source worker for {} panicked: {}", domain, e);
                }
            }

            // Last sender: the merged stream closes here and only here.
            drop(tx);
            debug!("All sources finished for {}", domain);
        });

        rx
    }
}
