// src/sources/emitter.rs
use crate::cancel::CancelSignal;
use crate::extractor::SubdomainExtractor;
use crate::types::{SourceError, SourceResult};
use std::collections::HashSet;
use tokio::sync::mpsc;

/// What one scan of a text unit turned up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageScan {
    pub matches: usize,
    pub new: usize,
}

/// Write side of one provider invocation's stream.
///
/// Owns the extractor and the set of values already sent, so nothing here
/// is shared with other providers or with other runs of the same provider.
pub struct Emitter {
    source: &'static str,
    extractor: SubdomainExtractor,
    seen: HashSet<String>,
    tx: mpsc::Sender<SourceResult>,
    cancel: CancelSignal,
}

impl Emitter {
    pub fn new(
        source: &'static str,
        extractor: SubdomainExtractor,
        tx: mpsc::Sender<SourceResult>,
        cancel: CancelSignal,
    ) -> Self {
        Self {
            source,
            extractor,
            seen: HashSet::new(),
            tx,
            cancel,
        }
    }

    /// Number of distinct values sent so far.
    pub fn emitted(&self) -> usize {
        self.seen.len()
    }

    /// Run `text` through the extractor and send every value not sent
    /// before. Fails with `Abandoned` once the consumer has gone away.
    pub async fn scan(&mut self, text: &str) -> Result<PageScan, SourceError> {
        let mut scan = PageScan::default();

        for value in self.extractor.find_all(text) {
            scan.matches += 1;
            if self.seen.contains(&value) {
                continue;
            }
            self.seen.insert(value.clone());
            scan.new += 1;
            self.tx
                .send(SourceResult::success(self.source, value))
                .await
                .map_err(|_| SourceError::Abandoned)?;
        }

        Ok(scan)
    }

    /// Paginated sources call this between pages.
    pub fn check_cancelled(&self) -> Result<(), SourceError> {
        if self.cancel.is_cancelled() || self.tx.is_closed() {
            return Err(SourceError::Abandoned);
        }
        Ok(())
    }

    /// Send the terminal failure for this invocation.
    pub(crate) async fn fail(self, error: SourceError) {
        // A closed stream has nobody left to tell.
        let _ = self.tx.send(SourceResult::failure(self.source, error)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(capacity: usize) -> (Emitter, mpsc::Receiver<SourceResult>) {
        let (tx, rx) = mpsc::channel(capacity);
        let extractor = SubdomainExtractor::new("example.com").unwrap();
        (Emitter::new("test", extractor, tx, CancelSignal::never()), rx)
    }

    #[tokio::test]
    async fn test_scan_suppresses_repeats() {
        let (mut emitter, mut rx) = emitter(16);

        let first = emitter.scan("a.example.com b.example.com a.example.com").await.unwrap();
        assert_eq!(first, PageScan { matches: 3, new: 2 });

        let second = emitter.scan("B.EXAMPLE.COM c.example.com").await.unwrap();
        assert_eq!(second, PageScan { matches: 2, new: 1 });
        assert_eq!(emitter.emitted(), 3);
        drop(emitter);

        let mut values = Vec::new();
        while let Some(result) = rx.recv().await {
            values.push(result.value().unwrap().to_string());
        }
        assert_eq!(values, vec!["a.example.com", "b.example.com", "c.example.com"]);
    }

    #[tokio::test]
    async fn test_scan_after_consumer_left_is_abandoned() {
        let (mut emitter, rx) = emitter(1);
        drop(rx);
        assert!(matches!(
            emitter.scan("a.example.com").await,
            Err(SourceError::Abandoned)
        ));
        assert!(matches!(emitter.check_cancelled(), Err(SourceError::Abandoned)));
    }

    #[tokio::test]
    async fn test_fail_sends_one_failure() {
        let (emitter, mut rx) = emitter(1);
        emitter
            .fail(SourceError::Transport("connection refused".to_string()))
            .await;
        let result = rx.recv().await.unwrap();
        assert!(result.is_failure());
        assert!(rx.recv().await.is_none());
    }
}
