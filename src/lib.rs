// src/lib.rs
pub mod cancel;
pub mod cli;
pub mod config;
pub mod engine;
pub mod extractor;
pub mod output;
pub mod session;
pub mod sources;
pub mod types;

pub use cancel::{CancelHandle, CancelSignal};
pub use engine::Enumerator;
pub use extractor::SubdomainExtractor;
pub use output::OutputManager;
pub use session::Session;
pub use sources::{process_domain, ResultStream, Source, SourceRegistry};
pub use types::{Config, Outcome, SourceError, SourceResult, SubzeroError};
