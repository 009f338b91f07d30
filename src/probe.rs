use async_trait::async_trait;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::constants::{FALLBACK_DURATION, UNKNOWN_DURATION};
use crate::models::{SourceUrl, format_duration};
use crate::utils::errors::PlayerError;

/// Host capability that reads media metadata for a locator. The page layer
/// backs this with a throwaway media element; tests and the demo binary use
/// canned tables.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Resolve the media duration in seconds. Implementations should fail
    /// rather than hang; the prober additionally enforces its own timeout.
    async fn read_duration(&self, source: &SourceUrl) -> Result<f64, PlayerError>;
}

/// MetadataReader over a fixed duration table. Sources absent from the
/// table fail as unavailable.
pub struct StaticMetadataReader {
    durations: HashMap<SourceUrl, f64>,
}

impl StaticMetadataReader {
    pub fn new(durations: HashMap<SourceUrl, f64>) -> Self {
        Self { durations }
    }
}

#[async_trait]
impl MetadataReader for StaticMetadataReader {
    async fn read_duration(&self, source: &SourceUrl) -> Result<f64, PlayerError> {
        self.durations
            .get(source)
            .copied()
            .ok_or_else(|| PlayerError::MetadataUnavailable(source.to_string()))
    }
}

/// What a probe attempt produced. Fallback text still fills the badge,
/// but callers can tell the difference and report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Resolved(String),
    Fallback(String),
}

impl ProbeOutcome {
    pub fn text(&self) -> &str {
        match self {
            ProbeOutcome::Resolved(text) | ProbeOutcome::Fallback(text) => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            ProbeOutcome::Resolved(text) | ProbeOutcome::Fallback(text) => text,
        }
    }
}

/// Resolves duration badge text for catalog entries, at most one real read
/// per source. Results are cached by locator; a probe that lands after its
/// card stopped caring is still cached and reused.
pub struct DurationProber {
    reader: Arc<dyn MetadataReader>,
    cache: Mutex<LruCache<SourceUrl, String>>,
    timeout: Duration,
}

impl DurationProber {
    pub fn new(reader: Arc<dyn MetadataReader>, cache_capacity: usize, timeout: Duration) -> Self {
        let capacity = NonZeroUsize::new(cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            reader,
            cache: Mutex::new(LruCache::new(capacity)),
            timeout,
        }
    }

    /// Resolve the badge text for one source. See [`Self::probe_outcome`].
    pub async fn probe(&self, source: &SourceUrl, declared: Option<&str>) -> String {
        self.probe_outcome(source, declared).await.into_text()
    }

    /// Resolve the badge text for one source. Never fails: external
    /// platform locators resolve to the `Unknown` sentinel without touching
    /// the reader, and read failures degrade to the declared fallback or
    /// the zero badge. Only real probe results and the sentinel are cached.
    pub async fn probe_outcome(&self, source: &SourceUrl, declared: Option<&str>) -> ProbeOutcome {
        if let Some(hit) = self.cache.lock().await.get(source) {
            debug!("Duration cache hit for {}", source);
            return ProbeOutcome::Resolved(hit.clone());
        }

        if source.is_external_platform() {
            let text = UNKNOWN_DURATION.to_string();
            self.cache.lock().await.put(source.clone(), text.clone());
            return ProbeOutcome::Resolved(text);
        }

        let read = tokio::time::timeout(self.timeout, self.reader.read_duration(source)).await;
        match read {
            Ok(Ok(seconds)) => {
                let text = format_duration(seconds);
                debug!("Probed duration for {}: {}", source, text);
                self.cache.lock().await.put(source.clone(), text.clone());
                ProbeOutcome::Resolved(text)
            }
            Ok(Err(e)) => {
                warn!("Duration probe failed for {}: {}", source, e);
                ProbeOutcome::Fallback(declared.unwrap_or(FALLBACK_DURATION).to_string())
            }
            Err(_) => {
                warn!("Duration probe timed out for {}", source);
                ProbeOutcome::Fallback(declared.unwrap_or(FALLBACK_DURATION).to_string())
            }
        }
    }

    /// Probe every entry that has no result yet, concurrently, and write
    /// the results back. Returns the resolutions in entry order so callers
    /// can announce them.
    pub async fn annotate(&self, catalog: &mut Catalog) -> Vec<(usize, SourceUrl, String)> {
        let pending: Vec<(usize, SourceUrl, Option<String>)> = catalog
            .iter()
            .filter(|entry| entry.probed_duration.is_none())
            .map(|entry| {
                (
                    entry.index,
                    entry.source.clone(),
                    entry.declared_duration.clone(),
                )
            })
            .collect();

        let results = futures::future::join_all(pending.into_iter().map(
            |(index, source, declared)| async move {
                let text = self.probe(&source, declared.as_deref()).await;
                (index, source, text)
            },
        ))
        .await;

        for (index, _, text) in &results {
            catalog.set_probed_duration(*index, text.clone());
        }
        results
    }
}
