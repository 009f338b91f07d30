use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use vitrine::models::SourceUrl;
use vitrine::probe::MetadataReader;
use vitrine::utils::PlayerError;

/// Metadata reader that counts calls and can be switched into an error
/// mode, for exercising cache hits and fallback badges.
pub struct CountingReader {
    durations: HashMap<SourceUrl, f64>,
    calls: AtomicUsize,
    error_mode: Arc<Mutex<Option<String>>>,
}

impl CountingReader {
    pub fn new(table: &[(&str, f64)]) -> Self {
        Self {
            durations: table
                .iter()
                .map(|(source, duration)| (SourceUrl::new(*source), *duration))
                .collect(),
            calls: AtomicUsize::new(0),
            error_mode: Arc::new(Mutex::new(None)),
        }
    }

    pub fn inject_error(&self, error: &str) {
        *self.error_mode.lock().unwrap() = Some(error.to_string());
    }

    pub fn clear_error(&self) {
        *self.error_mode.lock().unwrap() = None;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataReader for CountingReader {
    async fn read_duration(&self, source: &SourceUrl) -> Result<f64, PlayerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.error_mode.lock().unwrap().clone() {
            return Err(PlayerError::MetadataUnavailable(error));
        }
        self.durations
            .get(source)
            .copied()
            .ok_or_else(|| PlayerError::MetadataUnavailable(format!("no metadata for {source}")))
    }
}

/// Reader that never answers, for timeout flows.
pub struct HangingReader;

#[async_trait]
impl MetadataReader for HangingReader {
    async fn read_duration(&self, _source: &SourceUrl) -> Result<f64, PlayerError> {
        std::future::pending().await
    }
}
