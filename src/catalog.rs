use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{CatalogEntry, SourceUrl};

/// Ordered list of every video the gallery offers, built once from the
/// declared cards and extended only by appending. Indexes are stable for
/// the life of the page; nothing is ever removed or reordered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from card data in page order. Entry indexes follow the
    /// iteration order regardless of any index the input carried.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, mut entry)| {
                entry.index = index;
                entry
            })
            .collect();
        Self { entries }
    }

    /// Append a newly discovered card, assigning it the next index.
    /// Existing entries are untouched.
    pub fn push(
        &mut self,
        source: SourceUrl,
        title: impl Into<String>,
        declared_duration: Option<String>,
    ) -> usize {
        let index = self.entries.len();
        let entry = CatalogEntry::new(index, source, title, declared_duration);
        debug!("Catalog entry {} added: {}", index, entry.source);
        self.entries.push(entry);
        index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Record a probe result. Returns false when the index is out of range.
    pub fn set_probed_duration(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.probed_duration = Some(text.into());
                true
            }
            None => false,
        }
    }

    /// Index after `current`, wrapping from the last entry to the first.
    /// None only when the catalog is empty.
    pub fn next_index(&self, current: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        Some((current + 1) % self.entries.len())
    }

    /// Index before `current`, wrapping from the first entry to the last.
    /// None only when the catalog is empty.
    pub fn previous_index(&self, current: usize) -> Option<usize> {
        if self.entries.is_empty() {
            return None;
        }
        if current == 0 {
            Some(self.entries.len() - 1)
        } else {
            Some(current - 1)
        }
    }
}
