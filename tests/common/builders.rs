use vitrine::catalog::Catalog;
use vitrine::models::{CatalogEntry, SourceUrl};

pub struct CatalogEntryBuilder {
    source: SourceUrl,
    title: String,
    declared_duration: Option<String>,
    probed_duration: Option<String>,
}

impl CatalogEntryBuilder {
    pub fn video(source: &str) -> Self {
        Self {
            source: SourceUrl::new(source),
            title: "Untitled".to_string(),
            declared_duration: None,
            probed_duration: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_declared_duration(mut self, duration: &str) -> Self {
        self.declared_duration = Some(duration.to_string());
        self
    }

    pub fn with_probed_duration(mut self, duration: &str) -> Self {
        self.probed_duration = Some(duration.to_string());
        self
    }

    pub fn build(self, index: usize) -> CatalogEntry {
        let mut entry = CatalogEntry::new(index, self.source, self.title, self.declared_duration);
        entry.probed_duration = self.probed_duration;
        entry
    }
}

#[derive(Default)]
pub struct CatalogBuilder {
    entries: Vec<CatalogEntry>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of `n` local videos named videos/0.mp4, videos/1.mp4, ...
    pub fn with_videos(n: usize) -> Self {
        let mut builder = Self::new();
        for i in 0..n {
            builder = builder.entry(
                CatalogEntryBuilder::video(&format!("videos/{i}.mp4"))
                    .with_title(&format!("Video {i}")),
            );
        }
        builder
    }

    pub fn entry(mut self, entry: CatalogEntryBuilder) -> Self {
        let index = self.entries.len();
        self.entries.push(entry.build(index));
        self
    }

    pub fn build(self) -> Catalog {
        Catalog::from_entries(self.entries)
    }
}
