//! Track Catalog
//!
//! In-memory list of tracks plus a style -> tracks index. A catalog is built
//! wholesale from CSV rows and never mutated afterwards; reloading produces a
//! new catalog that `CatalogStore` swaps in as a single step.

use crate::models::{Track, TrackId, TrackRecord};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Row {row}: no style tags for '{name}'")]
    NoStyles { row: usize, name: String },

    #[error("Catalog has {count} tracks, the limit is {limit}")]
    TooManyTracks { count: usize, limit: usize },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
    by_style: HashMap<String, Vec<TrackId>>,
}

impl Catalog {
    /// Build a catalog from raw rows. Any bad row rejects the whole batch.
    pub fn from_records<I>(records: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = TrackRecord>,
    {
        let mut tracks = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let track = Track::from_record(TrackId(index), &record);
            if track.styles.is_empty() {
                return Err(CatalogError::NoStyles {
                    row: index + 1,
                    name: track.name,
                });
            }
            tracks.push(track);
        }
        Ok(Self::from_tracks(tracks))
    }

    /// Index already-normalized tracks. Ids are reassigned in list order.
    pub fn from_tracks(mut tracks: Vec<Track>) -> Self {
        let mut by_style: HashMap<String, Vec<TrackId>> = HashMap::new();
        for (index, track) in tracks.iter_mut().enumerate() {
            track.id = TrackId(index);
            for style in &track.styles {
                let members = by_style.entry(style.clone()).or_default();
                if members.last() != Some(&track.id) {
                    members.push(track.id);
                }
            }
        }
        Self { tracks, by_style }
    }

    /// Parse CSV with a header row containing `name`, `artist`, `camelot`
    /// and `style` columns.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(reader);
        let records = reader
            .deserialize::<TrackRecord>()
            .collect::<Result<Vec<_>, _>>()?;
        let catalog = Self::from_records(records)?;
        debug!(
            "Parsed catalog with {} tracks across {} styles",
            catalog.len(),
            catalog.by_style.len()
        );
        Ok(catalog)
    }

    pub fn from_csv_str(data: &str) -> Result<Self, CatalogError> {
        Self::from_csv_reader(data.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path.as_ref())?;
        let catalog = Self::from_csv_reader(file)?;
        info!("Loaded {} songs from {}", catalog.len(), path.as_ref().display());
        Ok(catalog)
    }

    /// Reject catalogs larger than `limit` tracks.
    pub fn check_size(&self, limit: usize) -> Result<(), CatalogError> {
        if self.tracks.len() > limit {
            return Err(CatalogError::TooManyTracks {
                count: self.tracks.len(),
                limit,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(id.0)
    }

    /// Tracks carrying `style`, in catalog order. Unknown styles are empty.
    pub fn tracks_with_style(&self, style: &str) -> &[TrackId] {
        self.by_style.get(style).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_style(&self, style: &str) -> bool {
        !self.tracks_with_style(style).is_empty()
    }

    /// All known style tags, sorted
    pub fn styles(&self) -> Vec<String> {
        let mut styles: Vec<String> = self.by_style.keys().cloned().collect();
        styles.sort();
        styles
    }
}

/// Shared handle to the active catalog.
///
/// Readers take an `Arc` snapshot and keep computing against it even if a
/// reload happens meanwhile; a reload replaces the whole snapshot at once.
#[derive(Clone, Default)]
pub struct CatalogStore {
    current: Arc<RwLock<Option<Arc<Catalog>>>>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Option<Arc<Catalog>> {
        self.current.read().await.clone()
    }

    pub async fn replace(&self, catalog: Catalog) -> Arc<Catalog> {
        let catalog = Arc::new(catalog);
        let mut current = self.current.write().await;
        *current = Some(catalog.clone());
        info!(
            "Catalog replaced: {} tracks, {} styles",
            catalog.len(),
            catalog.by_style.len()
        );
        catalog
    }
}
