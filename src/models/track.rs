use crate::models::camelot::CamelotKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Surrogate identity assigned at catalog load, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(pub usize);

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of an uploaded catalog, before normalization.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRecord {
    pub name: String,
    pub artist: String,
    pub camelot: String,
    /// Comma-separated style tags
    pub style: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    /// Harmonic tag as loaded; may be malformed
    pub camelot: String,
    pub styles: Vec<String>,
    #[serde(skip)]
    key: Option<CamelotKey>,
}

impl Track {
    pub fn new(id: TrackId, name: String, artist: String, camelot: String, styles: Vec<String>) -> Self {
        let key = camelot.parse().ok();
        Self {
            id,
            name,
            artist,
            camelot,
            styles,
            key,
        }
    }

    /// Build a track from a raw row: trims every field, upper-cases the tag,
    /// lower-cases styles and drops empty or repeated style tokens.
    pub fn from_record(id: TrackId, record: &TrackRecord) -> Self {
        let mut styles: Vec<String> = Vec::new();
        for style in record.style.split(',').map(normalize_style) {
            if !style.is_empty() && !styles.contains(&style) {
                styles.push(style);
            }
        }

        Self::new(
            id,
            record.name.trim().to_string(),
            record.artist.trim().to_string(),
            record.camelot.trim().to_uppercase(),
            styles,
        )
    }

    pub fn has_style(&self, style: &str) -> bool {
        self.styles.iter().any(|s| s == style)
    }

    /// Adjacency check used by the search; malformed tags never mix.
    pub fn mixes_with(&self, other: &Track) -> bool {
        match (self.key, other.key) {
            (Some(a), Some(b)) => a.mixes_with(&b),
            _ => false,
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {}",
            self.name,
            self.artist,
            self.camelot,
            self.styles.join(", ")
        )
    }
}

pub fn normalize_style(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Compact track reference used when listing track sets
#[derive(Debug, Clone, Serialize)]
pub struct TrackInfo {
    pub id: TrackId,
    pub name: String,
    pub artist: String,
    pub camelot: String,
}

impl From<&Track> for TrackInfo {
    fn from(track: &Track) -> Self {
        TrackInfo {
            id: track.id,
            name: track.name.clone(),
            artist: track.artist.clone(),
            camelot: track.camelot.clone(),
        }
    }
}
