use crate::models::track::{normalize_style, TrackId};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Invalid set index {index}: no track sets available")]
    Empty { index: usize },

    #[error("Invalid set index {index}: expected a number between 1 and {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Required style per mix position. Tags are normalized like catalog styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StyleOrder(Vec<String>);

impl StyleOrder {
    pub fn new<I, S>(styles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(styles.into_iter().map(|s| normalize_style(s.as_ref())).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Order-independent set of tracks; the grouping key for generated mixes.
///
/// Stored as sorted, duplicate-free ids so that equal sets hash and compare
/// equal regardless of how they were built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TrackSet(Vec<TrackId>);

impl TrackSet {
    pub fn new<I: IntoIterator<Item = TrackId>>(ids: I) -> Self {
        let mut ids: Vec<TrackId> = ids.into_iter().collect();
        ids.sort_unstable();
        ids.dedup();
        Self(ids)
    }

    pub fn ids(&self) -> &[TrackId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.0.binary_search(&id).is_ok()
    }
}

/// One track per style position, in play order. A track may appear more
/// than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Mix(Vec<TrackId>);

impl Mix {
    pub fn new(tracks: Vec<TrackId>) -> Self {
        Self(tracks)
    }

    pub fn tracks(&self) -> &[TrackId] {
        &self.0
    }

    /// True when the distinct tracks of this mix are exactly `set`
    pub fn uses_exactly(&self, set: &TrackSet) -> bool {
        let used: BTreeSet<TrackId> = self.0.iter().copied().collect();
        used.len() == set.len() && used.iter().all(|id| set.contains(*id))
    }
}

/// Track sets mapped to their valid mixes, iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MixesMap {
    entries: Vec<(TrackSet, Vec<Mix>)>,
    index: HashMap<TrackSet, usize>,
}

impl MixesMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the mixes found for `set`. Sets without mixes are not stored;
    /// mixes for a set already present are appended to its list.
    pub fn insert(&mut self, set: TrackSet, mixes: Vec<Mix>) {
        if mixes.is_empty() {
            return;
        }
        match self.index.get(&set) {
            Some(&slot) => self.entries[slot].1.extend(mixes),
            None => {
                self.index.insert(set.clone(), self.entries.len());
                self.entries.push((set, mixes));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackSet, &[Mix])> {
        self.entries.iter().map(|(set, mixes)| (set, mixes.as_slice()))
    }

    pub fn total_mixes(&self) -> usize {
        self.entries.iter().map(|(_, mixes)| mixes.len()).sum()
    }

    /// Look up a set by its 1-based position in insertion order.
    pub fn select(&self, index: usize) -> Result<(&TrackSet, &[Mix]), SelectionError> {
        if self.entries.is_empty() {
            return Err(SelectionError::Empty { index });
        }
        if index == 0 || index > self.entries.len() {
            return Err(SelectionError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        let (set, mixes) = &self.entries[index - 1];
        Ok((set, mixes.as_slice()))
    }
}

impl PartialEq for MixesMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for MixesMap {}
