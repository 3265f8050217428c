//! Sequence Search
//!
//! For one track set and one style order, builds every track sequence where
//! position `i` carries style `i` and each adjacent pair passes the Camelot
//! rule. Tracks may repeat; usage of the whole set is checked afterwards.
//!
//! Suffixes are memoized by `(position, previous track)`. The cache is owned
//! by a single `run` call, so entries never leak between track sets.

use crate::models::{Mix, StyleOrder, Track, TrackId, TrackSet};
use crate::services::catalog::Catalog;
use std::collections::HashMap;
use std::rc::Rc;

type Suffixes = Rc<Vec<Vec<TrackId>>>;

/// Valid continuations keyed by position and the track placed just before it
pub type SuffixCache = HashMap<(usize, Option<TrackId>), Suffixes>;

/// Continuation counts, same keys as `SuffixCache`
type CountCache = HashMap<(usize, Option<TrackId>), u128>;

pub struct SequenceSearch<'a> {
    /// Set members eligible at each position, in set order
    candidates: Vec<Vec<&'a Track>>,
}

impl<'a> SequenceSearch<'a> {
    pub fn new(catalog: &'a Catalog, set: &TrackSet, style_order: &StyleOrder) -> Self {
        let members: Vec<&Track> = set.ids().iter().filter_map(|id| catalog.track(*id)).collect();
        let candidates = style_order
            .as_slice()
            .iter()
            .map(|style| {
                members
                    .iter()
                    .copied()
                    .filter(|track| track.has_style(style))
                    .collect()
            })
            .collect();

        Self { candidates }
    }

    /// False if some position has no eligible track, i.e. `run` is empty.
    pub fn has_candidates(&self) -> bool {
        self.candidates.iter().all(|c| !c.is_empty())
    }

    pub fn run(&self) -> Vec<Mix> {
        let mut cache = SuffixCache::new();
        self.suffixes(0, None, &mut cache)
            .iter()
            .map(|tracks| Mix::new(tracks.clone()))
            .collect()
    }

    /// Number of sequences `run` would return, saturating at `u128::MAX`.
    /// Walks the same states as `run` without building any sequence.
    pub fn count(&self) -> u128 {
        let mut cache = CountCache::new();
        self.count_from(0, None, &mut cache)
    }

    fn count_from(&self, position: usize, last: Option<&Track>, cache: &mut CountCache) -> u128 {
        if position == self.candidates.len() {
            return 1;
        }

        let key = (position, last.map(|track| track.id));
        if let Some(&hit) = cache.get(&key) {
            return hit;
        }

        let mut total = 0u128;
        for candidate in &self.candidates[position] {
            if last.map_or(true, |previous| previous.mixes_with(candidate)) {
                total = total.saturating_add(self.count_from(position + 1, Some(*candidate), cache));
            }
        }

        cache.insert(key, total);
        total
    }

    fn suffixes(&self, position: usize, last: Option<&Track>, cache: &mut SuffixCache) -> Suffixes {
        if position == self.candidates.len() {
            return Rc::new(vec![Vec::new()]);
        }

        let key = (position, last.map(|track| track.id));
        if let Some(hit) = cache.get(&key) {
            return hit.clone();
        }

        let mut found = Vec::new();
        for candidate in &self.candidates[position] {
            if let Some(previous) = last {
                if !previous.mixes_with(candidate) {
                    continue;
                }
            }

            let rest = self.suffixes(position + 1, Some(*candidate), cache);
            for tail in rest.iter() {
                let mut sequence = Vec::with_capacity(tail.len() + 1);
                sequence.push(candidate.id);
                sequence.extend_from_slice(tail);
                found.push(sequence);
            }
        }

        let found = Rc::new(found);
        cache.insert(key, found.clone());
        found
    }
}
