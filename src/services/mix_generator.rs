//! Mix Generator
//!
//! Drives the whole search: enumerates track sets of size 1..=max_songs,
//! runs the sequence search on each, keeps only mixes that use every track of
//! their set, and groups the survivors by set.
//!
//! Cost is Σ C(N, k) for k = 1..=M track sets, each exploring up to L·K
//! memoized states (L style positions, K tracks in the set). `GenerationLimits`
//! bounds N, M and L before any work starts, and caps the number of candidate
//! mixes a request may build, counted per set before the set is searched.

use crate::models::{Mix, MixesMap, StyleOrder, TrackSet};
use crate::services::catalog::Catalog;
use crate::services::sequence_search::SequenceSearch;
use crate::services::subsets;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("{what} is {requested}, the limit is {limit}")]
    LimitExceeded {
        what: &'static str,
        requested: usize,
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationLimits {
    pub max_songs: usize,
    pub max_catalog_tracks: usize,
    pub max_style_positions: usize,
    /// Candidate mixes one request may build across all of its sets
    pub max_mixes: usize,
}

impl Default for GenerationLimits {
    fn default() -> Self {
        Self {
            max_songs: 6,
            max_catalog_tracks: 64,
            max_style_positions: 16,
            max_mixes: 200_000,
        }
    }
}

impl GenerationLimits {
    fn check(&self, catalog: &Catalog, style_order: &StyleOrder, max_songs: usize) -> Result<(), GenerationError> {
        let checks = [
            ("max_songs", max_songs, self.max_songs),
            ("catalog size", catalog.len(), self.max_catalog_tracks),
            ("style order length", style_order.len(), self.max_style_positions),
        ];
        for (what, requested, limit) in checks {
            if requested > limit {
                return Err(GenerationError::LimitExceeded { what, requested, limit });
            }
        }
        Ok(())
    }

    /// Add `more` candidates to the running total, failing once it passes
    /// `max_mixes`.
    fn charge_mixes(&self, total: &mut u128, more: u128) -> Result<(), GenerationError> {
        *total = total.saturating_add(more);
        if *total > self.max_mixes as u128 {
            return Err(GenerationError::LimitExceeded {
                what: "candidate mix count",
                requested: usize::try_from(*total).unwrap_or(usize::MAX),
                limit: self.max_mixes,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MixGenerator {
    limits: GenerationLimits,
}

impl MixGenerator {
    pub fn new(limits: GenerationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &GenerationLimits {
        &self.limits
    }

    /// Find every valid mix for `style_order` using at most `max_songs`
    /// distinct tracks, grouped by the exact set of tracks each mix uses.
    ///
    /// `max_songs == 0` or an empty style order gives an empty map.
    pub fn generate(
        &self,
        catalog: &Catalog,
        style_order: &StyleOrder,
        max_songs: usize,
    ) -> Result<MixesMap, GenerationError> {
        self.limits.check(catalog, style_order, max_songs)?;

        let mut mixes_map = MixesMap::new();
        if max_songs == 0 || style_order.is_empty() {
            return Ok(mixes_map);
        }

        if let Some(missing) = style_order.as_slice().iter().find(|s| !catalog.has_style(s)) {
            info!("No songs carry style '{}', no mixes possible", missing);
            return Ok(mixes_map);
        }

        let started = Instant::now();
        let tracks = catalog.tracks();
        let max_size = max_songs.min(tracks.len());
        debug!(
            "Enumerating {} track sets for {} positions",
            subsets::subset_count(tracks.len(), max_size),
            style_order.len()
        );

        let mut examined = 0usize;
        let mut candidates = 0u128;
        for size in 1..=max_size {
            let before = mixes_map.len();
            for indices in subsets::Combinations::new(tracks.len(), size) {
                examined += 1;
                let set = TrackSet::new(indices.into_iter().map(|i| tracks[i].id));
                let search = SequenceSearch::new(catalog, &set, style_order);
                if !search.has_candidates() {
                    continue;
                }
                self.limits.charge_mixes(&mut candidates, search.count())?;
                let mixes = filter_exact_usage(search.run(), &set);
                mixes_map.insert(set, mixes);
            }
            debug!(
                "Set size {}: {} sets with valid mixes",
                size,
                mixes_map.len() - before
            );
        }

        info!(
            "Generated {} mixes across {} song sets ({} sets examined) in {:?}",
            mixes_map.total_mixes(),
            mixes_map.len(),
            examined,
            started.elapsed()
        );
        Ok(mixes_map)
    }
}

/// Keep only mixes whose distinct tracks are exactly `set`.
pub fn filter_exact_usage(mixes: Vec<Mix>, set: &TrackSet) -> Vec<Mix> {
    mixes.into_iter().filter(|mix| mix.uses_exactly(set)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{camelot, TrackId};

    fn catalog(rows: &[(&str, &str, &str)]) -> Catalog {
        let mut csv = String::from("name,artist,camelot,style\n");
        for (name, key, styles) in rows {
            csv.push_str(&format!("{},Artist,{},\"{}\"\n", name, key, styles));
        }
        Catalog::from_csv_str(&csv).unwrap()
    }

    fn set(raw: &[usize]) -> TrackSet {
        TrackSet::new(raw.iter().copied().map(TrackId))
    }

    fn mix(raw: &[usize]) -> Mix {
        Mix::new(raw.iter().copied().map(TrackId).collect())
    }

    fn sample_catalog() -> Catalog {
        catalog(&[
            ("One", "8A", "hikk,fast"),
            ("Two", "9A", "drop"),
            ("Three", "9A", "fast,slow"),
            ("Four", "10A", "drop,slow"),
            ("Five", "9A", "hikk,drop"),
            ("Six", "1A", "fast"),
        ])
    }

    #[test]
    fn test_end_to_end_scenario() {
        let catalog = catalog(&[("A", "8A", "fast"), ("B", "9A", "drop"), ("C", "9A", "fast,drop")]);
        let order = StyleOrder::new(["fast", "drop"]);
        let map = MixGenerator::default().generate(&catalog, &order, 2).unwrap();

        assert_eq!(map.get(&set(&[0, 1])), Some(&[mix(&[0, 1])][..]));
        assert_eq!(map.get(&set(&[2])), Some(&[mix(&[2, 2])][..]));
        assert_eq!(map.get(&set(&[0, 2])), Some(&[mix(&[0, 2])][..]));
        assert_eq!(map.get(&set(&[1, 2])), Some(&[mix(&[2, 1])][..]));
        assert_eq!(map.len(), 4);

        // insertion order: smaller sets first, then lexicographic
        let keys: Vec<&TrackSet> = map.keys().collect();
        assert_eq!(keys, vec![&set(&[2]), &set(&[0, 1]), &set(&[0, 2]), &set(&[1, 2])]);
    }

    #[test]
    fn test_invariants_hold_for_every_mix() {
        let catalog = sample_catalog();
        let order = StyleOrder::new(["hikk", "fast", "drop", "fast", "slow", "drop"]);
        let map = MixGenerator::default().generate(&catalog, &order, 3).unwrap();
        assert!(!map.is_empty());

        for (set, mixes) in map.iter() {
            assert!(!mixes.is_empty());
            assert!(set.len() <= 3);
            for m in mixes {
                assert_eq!(&m.distinct(), set);
                assert_eq!(m.len(), order.len());
                for (position, id) in m.tracks().iter().enumerate() {
                    assert!(catalog.track(*id).unwrap().has_style(order.get(position).unwrap()));
                }
                for pair in m.tracks().windows(2) {
                    let a = catalog.track(pair[0]).unwrap();
                    let b = catalog.track(pair[1]).unwrap();
                    assert!(camelot::is_compatible(&a.camelot, &b.camelot));
                }
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let catalog = sample_catalog();
        let order = StyleOrder::new(["fast", "drop", "slow"]);
        let generator = MixGenerator::default();
        let first = generator.generate(&catalog, &order, 3).unwrap();
        let second = generator.generate(&catalog, &order, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_style_gives_empty_map() {
        let catalog = sample_catalog();
        let order = StyleOrder::new(["fast", "ambient"]);
        let map = MixGenerator::default().generate(&catalog, &order, 3).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_boundaries_give_empty_map() {
        let catalog = sample_catalog();
        let generator = MixGenerator::default();

        let map = generator.generate(&catalog, &StyleOrder::new(["fast"]), 0).unwrap();
        assert!(map.is_empty());

        let map = generator.generate(&catalog, &StyleOrder::default(), 3).unwrap();
        assert!(map.is_empty());

        let map = generator.generate(&Catalog::default(), &StyleOrder::new(["fast"]), 3).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_max_songs_larger_than_catalog() {
        let catalog = catalog(&[("A", "8A", "x"), ("B", "9A", "x")]);
        let map = MixGenerator::default()
            .generate(&catalog, &StyleOrder::new(["x", "x"]), 5)
            .unwrap();

        assert_eq!(map.get(&set(&[0])), Some(&[mix(&[0, 0])][..]));
        assert_eq!(map.get(&set(&[1])), Some(&[mix(&[1, 1])][..]));
        assert_eq!(map.get(&set(&[0, 1])), Some(&[mix(&[0, 1]), mix(&[1, 0])][..]));
    }

    #[test]
    fn test_sets_that_cannot_be_fully_used_are_omitted() {
        // three tracks but only two positions: no 3-track set can be used up
        let catalog = catalog(&[("A", "8A", "x"), ("B", "8A", "x"), ("C", "8A", "x")]);
        let map = MixGenerator::default()
            .generate(&catalog, &StyleOrder::new(["x", "x"]), 3)
            .unwrap();
        assert!(map.keys().all(|s| s.len() <= 2));
        assert_eq!(map.len(), 3 + 3);
    }

    #[test]
    fn test_limits_are_enforced() {
        let catalog = sample_catalog();
        let generator = MixGenerator::new(GenerationLimits {
            max_songs: 2,
            max_catalog_tracks: 10,
            max_style_positions: 2,
            max_mixes: 1_000,
        });

        assert_eq!(
            generator.generate(&catalog, &StyleOrder::new(["fast"]), 3),
            Err(GenerationError::LimitExceeded {
                what: "max_songs",
                requested: 3,
                limit: 2,
            })
        );
        assert!(matches!(
            generator.generate(&catalog, &StyleOrder::new(["fast", "drop", "slow"]), 2),
            Err(GenerationError::LimitExceeded { what: "style order length", .. })
        ));

        let small = MixGenerator::new(GenerationLimits {
            max_catalog_tracks: 5,
            ..GenerationLimits::default()
        });
        assert!(matches!(
            small.generate(&catalog, &StyleOrder::new(["fast"]), 1),
            Err(GenerationError::LimitExceeded { what: "catalog size", requested: 6, limit: 5 })
        ));
    }

    #[test]
    fn test_candidate_mix_count_is_capped() {
        // per set: 1 + 1 + 1 singletons, 2^8 per pair, 3^8 for the triple
        let catalog = catalog(&[("A", "8A", "x"), ("B", "8A", "x"), ("C", "8A", "x")]);
        let order = StyleOrder::new(["x"; 8]);
        let generator = MixGenerator::new(GenerationLimits {
            max_mixes: 1_000,
            ..GenerationLimits::default()
        });

        let pairs = generator.generate(&catalog, &order, 2).unwrap();
        assert_eq!(pairs.len(), 3 + 3);

        assert_eq!(
            generator.generate(&catalog, &order, 3),
            Err(GenerationError::LimitExceeded {
                what: "candidate mix count",
                requested: 3 + 3 * 256 + 6561,
                limit: 1_000,
            })
        );
    }

    #[test]
    fn test_tracks_sharing_a_name_stay_separate() {
        let catalog = catalog(&[("Same", "8A", "x"), ("Same", "10A", "x")]);
        let map = MixGenerator::default()
            .generate(&catalog, &StyleOrder::new(["x", "x"]), 2)
            .unwrap();

        let keys: Vec<&TrackSet> = map.keys().collect();
        assert_eq!(keys, vec![&set(&[0]), &set(&[1])]);
        assert_eq!(map.get(&set(&[0])), Some(&[mix(&[0, 0])][..]));
        assert_eq!(map.get(&set(&[1])), Some(&[mix(&[1, 1])][..]));
        assert!(map.get(&set(&[0, 1])).is_none());
    }

    #[test]
    fn test_filter_exact_usage() {
        let mixes = vec![mix(&[0, 1, 0]), mix(&[0, 0, 0]), mix(&[1, 2, 0])];
        let kept = filter_exact_usage(mixes, &set(&[0, 1, 2]));
        assert_eq!(kept, vec![mix(&[1, 2, 0])]);
    }
}
