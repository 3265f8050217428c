//! Subset enumeration
//!
//! Yields every k-element combination of `0..n` in lexicographic order, the
//! same order as taking combinations over the catalog list. No pruning is
//! done here; the count grows as C(n, k).

/// Iterator over k-combinations of `0..n`.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k == 0 || k > n,
        }
    }

    /// Advance `indices` to the next combination; false once exhausted.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - k + i {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        if !self.advance() {
            self.done = true;
        }
        Some(current)
    }
}

/// Binomial coefficient, `u128::MAX` once the value no longer fits.
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by i + 1
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Number of subsets with 1 to `max_size` members drawn from `0..n`,
/// saturating at `u128::MAX`.
pub fn subset_count(n: usize, max_size: usize) -> u128 {
    (1..=max_size.min(n))
        .map(|k| binomial(n, k))
        .fold(0u128, u128::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn subsets_up_to(n: usize, max_size: usize) -> impl Iterator<Item = Vec<usize>> {
        (1..=max_size.min(n)).flat_map(move |k| Combinations::new(n, k))
    }

    #[test]
    fn test_combinations_lexicographic() {
        let combos: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            combos,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
    }

    #[test]
    fn test_combinations_edge_sizes() {
        assert_eq!(Combinations::new(3, 3).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
        assert_eq!(Combinations::new(3, 0).count(), 0);
        assert_eq!(Combinations::new(2, 3).count(), 0);
        assert_eq!(Combinations::new(0, 1).count(), 0);
    }

    #[test]
    fn test_subsets_are_distinct_and_counted() {
        for n in 0..8 {
            for max in 0..10 {
                let subsets: Vec<Vec<usize>> = subsets_up_to(n, max).collect();
                assert_eq!(subsets.len() as u128, subset_count(n, max), "n={} max={}", n, max);

                let unique: HashSet<&Vec<usize>> = subsets.iter().collect();
                assert_eq!(unique.len(), subsets.len());
                assert!(subsets.iter().all(|s| !s.is_empty() && s.len() <= max));
                assert!(subsets.iter().all(|s| s.windows(2).all(|w| w[0] < w[1])));
            }
        }
    }

    #[test]
    fn test_smaller_subsets_come_first() {
        let sizes: Vec<usize> = subsets_up_to(4, 3).map(|s| s.len()).collect();
        assert!(sizes.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(sizes.len(), 4 + 6 + 4);
    }

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(5, 2), 10);
        assert_eq!(binomial(64, 6), 74_974_368);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(subset_count(4, 2), 10);
        assert_eq!(subset_count(4, 0), 0);
    }

    #[test]
    fn test_counts_saturate_instead_of_overflowing() {
        assert_eq!(binomial(120, 60), 96_614_908_840_363_322_603_893_139_521_372_656);
        assert_eq!(binomial(200, 100), u128::MAX);
        assert_eq!(subset_count(200, 100), u128::MAX);
        assert_eq!(subset_count(130, 130), u128::MAX);
    }
}
