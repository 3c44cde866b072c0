//! Instance-owned random stream
//!
//! Every simulation owns exactly one `SimRng`. Lanes borrow it mutably for the
//! duration of a draw, so the order and count of draws for a given seed is
//! fixed by the tick order alone.

use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Seeded PCG stream
#[derive(Debug, Clone)]
pub struct SimRng {
    seed: u64,
    inner: Pcg32,
}

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            inner: Pcg32::seed_from_u64(seed),
        }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform float in [0, 1)
    pub fn uniform01(&mut self) -> f64 {
        self.inner.random::<f64>()
    }

    /// Uniform integer in [lo, hi] (inclusive)
    pub fn int_range(&mut self, lo: i32, hi: i32) -> i32 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        self.inner.random_range(lo..=hi)
    }

    /// Uniform pick from a non-empty set
    pub fn choice<T: Copy>(&mut self, items: &[T]) -> T {
        *items
            .choose(&mut self.inner)
            .unwrap_or_else(|| panic!("choice from an empty set"))
    }

    /// Weighted pick: one uniform draw scaled by the total weight
    pub fn choice_weighted<T: Copy>(&mut self, items: &[(T, f64)]) -> T {
        let total: f64 = items.iter().map(|&(_, w)| w).sum();
        assert!(
            total > 0.0 && total.is_finite(),
            "weighted choice needs a positive total, got {total}"
        );
        pick_cumulative(items, self.uniform01() * total)
    }
}

/// First item whose cumulative weight exceeds `u`; the last item past the end.
///
/// Zero-weight items are never picked unless they come last.
pub fn pick_cumulative<T: Copy>(items: &[(T, f64)], u: f64) -> T {
    let mut acc = 0.0;
    for &(item, weight) in items {
        acc += weight;
        if u < acc {
            return item;
        }
    }
    match items.last() {
        Some(&(item, _)) => item,
        None => panic!("choice from an empty set"),
    }
}
