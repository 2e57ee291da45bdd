//! Discrete weighted sampling over a fixed table.

use rand::Rng;

/// Samples values from a fixed table of integer weights.
///
/// Built once from the weight table and stored as cumulative sums, so each draw
/// costs one uniform integer draw and a binary search. A weight of zero means
/// the entry is never drawn.
#[derive(Debug, Clone)]
pub struct DiscreteSampler<T> {
    values: Vec<T>,
    cumulative: Vec<u32>,
    total: u32,
}

impl<T: Copy> DiscreteSampler<T> {
    /// # Panics
    ///
    /// Panics if the table is empty or all weights are zero.
    pub fn new(table: &[(T, u32)]) -> Self {
        let mut values = Vec::with_capacity(table.len());
        let mut cumulative = Vec::with_capacity(table.len());
        let mut total = 0u32;
        for &(value, weight) in table {
            total += weight;
            values.push(value);
            cumulative.push(total);
        }
        assert!(total > 0, "discrete sampler needs a positive total weight");
        Self {
            values,
            cumulative,
            total,
        }
    }

    /// Draw one value. Consumes exactly one integer from `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        let ticket = rng.gen_range(0..self.total);
        let idx = self.cumulative.partition_point(|&c| c <= ticket);
        self.values[idx]
    }

    /// Probability of drawing the entry at `idx`.
    pub fn probability(&self, idx: usize) -> f64 {
        let prev = if idx == 0 { 0 } else { self.cumulative[idx - 1] };
        (self.cumulative[idx] - prev) as f64 / self.total as f64
    }

    pub fn total_weight(&self) -> u32 {
        self.total
    }
}
