//! Weighted random choice
//!
//! Fallback policy, shared by every caller:
//! - NaN, infinite and negative weights count as zero
//! - all-zero weights become a uniform draw over the candidates
//! - no candidates yields `None`; callers substitute a per-team fallback id

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

fn clean_weight(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}

fn build_index(weights: &[f64]) -> Option<WeightedIndex<f64>> {
    let cleaned: Vec<f64> = weights.iter().copied().map(clean_weight).collect();
    let total: f64 = cleaned.iter().sum();
    if !(total > 0.0 && total.is_finite()) {
        return None;
    }
    WeightedIndex::new(cleaned).ok()
}

/// Index drawn with probability proportional to `weights`.
pub fn weighted_choice<R: Rng + ?Sized>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    match build_index(weights) {
        Some(dist) => Some(dist.sample(rng)),
        None => Some(rng.gen_range(0..weights.len())),
    }
}

/// Candidates with a sampling distribution built once.
#[derive(Debug, Clone)]
pub struct WeightedPool<T> {
    items: Vec<T>,
    /// `None` means uniform.
    dist: Option<WeightedIndex<f64>>,
}

impl<T> WeightedPool<T> {
    pub fn new(items: Vec<T>, weights: &[f64]) -> Self {
        debug_assert_eq!(items.len(), weights.len());
        let dist = if items.len() == weights.len() { build_index(weights) } else { None };
        Self { items, dist }
    }

    pub fn empty() -> Self {
        Self { items: Vec::new(), dist: None }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_uniform(&self) -> bool {
        self.dist.is_none()
    }

    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&T> {
        if self.items.is_empty() {
            return None;
        }
        let i = match &self.dist {
            Some(dist) => dist.sample(rng),
            None => rng.gen_range(0..self.items.len()),
        };
        self.items.get(i)
    }
}
