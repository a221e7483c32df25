//! Shared numeric helpers: sanitizing inputs, banded lookups and weight
//! renormalization.

use serde::{Deserialize, Serialize};

use crate::constants::{EPSILON, LEVEL_MAX, LEVEL_MIN};

/// `Some(v)` only for finite values. NaN and infinities count as absent.
pub fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Clamp a compound level onto the [1, 10] scale.
pub fn clamp_level(level: f64) -> f64 {
    level.clamp(LEVEL_MIN, LEVEL_MAX)
}

/// One step of a piecewise-constant table. `upper = None` closes the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<f64>,
    pub value: T,
}

impl<T> Band<T> {
    pub fn below(upper: f64, value: T) -> Self {
        Self {
            upper: Some(upper),
            value,
        }
    }

    pub fn rest(value: T) -> Self {
        Self { upper: None, value }
    }
}

/// First band whose upper bound exceeds `value` (or the open top band).
/// A table without an open top band clamps to its last band.
pub fn band_lookup<T>(bands: &[Band<T>], value: f64) -> Option<&T> {
    bands
        .iter()
        .find(|b| b.upper.is_none_or(|u| value < u))
        .or_else(|| bands.last())
        .map(|b| &b.value)
}

/// Weighted mean over `(value, weight)` pairs, skipping non-positive weights.
/// Returns None when no weight survives.
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> Option<f64> {
    let mut sum = 0.0;
    let mut weight_sum = 0.0;
    for (value, weight) in pairs {
        if weight > 0.0 {
            sum += value * weight;
            weight_sum += weight;
        }
    }
    if weight_sum > EPSILON {
        Some(sum / weight_sum)
    } else {
        None
    }
}

/// Result of resolving a set of configured weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WeightMode {
    /// Weights were divided by their sum.
    Proportional,
    /// One weight was ≥ 1.0; it became 1.0 and all others 0.0.
    Exclusive(usize),
    /// Nothing positive to normalize.
    Empty,
}

/// Renormalize `weights` in place, honoring exclusive mode.
///
/// Negative and non-finite entries are treated as zero. The first weight
/// ≥ 1.0 wins exclusive mode.
pub fn renormalize_weights(weights: &mut [f64]) -> WeightMode {
    renormalize_favoring(weights, &[])
}

/// Like [`renormalize_weights`], but only the `favored` indices (in order,
/// last one wins) may claim exclusive mode. Any other weight ≥ 1.0 is
/// rescaled proportionally with the rest. An empty `favored` falls back to
/// first-wins.
pub fn renormalize_favoring(weights: &mut [f64], favored: &[usize]) -> WeightMode {
    for w in weights.iter_mut() {
        if !w.is_finite() || *w < 0.0 {
            *w = 0.0;
        }
    }

    let exclusive = if favored.is_empty() {
        weights.iter().position(|w| *w >= 1.0)
    } else {
        favored
            .iter()
            .rev()
            .copied()
            .find(|&i| weights.get(i).is_some_and(|w| *w >= 1.0))
    };
    if let Some(idx) = exclusive {
        for (i, w) in weights.iter_mut().enumerate() {
            *w = if i == idx { 1.0 } else { 0.0 };
        }
        return WeightMode::Exclusive(idx);
    }

    let total: f64 = weights.iter().sum();
    if total <= EPSILON {
        return WeightMode::Empty;
    }
    for w in weights.iter_mut() {
        *w /= total;
    }
    WeightMode::Proportional
}
