// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Merge metrics for four sibling leaves.
//!
//! The representative value is the geometric mean of the samples, each offset by
//! [`LOG_OFFSET`] so that zero samples stay in the logarithm's domain. The
//! epsilon of a twig is the largest absolute distance between that unrounded
//! mean and any of the four samples; the greedy pass merges the smallest first.

/// Added to every sample before taking its logarithm.
pub const LOG_OFFSET: f64 = 0.1;

/// Geometric mean of `values`, each offset by [`LOG_OFFSET`].
///
/// The result is not rounded; see [`merged_value`].
pub fn representative_value(values: [u32; 4]) -> f64 {
    let sum: f64 = values
        .iter()
        .map(|&v| math::ln(LOG_OFFSET + f64::from(v)))
        .sum();
    math::exp(0.25 * sum)
}

/// The sample stored in a leaf produced by merging `values`.
pub fn merged_value(values: [u32; 4]) -> u32 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "The offset mean is at most the largest sample plus 0.1, so rounding keeps it at or below that sample."
    )]
    let v = math::round(representative_value(values)) as u32;
    v
}

/// Largest absolute distance between the representative value and any of `values`.
pub fn epsilon(values: [u32; 4]) -> f64 {
    let rep = representative_value(values);
    values
        .iter()
        .map(|&v| math::abs(rep - f64::from(v)))
        .fold(0.0, f64::max)
}

#[cfg(feature = "std")]
mod math {
    pub(super) fn ln(v: f64) -> f64 {
        v.ln()
    }
    pub(super) fn exp(v: f64) -> f64 {
        v.exp()
    }
    pub(super) fn round(v: f64) -> f64 {
        v.round()
    }
    pub(super) fn abs(v: f64) -> f64 {
        v.abs()
    }
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
mod math {
    pub(super) fn ln(v: f64) -> f64 {
        libm::log(v)
    }
    pub(super) fn exp(v: f64) -> f64 {
        libm::exp(v)
    }
    pub(super) fn round(v: f64) -> f64 {
        libm::round(v)
    }
    pub(super) fn abs(v: f64) -> f64 {
        libm::fabs(v)
    }
}
