// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Square sample grids: the input to [`QuadTree::build`](crate::QuadTree::build)
//! and the output of [`QuadTree::render`](crate::QuadTree::render).

use alloc::vec::Vec;

use crate::error::Error;

/// A square grid of non-negative samples, stored row-major.
///
/// The side is a positive power of two and no sample exceeds `max_sample`.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    max_sample: u32,
    samples: Vec<u32>,
}

impl core::fmt::Debug for Grid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("side", &self.side)
            .field("max_sample", &self.max_sample)
            .finish_non_exhaustive()
    }
}

impl Grid {
    /// Create a grid from row-major samples.
    ///
    /// Fails if `side` is not a positive power of two, if `samples` does not hold
    /// exactly `side * side` values, or if a sample exceeds `max_sample`.
    pub fn new(side: usize, samples: Vec<u32>, max_sample: u32) -> Result<Self, Error> {
        let expected = sample_count(side)?;
        if samples.len() != expected {
            return Err(Error::SampleCount {
                expected,
                found: samples.len(),
            });
        }
        check_samples(&samples, max_sample)?;
        Ok(Self {
            side,
            max_sample,
            samples,
        })
    }

    /// Create a grid from nested rows.
    ///
    /// The number of rows is the side; every row must have the same length.
    pub fn from_rows<R: AsRef<[u32]>>(rows: &[R], max_sample: u32) -> Result<Self, Error> {
        let side = rows.len();
        let mut samples = Vec::with_capacity(sample_count(side)?);
        for (row, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != side {
                return Err(Error::NotSquare {
                    row,
                    len: r.len(),
                    side,
                });
            }
            samples.extend_from_slice(r);
        }
        check_samples(&samples, max_sample)?;
        Ok(Self {
            side,
            max_sample,
            samples,
        })
    }

    /// A grid where every sample is `value`, which is also the declared maximum.
    pub fn filled(side: usize, value: u32) -> Result<Self, Error> {
        let count = sample_count(side)?;
        Ok(Self {
            side,
            max_sample: value,
            samples: alloc::vec![value; count],
        })
    }

    /// Assemble a grid whose invariants the caller already upholds.
    pub(crate) fn from_parts(side: usize, max_sample: u32, samples: Vec<u32>) -> Self {
        debug_assert!(
            side.is_power_of_two() && samples.len() == side * side,
            "grid parts are inconsistent"
        );
        Self {
            side,
            max_sample,
            samples,
        }
    }

    /// Side length in samples.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Declared maximum sample value.
    pub fn max_sample(&self) -> u32 {
        self.max_sample
    }

    /// All samples, row-major.
    pub fn samples(&self) -> &[u32] {
        &self.samples
    }

    /// Sample at `(row, col)`, or `None` outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.side || col >= self.side {
            return None;
        }
        Some(self.samples[row * self.side + col])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.samples.chunks_exact(self.side)
    }

    pub(crate) fn at(&self, row: usize, col: usize) -> u32 {
        self.samples[row * self.side + col]
    }
}

/// Number of samples in a grid of `side`, after checking the side.
pub(crate) fn sample_count(side: usize) -> Result<usize, Error> {
    if !side.is_power_of_two() {
        return Err(Error::SideNotPowerOfTwo { side });
    }
    side.checked_mul(side).ok_or(Error::SideTooLarge { side })
}

fn check_samples(samples: &[u32], max: u32) -> Result<(), Error> {
    match samples.iter().position(|&v| v > max) {
        Some(index) => Err(Error::SampleAboveMax {
            index,
            value: samples[index],
            max,
        }),
        None => Ok(()),
    }
}
