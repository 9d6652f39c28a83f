// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type shared by grid validation, the text codecs, and compression.

use crate::types::Violations;

/// Coarse classification of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A caller-supplied parameter is out of range (`rho`, grid dimensions).
    InvalidArgument,
    /// Input data is inconsistent with its own declarations (samples, text syntax).
    MalformedInput,
    /// A tree failed its structural checks.
    InvariantViolation,
}

/// Errors reported by this crate.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The grid side is zero or not a power of two.
    #[error("grid side {side} is not a positive power of two")]
    SideNotPowerOfTwo {
        /// The offending side length.
        side: usize,
    },
    /// The grid side is a power of two, but `side * side` does not fit in `usize`.
    #[error("grid side {side} is too large")]
    SideTooLarge {
        /// The offending side length.
        side: usize,
    },
    /// A row of a nested grid does not match the number of rows.
    #[error("grid is not square: row {row} has {len} samples, expected {side}")]
    NotSquare {
        /// Index of the first mismatching row.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Number of rows.
        side: usize,
    },
    /// An image header declares different width and height.
    #[error("image is {width}x{height}, expected a square")]
    Dimensions {
        /// Declared width.
        width: usize,
        /// Declared height.
        height: usize,
    },
    /// A compression ratio outside `1..=100`.
    #[error("rho must be within 1..=100, got {0}")]
    RhoOutOfRange(u32),
    /// A sample exceeds the declared maximum.
    #[error("sample {value} at index {index} exceeds the declared maximum {max}")]
    SampleAboveMax {
        /// Row-major index of the sample.
        index: usize,
        /// The sample value.
        value: u32,
        /// The declared maximum.
        max: u32,
    },
    /// Fewer samples than the dimensions require.
    #[error("expected {expected} samples, found {found}")]
    SampleCount {
        /// `side * side`.
        expected: usize,
        /// Samples actually present.
        found: usize,
    },
    /// Text input that does not follow its grammar.
    #[error("malformed input at byte {offset}: {what}")]
    Syntax {
        /// What was expected or found.
        what: &'static str,
        /// Byte offset into the input.
        offset: usize,
    },
    /// A tree failed [`QuadTree::validate`](crate::QuadTree::validate).
    #[error("tree invariants violated: {0:?}")]
    InvariantViolation(Violations),
}

impl Error {
    /// Classify this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::SideNotPowerOfTwo { .. }
            | Self::SideTooLarge { .. }
            | Self::NotSquare { .. }
            | Self::Dimensions { .. }
            | Self::RhoOutOfRange(_) => ErrorKind::InvalidArgument,
            Self::SampleAboveMax { .. } | Self::SampleCount { .. } | Self::Syntax { .. } => {
                ErrorKind::MalformedInput
            }
            Self::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn kinds_and_messages() {
        let e = Error::RhoOutOfRange(0);
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(e.to_string(), "rho must be within 1..=100, got 0");

        let e = Error::SampleCount {
            expected: 16,
            found: 15,
        };
        assert_eq!(e.kind(), ErrorKind::MalformedInput);

        let e = Error::InvariantViolation(Violations::COUNT_MISMATCH);
        assert_eq!(e.kind(), ErrorKind::InvariantViolation);
    }
}
