// Copyright 2025 the Quadpress Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain (ASCII, `P2`) PGM images.
//!
//! Reading accepts `#` comments anywhere between tokens and requires a square,
//! power-of-two image. Writing emits the declared maximum of the grid.

use alloc::string::{String, ToString};
use core::fmt;

use crate::error::Error;
use crate::grid::{Grid, sample_count};

/// Parse a plain PGM image into a [`Grid`].
///
/// Fails on a wrong magic number, a malformed or non-square header, missing
/// samples, or samples above the declared maximum. Tokens after the last
/// sample are ignored.
pub fn parse_pgm(text: &str) -> Result<Grid, Error> {
    let mut tokens = Tokens { text, pos: 0 };

    match tokens.next() {
        Some((_, "P2")) => {}
        Some((offset, _)) => {
            return Err(Error::Syntax {
                what: "magic number is not P2",
                offset,
            });
        }
        None => {
            return Err(Error::Syntax {
                what: "empty image",
                offset: 0,
            });
        }
    }
    let width: usize = tokens.header_field("width")?;
    let height: usize = tokens.header_field("height")?;
    let max_sample: u32 = tokens.header_field("maximum value")?;
    if width != height {
        return Err(Error::Dimensions { width, height });
    }
    let expected = sample_count(width)?;
    // Every sample takes at least one digit and one separator.
    let mut samples = alloc::vec::Vec::with_capacity(expected.min(text.len() / 2 + 1));
    for index in 0..expected {
        let Some((offset, token)) = tokens.next() else {
            return Err(Error::SampleCount {
                expected,
                found: index,
            });
        };
        let value: u32 = token.parse().map_err(|_| Error::Syntax {
            what: "sample is not a non-negative integer",
            offset,
        })?;
        if value > max_sample {
            return Err(Error::SampleAboveMax {
                index,
                value,
                max: max_sample,
            });
        }
        samples.push(value);
    }
    Grid::new(width, samples, max_sample)
}

/// Plain PGM text for `grid`.
pub fn write_pgm(grid: &Grid) -> String {
    Pgm(grid).to_string()
}

/// [`Display`](fmt::Display) adapter writing a grid as a plain PGM image.
#[derive(Clone, Copy, Debug)]
pub struct Pgm<'a>(pub &'a Grid);

impl fmt::Display for Pgm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.0;
        writeln!(f, "P2")?;
        writeln!(f, "# quadpress")?;
        writeln!(f, "{side} {side}", side = grid.side())?;
        writeln!(f, "{}", grid.max_sample())?;
        for row in grid.rows() {
            for v in row {
                write!(f, "{v} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

struct Tokens<'a> {
    text: &'a str,
    pos: usize,
}

impl Tokens<'_> {
    fn header_field<T: core::str::FromStr>(&mut self, what: &'static str) -> Result<T, Error> {
        let (offset, token) = self.next().ok_or(Error::Syntax {
            what: "truncated header",
            offset: self.text.len(),
        })?;
        token.parse().map_err(|_| Error::Syntax { what, offset })
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let bytes = text.as_bytes();
        loop {
            match *bytes.get(self.pos)? {
                b'#' => {
                    while bytes.get(self.pos).is_some_and(|&b| b != b'\n') {
                        self.pos += 1;
                    }
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                _ => break,
            }
        }
        let start = self.pos;
        while bytes
            .get(self.pos)
            .is_some_and(|&b| !b.is_ascii_whitespace() && b != b'#')
        {
            self.pos += 1;
        }
        Some((start, &text[start..self.pos]))
    }
}
