//! Bin mapping, accumulation and rendering of the occupancy grid.

use std::fmt;

use itertools::Itertools;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{Error, Result};

/// Bin index of one coordinate for a grid of `size` cells per axis.
///
/// The value is scaled down by `size` and back up again before flooring, so
/// the result equals `floor(v)` up to rounding of the intermediate product.
/// NaN and infinite coordinates have no bin.
pub fn bin_index(v: f64, size: usize) -> Option<i64> {
    let b = size as f64;
    let scaled = (v / b * b).floor();
    if !scaled.is_finite() {
        return None;
    }
    Some(scaled as i64)
}

/// Map a whole column to bin indices, one per value, in order.
pub fn bin_indices(values: impl IntoIterator<Item = f64>, size: usize) -> Vec<Option<i64>> {
    values.into_iter().map(|v| bin_index(v, size)).collect()
}

/// Text layout used when printing a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    /// Bracketed array, cells right-aligned to the widest count
    #[default]
    Array,
    /// One row per line, every cell followed by a space
    Plain,
}

/// Square histogram of point counts, indexed `[bin_x][bin_y]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<u64>, // row-major
}

impl Grid {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidBox(size));
        }
        let len = size.checked_mul(size).ok_or(Error::InvalidBox(size))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| Error::GridTooLarge(size))?;
        cells.resize(len, 0);
        Ok(Self { size, cells })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> Option<u64> {
        if i < self.size && j < self.size {
            Some(self.cells[i * self.size + j])
        } else {
            None
        }
    }

    /// Sum of all cells
    pub fn total(&self) -> u64 {
        self.cells.iter().sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.cells.chunks(self.size)
    }

    /// Count one point in cell `(i, j)`. Returns false, leaving the grid
    /// untouched, when the cell lies outside `[0, size)²`.
    pub fn increment(&mut self, i: i64, j: i64) -> bool {
        let range = 0..self.size as i64;
        if !range.contains(&i) || !range.contains(&j) {
            return false;
        }
        self.cells[i as usize * self.size + j as usize] += 1;
        true
    }

    /// Count each `(bin_x[k], bin_y[k])` pair in order. Pairs with a missing
    /// or out-of-range index are skipped. Returns how many were counted.
    pub fn accumulate(&mut self, bin_x: &[Option<i64>], bin_y: &[Option<i64>]) -> usize {
        bin_x
            .iter()
            .zip(bin_y)
            .filter(|pair| match pair {
                (Some(i), Some(j)) => self.increment(*i, *j),
                _ => false,
            })
            .count()
    }

    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Array => format!("{}\n", self),
            OutputFormat::Plain => self
                .rows()
                .map(|row| row.iter().map(|c| format!("{} ", c)).join("") + "\n")
                .collect(),
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .cells
            .iter()
            .map(|c| c.to_string().len())
            .max()
            .unwrap_or(1);
        let last = self.size - 1;

        for (i, row) in self.rows().enumerate() {
            let open = if i == 0 { "[[" } else { " [" };
            let close = if i == last { "]]" } else { "]\n" };
            let cells = row.iter().map(|c| format!("{:>width$}", c)).join(" ");
            write!(f, "{}{}{}", open, cells, close)?;
        }
        Ok(())
    }
}
