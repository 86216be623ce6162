//! Data memory.
//!
//! A flat array of cells addressed by cell index (not bytes). Addresses are signed at
//! the call site because they come out of the data path; negative addresses are out
//! of bounds like any other address past the end.

use tracing::warn;

use super::data::Word;
use super::error::SimError;

/// Fixed-size, bounds-checked data memory.
#[derive(Clone, Debug, PartialEq)]
pub struct DataMemory<W: Word> {
    cells: Vec<W>,
}

impl<W: Word> DataMemory<W> {
    /// Creates a memory of `size` cells, all zero.
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![W::default(); size],
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the memory has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Converts a data-path address to a cell index.
    ///
    /// # Returns
    ///
    /// The cell index, or `MemoryOutOfBounds` for negative or too-large addresses.
    pub fn check(&self, address: i64) -> Result<usize, SimError> {
        usize::try_from(address)
            .ok()
            .filter(|&idx| idx < self.cells.len())
            .ok_or(SimError::MemoryOutOfBounds {
                address,
                len: self.cells.len(),
            })
    }

    /// Reads the cell at `address`.
    pub fn read(&self, address: i64) -> Result<W, SimError> {
        let idx = self.check(address)?;
        Ok(self.cells[idx])
    }

    /// Writes the cell at `address`, storing zero for a non-numeric value.
    pub fn write(&mut self, address: i64, val: W) -> Result<(), SimError> {
        let idx = self.check(address)?;
        self.cells[idx] = if val.is_numeric() {
            val
        } else {
            warn!(address, value = %val, "non-numeric memory write, storing zero");
            W::default()
        };
        Ok(())
    }

    /// Returns an owned copy of every cell.
    pub fn snapshot(&self) -> Vec<W> {
        self.cells.clone()
    }

    /// Zeroes every cell.
    pub fn reset(&mut self) {
        self.cells.fill(W::default());
    }
}
