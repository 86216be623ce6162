//! Register File.
//!
//! This module provides the `RegisterFile` struct shared by both engines. It provides:
//! 1. **Fixed Width:** A register count fixed at construction (48 by default: `$0..$31`
//!    followed by `$f0..$f15`).
//! 2. **Hard-Wired Zero:** Register 0 always reads zero and ignores writes.
//! 3. **Observability:** Owned snapshots for callers that render state between cycles.

use tracing::warn;

use super::data::Word;
use super::error::SimError;

/// Fixed-width register file.
///
/// Every access is bounds-checked; an index at or beyond `len()` is a fatal
/// [`SimError::RegisterOutOfBounds`].
#[derive(Clone, Debug, PartialEq)]
pub struct RegisterFile<W: Word> {
    cells: Vec<W>,
}

impl<W: Word> RegisterFile<W> {
    /// Creates a register file with `len` registers, all zero.
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![W::default(); len],
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the file has no registers.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Verifies that `idx` names a register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index to validate.
    ///
    /// # Returns
    ///
    /// `Ok(())` when the index is in range, otherwise `RegisterOutOfBounds`.
    pub fn check(&self, idx: usize) -> Result<(), SimError> {
        if idx < self.cells.len() {
            Ok(())
        } else {
            Err(SimError::RegisterOutOfBounds {
                index: idx,
                len: self.cells.len(),
            })
        }
    }

    /// Reads a register. Register 0 always returns zero.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index.
    ///
    /// # Returns
    ///
    /// The stored value, or `RegisterOutOfBounds` for an index past the end.
    pub fn read(&self, idx: usize) -> Result<W, SimError> {
        self.check(idx)?;
        if idx == 0 {
            return Ok(W::default());
        }
        Ok(self.cells[idx])
    }

    /// Writes a register.
    ///
    /// Writes to register 0 are ignored. A non-numeric value is logged and stored
    /// as zero rather than rejected.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index.
    /// * `val` - The value to store.
    pub fn write(&mut self, idx: usize, val: W) -> Result<(), SimError> {
        self.check(idx)?;
        if idx == 0 {
            return Ok(());
        }
        self.cells[idx] = if val.is_numeric() {
            val
        } else {
            warn!(register = idx, value = %val, "non-numeric register write, storing zero");
            W::default()
        };
        Ok(())
    }

    /// Returns an owned copy of every register.
    pub fn snapshot(&self) -> Vec<W> {
        self.cells.clone()
    }

    /// Zeroes every register.
    pub fn reset(&mut self) {
        self.cells.fill(W::default());
    }
}
