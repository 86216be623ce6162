//! Register-status table (Qi).
//!
//! Maps each architectural register to the tag of the station that will produce its
//! next value, or `None` if the value is in the register file. The newest issuing
//! instruction's tag always replaces an older one; this renaming is what resolves
//! WAR and WAW hazards.

use crate::common::error::SimError;
use crate::core::tomasulo::station::StationTag;

/// Per-register producer tags.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterStatus {
    producers: Vec<Option<StationTag>>,
}

impl RegisterStatus {
    /// Creates a table for `len` registers with no pending producers.
    pub fn new(len: usize) -> Self {
        Self {
            producers: vec![None; len],
        }
    }

    fn slot(&self, reg: usize) -> Result<usize, SimError> {
        if reg < self.producers.len() {
            Ok(reg)
        } else {
            Err(SimError::RegisterOutOfBounds {
                index: reg,
                len: self.producers.len(),
            })
        }
    }

    /// Records `tag` as the producer of `reg`'s next value.
    ///
    /// Register 0 is never tagged.
    pub fn set_producer(&mut self, reg: usize, tag: StationTag) -> Result<(), SimError> {
        let idx = self.slot(reg)?;
        if idx != 0 {
            self.producers[idx] = Some(tag);
        }
        Ok(())
    }

    /// Tag of the newest station producing `reg`, or `None` when the register file
    /// already holds its value.
    pub fn producer(&self, reg: usize) -> Result<Option<StationTag>, SimError> {
        Ok(self.producers[self.slot(reg)?])
    }

    /// Releases `reg` when its current producer is `tag`.
    ///
    /// # Returns
    ///
    /// `true` if the register was waiting on `tag` and should now receive its value;
    /// `false` if a newer instruction has re-tagged it (or the index is out of range).
    pub fn clear_if_match(&mut self, reg: usize, tag: StationTag) -> bool {
        match self.producers.get_mut(reg) {
            Some(slot) if *slot == Some(tag) => {
                *slot = None;
                true
            }
            _ => false,
        }
    }

    /// Returns `true` if no register has a pending writer.
    pub fn is_clear(&self) -> bool {
        self.producers.iter().all(Option::is_none)
    }

    /// Owned copy of the table.
    pub fn snapshot(&self) -> Vec<Option<StationTag>> {
        self.producers.clone()
    }

    /// Drops every pending producer.
    pub fn flush(&mut self) {
        self.producers.fill(None);
    }
}
