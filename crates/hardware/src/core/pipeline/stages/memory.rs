//! Memory Access (MEM) Stage.
//!
//! This module implements the fourth stage of the instruction pipeline. It performs
//! loads immediately and returns stores as a pending write so that the engine commits
//! them together with the rest of the cycle.

use tracing::trace;

use crate::common::error::SimError;
use crate::common::memory::DataMemory;
use crate::core::pipeline::latches::{ExMemEntry, MemWbEntry};

/// A validated store waiting to be committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemWrite {
    /// Target address.
    pub address: i64,
    /// Value to store.
    pub value: i64,
}

/// Executes the memory stage.
///
/// # Arguments
///
/// * `ex_mem` - The EX/MEM entry executed last cycle.
/// * `mem` - Data memory as of the previous cycle.
///
/// # Returns
///
/// The new MEM/WB entry and the store to commit, or `MemoryOutOfBounds` if the
/// load or store address is outside data memory.
pub fn mem_stage(
    ex_mem: &ExMemEntry,
    mem: &DataMemory<i64>,
) -> Result<(MemWbEntry, Option<MemWrite>), SimError> {
    let ctrl = ex_mem.inst.ctrl;
    let load_data = if ctrl.mem_read {
        mem.read(ex_mem.alu)?
    } else {
        0
    };
    let store = if ctrl.mem_write {
        let _ = mem.check(ex_mem.alu)?;
        Some(MemWrite {
            address: ex_mem.alu,
            value: ex_mem.store_data,
        })
    } else {
        None
    };
    if ctrl.mem_read || ctrl.mem_write {
        trace!(inst = %ex_mem.inst, address = ex_mem.alu, load_data, "MEM");
    }
    Ok((
        MemWbEntry {
            inst: ex_mem.inst.clone(),
            alu: ex_mem.alu,
            load_data,
        },
        store,
    ))
}
