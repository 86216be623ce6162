//! Writeback (WB) Stage.
//!
//! This module implements the final stage of the instruction pipeline. It selects the
//! result of the MEM/WB instruction and returns it as a pending register write. Decode
//! reads through that write in the same cycle.

use tracing::trace;

use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::core::pipeline::latches::MemWbEntry;

/// A validated register write waiting to be committed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegWrite {
    /// Destination register (never 0).
    pub rd: usize,
    /// Value to write.
    pub value: i64,
}

/// Executes the writeback stage.
///
/// # Arguments
///
/// * `mem_wb` - The MEM/WB entry produced last cycle.
/// * `regs` - The register file, used only for bounds validation.
///
/// # Returns
///
/// The register write to commit, `None` for instructions that write nothing, or
/// `RegisterOutOfBounds` for a destination past the file.
pub fn wb_stage(mem_wb: &MemWbEntry, regs: &RegisterFile<i64>) -> Result<Option<RegWrite>, SimError> {
    let Some(rd) = mem_wb.inst.dest() else {
        return Ok(None);
    };
    regs.check(rd)?;
    let value = mem_wb.result();
    trace!(inst = %mem_wb.inst, rd, value, "WB");
    Ok(Some(RegWrite { rd, value }))
}
