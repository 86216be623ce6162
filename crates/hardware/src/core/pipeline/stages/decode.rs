//! Instruction Decode (ID) Stage.
//!
//! This module implements the second stage of the pipeline. It performs the following:
//! 1. **Register Read:** Reads source operands `rs1` and `rs2` from the Register File.
//! 2. **Write-First Bypass:** A register being written back in the same cycle is read
//!    with its new value.
//! 3. **Immediate Extraction:** Carries the immediate (zero when absent) into ID/EX.
//!
//! Hazard checks happen after all stages have run, in the engine.

use tracing::trace;

use super::writeback::RegWrite;
use crate::common::error::SimError;
use crate::common::reg::RegisterFile;
use crate::core::pipeline::latches::{IdExEntry, IfIdEntry};

/// Reads a register, seeing `pending` first.
fn read_operand(
    regs: &RegisterFile<i64>,
    pending: Option<RegWrite>,
    idx: Option<usize>,
) -> Result<i64, SimError> {
    let Some(idx) = idx else {
        return Ok(0);
    };
    match pending {
        Some(w) if w.rd == idx => Ok(w.value),
        _ => regs.read(idx),
    }
}

/// Executes the instruction decode stage.
///
/// # Arguments
///
/// * `if_id` - The IF/ID entry fetched last cycle.
/// * `regs` - The register file as of the previous cycle.
/// * `pending` - The register write the writeback stage performs this cycle.
///
/// # Returns
///
/// The new ID/EX entry, or `RegisterOutOfBounds` for a source index past the file.
pub fn decode_stage(
    if_id: &IfIdEntry,
    regs: &RegisterFile<i64>,
    pending: Option<RegWrite>,
) -> Result<IdExEntry, SimError> {
    let inst = &if_id.inst;
    let rv1 = read_operand(regs, pending, inst.rs1)?;
    let rv2 = read_operand(regs, pending, inst.rs2)?;
    trace!(pc = if_id.pc, %inst, rv1, rv2, "ID");
    Ok(IdExEntry {
        inst: inst.clone(),
        pc: if_id.pc,
        rv1,
        rv2,
        imm: inst.imm.unwrap_or(0),
    })
}
