//! Instruction Fetch (IF) Stage.
//!
//! This module implements the first stage of the instruction pipeline. It reads the
//! instruction at the current Program Counter. Prediction is fixed at not-taken, so the
//! engine always advances the PC sequentially unless a branch resolves taken in EX.

use tracing::trace;

use crate::common::error::SimError;
use crate::core::pipeline::latches::IfIdEntry;
use crate::isa::{Instruction, Program};

/// Capacity of the instruction memory in instructions.
///
/// Fetching at or beyond this index is fatal; fetching past the end of a shorter
/// program yields a bubble.
pub const INSTRUCTION_MEMORY_SIZE: usize = 1000;

/// Executes the instruction fetch stage.
///
/// # Arguments
///
/// * `program` - The instruction memory contents.
/// * `pc` - Index to fetch from.
///
/// # Returns
///
/// The new IF/ID entry, or `InstructionOutOfBounds` if `pc` is outside instruction memory.
pub fn fetch_stage(program: &Program, pc: usize) -> Result<IfIdEntry, SimError> {
    if pc >= INSTRUCTION_MEMORY_SIZE {
        return Err(SimError::InstructionOutOfBounds {
            index: pc as i64,
            limit: INSTRUCTION_MEMORY_SIZE,
        });
    }
    let inst = program.get(pc).cloned().unwrap_or_else(Instruction::bubble);
    trace!(pc, %inst, "IF");
    Ok(IfIdEntry { inst, pc })
}
