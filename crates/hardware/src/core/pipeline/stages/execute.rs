//! Execute (EX) Stage.
//!
//! This module implements the third stage of the pipeline. It performs the following:
//! 1. **Operand Selection:** Chooses ALU inputs from registers, the PC, or the immediate.
//! 2. **ALU Execution:** Computes arithmetic results, memory addresses and branch targets.
//! 3. **Branch Resolution:** Evaluates the branch predicate over the two register operands.

use tracing::trace;

use crate::core::pipeline::latches::{ExMemEntry, IdExEntry};
use crate::isa::signals::{OpASrc, OpBSrc};

/// Executes the execute stage.
///
/// # Arguments
///
/// * `id_ex` - The ID/EX entry decoded last cycle.
///
/// # Returns
///
/// The new EX/MEM entry and whether a branch resolved taken. For a taken branch the
/// entry's `alu` field holds the target index.
pub fn execute_stage(id_ex: &IdExEntry) -> (ExMemEntry, bool) {
    let ctrl = id_ex.inst.ctrl;
    let a = match ctrl.a_src {
        OpASrc::Reg1 => id_ex.rv1,
        OpASrc::Pc => id_ex.pc as i64,
    };
    let b = match ctrl.b_src {
        OpBSrc::Reg2 => id_ex.rv2,
        OpBSrc::Imm => id_ex.imm,
    };
    let alu = ctrl.alu.eval_i64(a, b);
    let taken = ctrl.branch.taken(id_ex.rv1, id_ex.rv2);
    trace!(pc = id_ex.pc, inst = %id_ex.inst, alu, taken, "EX");
    (
        ExMemEntry {
            inst: id_ex.inst.clone(),
            alu,
            store_data: id_ex.rv2,
        },
        taken,
    )
}
