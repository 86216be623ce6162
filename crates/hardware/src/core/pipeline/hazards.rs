//! Data Hazard Detection and Forwarding.
//!
//! This module implements the logic for maintaining pipeline consistency when data
//! dependencies exist between instructions. It provides:
//! 1. **Hazard Detection:** Read-after-write checks of the instruction entering ID/EX
//!    against the producers entering EX/MEM and MEM/WB.
//! 2. **Operand Forwarding:** Bypassing EX/MEM and MEM/WB results into the decoded operands.
//! 3. **Load-Use Detection:** Stalling when the EX/MEM producer is a load, whose value
//!    only exists after the memory stage.
//!
//! All checks run on the latch values produced in the current cycle. Register 0 never
//! collides.

use crate::core::pipeline::latches::{ExMemEntry, IdExEntry, MemWbEntry};
use crate::isa::Instruction;

/// Operand slot of the consuming instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandSlot {
    /// `rs1` / `rv1`.
    Rs1,
    /// `rs2` / `rv2`.
    Rs2,
}

/// A value to bypass into the ID/EX entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Forward {
    /// Operand slot receiving the value.
    pub slot: OperandSlot,
    /// Register being forwarded.
    pub register: usize,
    /// Forwarded value.
    pub value: i64,
    /// Producing instruction.
    pub source: Instruction,
}

impl Forward {
    /// Writes the forwarded value into its operand slot.
    pub fn apply(&self, id_ex: &mut IdExEntry) {
        match self.slot {
            OperandSlot::Rs1 => id_ex.rv1 = self.value,
            OperandSlot::Rs2 => id_ex.rv2 = self.value,
        }
    }
}

/// Result of checking the instruction entering ID/EX.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HazardOutcome {
    /// No dependency on an in-flight producer.
    Clear,
    /// Decode must be replaced by a bubble and re-run next cycle.
    Stall {
        /// Register the consumer is waiting for.
        register: usize,
        /// The in-flight producer of that register.
        producer: Instruction,
    },
    /// Every dependency can be satisfied by bypassing.
    Forward(Vec<Forward>),
}

/// Returns `true` if `src` is produced by `producer`.
fn collides(src: usize, producer: &Instruction) -> bool {
    src != 0 && producer.dest() == Some(src)
}

/// Source operands of the consumer, paired with their slots.
fn sources(id_ex: &IdExEntry) -> impl Iterator<Item = (OperandSlot, usize)> {
    [
        (OperandSlot::Rs1, id_ex.inst.rs1),
        (OperandSlot::Rs2, id_ex.inst.rs2),
    ]
    .into_iter()
    .filter_map(|(slot, reg)| reg.map(|r| (slot, r)))
}

/// Checks for a read-after-write hazard with forwarding disabled.
///
/// # Arguments
///
/// * `id_ex` - The instruction entering execute next cycle.
/// * `ex_mem` - The producer one stage ahead.
/// * `mem_wb` - The producer two stages ahead.
///
/// # Returns
///
/// `Stall` naming the first colliding register (EX/MEM checked before MEM/WB),
/// otherwise `Clear`.
pub fn detect_stall(id_ex: &IdExEntry, ex_mem: &ExMemEntry, mem_wb: &MemWbEntry) -> HazardOutcome {
    for (_, reg) in sources(id_ex) {
        for producer in [&ex_mem.inst, &mem_wb.inst] {
            if collides(reg, producer) {
                return HazardOutcome::Stall {
                    register: reg,
                    producer: producer.clone(),
                };
            }
        }
    }
    HazardOutcome::Clear
}

/// Resolves read-after-write hazards with forwarding enabled.
///
/// Each source operand is matched against EX/MEM first, then MEM/WB. An EX/MEM match on
/// a load is a load-use hazard: the whole check resolves to `Stall` and any forwards found
/// for the other operand are discarded with the bubbled ID/EX entry.
///
/// # Arguments
///
/// * `id_ex` - The instruction entering execute next cycle.
/// * `ex_mem` - The producer one stage ahead.
/// * `mem_wb` - The producer two stages ahead.
///
/// # Returns
///
/// `Stall` for a load-use hazard, `Forward` with one entry per bypassed operand
/// (`rs1 == rs2` yields two), or `Clear`.
pub fn resolve_forwarding(
    id_ex: &IdExEntry,
    ex_mem: &ExMemEntry,
    mem_wb: &MemWbEntry,
) -> HazardOutcome {
    let mut forwards = Vec::new();
    for (slot, reg) in sources(id_ex) {
        if collides(reg, &ex_mem.inst) {
            if ex_mem.inst.ctrl.mem_read {
                return HazardOutcome::Stall {
                    register: reg,
                    producer: ex_mem.inst.clone(),
                };
            }
            forwards.push(Forward {
                slot,
                register: reg,
                value: ex_mem.alu,
                source: ex_mem.inst.clone(),
            });
        } else if collides(reg, &mem_wb.inst) {
            forwards.push(Forward {
                slot,
                register: reg,
                value: mem_wb.result(),
                source: mem_wb.inst.clone(),
            });
        }
    }
    if forwards.is_empty() {
        HazardOutcome::Clear
    } else {
        HazardOutcome::Forward(forwards)
    }
}
