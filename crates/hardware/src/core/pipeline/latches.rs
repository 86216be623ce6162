//! Pipeline latch structures for inter-stage communication.
//!
//! This module defines the entry types carried between the five stages:
//! Fetch → Decode → Execute → Memory → Writeback.
//!
//! 1. **Instruction Flow:** Each latch holds exactly one instruction, a bubble included.
//! 2. **Stage Scratch Values:** Fetched PC, operand values, ALU result, loaded value.
//! 3. **Whole-Latch Replacement:** The engine builds a fresh `PipelineLatches` each cycle
//!    and installs it in one assignment; entries are never patched in place.

use crate::core::pipeline::traits::PipelineLatch;
use crate::isa::Instruction;
use crate::isa::signals::WbSel;

/// Entry in the IF/ID pipeline latch (Fetch to Decode stage).
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct IfIdEntry {
    /// The fetched instruction.
    pub inst: Instruction,
    /// Index the instruction was fetched from.
    pub pc: usize,
}

/// Entry in the ID/EX pipeline latch (Decode to Execute stage).
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct IdExEntry {
    /// The decoded instruction.
    pub inst: Instruction,
    /// Index the instruction was fetched from.
    pub pc: usize,
    /// Value read (or forwarded) for `rs1`.
    pub rv1: i64,
    /// Value read (or forwarded) for `rs2`.
    pub rv2: i64,
    /// Immediate, zero when absent.
    pub imm: i64,
}

/// Entry in the EX/MEM pipeline latch (Execute to Memory stage).
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct ExMemEntry {
    /// The executed instruction.
    pub inst: Instruction,
    /// ALU result: arithmetic result, memory address, or branch target.
    pub alu: i64,
    /// Value a store writes to memory.
    pub store_data: i64,
}

/// Entry in the MEM/WB pipeline latch (Memory to Writeback stage).
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct MemWbEntry {
    /// The instruction.
    pub inst: Instruction,
    /// ALU result carried from EX/MEM.
    pub alu: i64,
    /// Value read by a load.
    pub load_data: i64,
}

impl MemWbEntry {
    /// Value this entry writes back (or forwards), chosen by the write-back select signal.
    pub const fn result(&self) -> i64 {
        match self.inst.ctrl.wb_sel {
            WbSel::Mem => self.load_data,
            WbSel::Alu => self.alu,
        }
    }
}

macro_rules! impl_latch {
    ($($entry:ty),*) => {
        $(impl PipelineLatch for $entry {
            fn flush(&mut self) {
                *self = Self::default();
            }

            fn is_empty(&self) -> bool {
                self.inst.is_bubble()
            }
        })*
    };
}

impl_latch!(IfIdEntry, IdExEntry, ExMemEntry, MemWbEntry);

/// The four inter-stage latches.
///
/// All four start as bubbles.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct PipelineLatches {
    /// IF/ID latch.
    pub if_id: IfIdEntry,
    /// ID/EX latch.
    pub id_ex: IdExEntry,
    /// EX/MEM latch.
    pub ex_mem: ExMemEntry,
    /// MEM/WB latch.
    pub mem_wb: MemWbEntry,
}

impl PipelineLatches {
    /// Returns `true` when no latch holds a program instruction.
    pub fn is_empty(&self) -> bool {
        self.if_id.is_empty() && self.id_ex.is_empty() && self.ex_mem.is_empty() && self.mem_wb.is_empty()
    }
}
