//! Tomasulo observability events.

use std::fmt;

use crate::isa::Instruction;

/// Lifecycle transitions reported per instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionStatus {
    /// Placed in a reservation station.
    Issued,
    /// Operands ready (and, for memory ops, at the queue head); countdown started.
    ExecuteStart,
    /// Countdown reached zero.
    ExecuteEnd,
    /// Result broadcast on the CDB, or a store's memory write.
    WriteBack,
}

impl fmt::Display for InstructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Issued => "issued",
            Self::ExecuteStart => "execute-start",
            Self::ExecuteEnd => "execute-end",
            Self::WriteBack => "write-back",
        })
    }
}

/// A status transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusEvent {
    /// 1-based cycle of the transition.
    pub cycle: u64,
    /// The instruction.
    pub instruction: Instruction,
    /// New status.
    pub status: InstructionStatus,
}

/// Receives Tomasulo status transitions after each committed cycle.
///
/// `()` is the no-op observer.
pub trait TomasuloObserver {
    /// Called once per transition.
    fn on_status(&mut self, _event: &StatusEvent) {}
}

impl TomasuloObserver for () {}
