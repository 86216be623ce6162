//! Pipeline observability events.

use std::fmt;

use crate::isa::Instruction;

/// Cause of a hazard event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    /// A taken branch flushed IF/ID and ID/EX.
    Branch,
    /// A read-after-write dependency stalled decode.
    Data,
}

impl fmt::Display for HazardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// A flush or stall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HazardEvent {
    /// 1-based cycle in which the hazard was acted on.
    pub cycle: u64,
    /// Cause.
    pub kind: HazardKind,
    /// The branch (for `Branch`) or the stalled consumer (for `Data`).
    pub instruction: Instruction,
    /// Human-readable explanation.
    pub description: String,
}

/// An operand value bypassed from a later stage into decode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardEvent {
    /// 1-based cycle of the forward.
    pub cycle: u64,
    /// Producing instruction (in EX/MEM or MEM/WB).
    pub source: Instruction,
    /// Consuming instruction (entering ID/EX).
    pub target: Instruction,
    /// Forwarded register.
    pub register: usize,
    /// Forwarded value.
    pub value: i64,
}
