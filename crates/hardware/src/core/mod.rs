//! Execution engines.
//!
//! Two cycle-level models share the ISA, storage and run-control layers:
//! the five-stage in-order integer pipeline and the Tomasulo floating-point scheduler.

/// Five-stage in-order pipeline (latches, stages, hazards, forwarding).
pub mod pipeline;

/// Tomasulo dynamic scheduling (reservation stations, CDB, memory order queue).
pub mod tomasulo;

pub use self::pipeline::PipelineEngine;
pub use self::tomasulo::TomasuloEngine;
