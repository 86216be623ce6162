//! Instruction pipeline implementation.
//!
//! This module contains the implementation of the five-stage in-order pipeline.
//! It includes the following components:
//! 1. **Engine:** The cycle driver that computes all stages, resolves hazards and commits.
//! 2. **Hazards:** Detection of data hazards and resolution by stalling or forwarding.
//! 3. **Latches:** Inter-stage buffers for communication between pipeline stages.
//! 4. **Stages:** Implementation of Fetch, Decode, Execute, Memory, and Writeback stages.
//! 5. **Traits and Events:** Latch interface and the optional observer callbacks.

/// The pipeline engine.
pub mod engine;

/// Hazard and forward event types.
pub mod events;

/// Pipeline hazard detection and forwarding logic.
pub mod hazards;

/// Inter-stage pipeline latches (IF/ID, ID/EX, EX/MEM, MEM/WB).
pub mod latches;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

/// Traits for pipeline latches and observers.
pub mod traits;

pub use engine::PipelineEngine;
pub use events::{ForwardEvent, HazardEvent, HazardKind};
pub use latches::PipelineLatches;
pub use traits::PipelineObserver;
