//! Pipeline Latch and Observer Interfaces.
//!
//! This module defines the common traits for pipeline components. It provides:
//! 1. **Pipeline Latch Interface:** Flushing and emptiness checks shared by all four latches.
//! 2. **Observer Interface:** Optional callbacks for hazard and forward events.

use crate::core::pipeline::events::{ForwardEvent, HazardEvent};

/// Represents a pipeline latch (inter-stage buffer).
pub trait PipelineLatch {
    /// Replaces the entry with a bubble.
    ///
    /// Used when a taken branch squashes the younger instructions and when a stall
    /// holds decode back.
    fn flush(&mut self);

    /// Checks if the latch holds a bubble.
    ///
    /// # Returns
    ///
    /// `true` if the latch holds no program instruction.
    fn is_empty(&self) -> bool;
}

/// Receives pipeline events as cycles complete.
///
/// Callbacks run synchronously after a cycle has been committed and are never needed
/// for correctness. Both methods default to no-ops; `()` is the no-op observer.
pub trait PipelineObserver {
    /// Called for a taken branch (flush) or a data-hazard stall.
    fn on_hazard(&mut self, _event: &HazardEvent) {}

    /// Called once per operand value bypassed into decode.
    fn on_forward(&mut self, _event: &ForwardEvent) {}
}

impl PipelineObserver for () {}
