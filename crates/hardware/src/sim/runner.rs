//! Bounded run loop shared by both engines.

use tracing::{debug, warn};

use crate::common::error::SimError;

/// How far a run advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Exactly one cycle, even on a finished engine.
    Step,
    /// Until the engine reports it is finished.
    ToCompletion,
    /// Until the next instruction to fetch (pipeline) or issue (Tomasulo) has this
    /// program index, or the engine is finished.
    ToBreakpoint(usize),
}

/// A cycle-stepped execution engine.
pub trait Engine {
    /// Event sink passed to every step.
    type Observer: ?Sized;

    /// Advances one cycle, reporting events to `observer`.
    ///
    /// On error the engine is left as of the previous cycle.
    fn step_with(&mut self, observer: &mut Self::Observer) -> Result<(), SimError>;

    /// Returns `true` once no work remains.
    fn is_finished(&self) -> bool;

    /// Program index of the next instruction to enter the engine, if any.
    fn next_index(&self) -> Option<usize>;
}

/// Returns `true` when `mode` is satisfied after `steps` cycles.
fn reached<E: Engine + ?Sized>(engine: &E, mode: RunMode, steps: u64) -> bool {
    match mode {
        RunMode::Step => steps >= 1,
        RunMode::ToCompletion => engine.is_finished(),
        RunMode::ToBreakpoint(idx) => engine.is_finished() || engine.next_index() == Some(idx),
    }
}

/// Runs an engine in the given mode.
///
/// # Arguments
///
/// * `engine` - The engine to advance.
/// * `mode` - When to stop.
/// * `observer` - Event sink for every cycle of the run.
/// * `max_cycles` - Cycle ceiling for this call.
///
/// # Returns
///
/// The number of cycles simulated, or `DidNotTerminate` if the ceiling was reached
/// first. Errors from a cycle abort the run immediately.
pub fn run<E: Engine + ?Sized>(
    engine: &mut E,
    mode: RunMode,
    observer: &mut E::Observer,
    max_cycles: u64,
) -> Result<u64, SimError> {
    let mut steps = 0;
    while !reached(engine, mode, steps) {
        if steps >= max_cycles {
            warn!(limit = max_cycles, ?mode, "run exceeded cycle ceiling");
            return Err(SimError::DidNotTerminate { limit: max_cycles });
        }
        engine.step_with(observer)?;
        steps += 1;
    }
    debug!(?mode, steps, "run stopped");
    Ok(steps)
}
