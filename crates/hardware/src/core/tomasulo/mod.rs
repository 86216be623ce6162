//! Tomasulo dynamic scheduling.
//!
//! Floating-point instructions issue in order into reservation stations and execute out
//! of order once their operands arrive over the common data bus (CDB). It includes:
//! 1. **Engine:** The per-cycle issue, execute and write-back logic.
//! 2. **Stations:** The ADD, MUL and MEM reservation-station pools.
//! 3. **Register Status:** Which station will produce each register.
//! 4. **Memory Queue:** Program order of loads and stores.
//! 5. **Events:** Per-instruction status transitions for observers.

/// The Tomasulo engine.
pub mod engine;

/// Status transition events and the observer trait.
pub mod events;

/// Memory order queue.
pub mod mem_queue;

/// Reservation stations, operands and station tags.
pub mod station;

/// Register-status (producer tag) table.
pub mod status;

pub use engine::TomasuloEngine;
pub use events::{InstructionStatus, StatusEvent, TomasuloObserver};
pub use station::{FuClass, Operand, Reservation, ReservationStation, StationTag};
