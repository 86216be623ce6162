//! Educational CPU pipeline simulator library.
//!
//! This crate models two classic microarchitectures cycle by cycle:
//! 1. **Pipeline:** A five-stage in-order integer pipeline with hazard detection,
//!    optional forwarding and predict-not-taken branches.
//! 2. **Tomasulo:** Floating-point dynamic scheduling with reservation stations, a
//!    common data bus and a memory order queue.
//! 3. **ISA:** The opcode set, control-signal decoder and a two-pass assembler.
//! 4. **Simulation:** Run modes, configuration and statistics.
//!
//! # Example
//!
//! ```
//! use pipesim_core::{Config, PipelineEngine, RunMode, assemble};
//!
//! let program = assemble("li $1, 2\nli $2, 3\nadd $3, $1, $2").unwrap();
//! let mut engine = PipelineEngine::new(program, &Config::default()).unwrap();
//! engine.run(RunMode::ToCompletion).unwrap();
//! assert_eq!(engine.register(3).unwrap(), 5);
//! ```

/// Common types (cell values, register file, data memory, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Execution engines (pipeline and Tomasulo).
pub mod core;
/// Instruction set (opcodes, control signals, ABI names, assembler).
pub mod isa;
/// Run modes and the bounded run loop.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

pub use crate::common::error::{AsmError, SimError};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The two engines.
pub use crate::core::{PipelineEngine, TomasuloEngine};
pub use crate::isa::{Program, assemble};
pub use crate::sim::RunMode;
pub use crate::stats::{PipelineStats, TomasuloStats};
