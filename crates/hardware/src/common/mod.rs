//! Common types shared by both execution engines.
//!
//! This module provides the storage and error building blocks that the pipeline and
//! the Tomasulo engine are layered on. It includes:
//! 1. **Cell Values:** The `Word` trait for the integer and floating-point data paths.
//! 2. **Register Management:** A fixed-width register file with a hard-wired zero register.
//! 3. **Data Memory:** A fixed-size, bounds-checked data memory.
//! 4. **Error Handling:** Fatal simulation errors and assembler errors.

/// Cell value abstraction (`i64` for the pipeline, `f64` for Tomasulo).
pub mod data;

/// Error types for simulation and assembly.
pub mod error;

/// Data memory implementation.
pub mod memory;

/// Register file implementation.
pub mod reg;

pub use data::Word;
pub use error::{AsmError, SimError};
pub use memory::DataMemory;
pub use reg::RegisterFile;
