//! Pipeline stage implementations.
//!
//! Each stage is a pure function from the pre-cycle latch it consumes (plus read-only
//! storage) to the latch it produces. The engine calls all five, then commits. It includes:
//! 1. **Fetch:** Reads the instruction at the PC, or a bubble past the end of the program.
//! 2. **Decode:** Reads source operands, seeing this cycle's write-back first.
//! 3. **Execute:** Performs the ALU operation and evaluates the branch predicate.
//! 4. **Memory:** Performs loads and validates stores.
//! 5. **Writeback:** Produces the pending register write.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

/// Decode stage entry point (ID stage).
pub use decode::decode_stage;
/// Execute stage entry point (EX stage).
pub use execute::execute_stage;
/// Fetch stage entry point (IF stage).
pub use fetch::fetch_stage;
/// Memory stage entry point (MEM stage).
pub use memory::mem_stage;
/// Writeback stage entry point (WB stage).
pub use writeback::{RegWrite, wb_stage};
