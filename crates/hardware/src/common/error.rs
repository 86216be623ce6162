//! Simulation and assembly error definitions.
//!
//! This module defines the fatal error conditions of the simulator. It provides:
//! 1. **Bounds Errors:** Register, memory and instruction indices outside their storage.
//! 2. **Construction Errors:** Unsupported instructions and invalid configuration.
//! 3. **Run Errors:** Programs that exceed the run controller's cycle ceiling.
//! 4. **Assembly Errors:** Source-level errors raised before any engine is built.
//!
//! Non-numeric writes are not errors: storage coerces them to zero and logs a warning.

use thiserror::Error;

/// Fatal simulation error.
///
/// An engine that returns one of these from `tick`/`step` has not committed any part of
/// the failing cycle; its state is exactly as of the last successful cycle.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SimError {
    /// A register index is outside the register file.
    #[error("register index {index} out of bounds (register file has {len} registers)")]
    RegisterOutOfBounds {
        /// The offending register index.
        index: usize,
        /// Number of registers in the file.
        len: usize,
    },

    /// A memory address is outside the data memory.
    #[error("memory address {address} out of bounds (memory has {len} cells)")]
    MemoryOutOfBounds {
        /// The offending address.
        address: i64,
        /// Number of cells in the memory.
        len: usize,
    },

    /// A computed floating-point address is not a whole number.
    #[error("computed memory address {value} is not a whole number")]
    InvalidAddress {
        /// The computed address.
        value: f64,
    },

    /// The program counter left the instruction memory.
    #[error("instruction index {index} out of bounds (instruction memory holds {limit})")]
    InstructionOutOfBounds {
        /// The offending instruction index.
        index: i64,
        /// Capacity of the instruction memory.
        limit: usize,
    },

    /// An instruction was handed to the engine that cannot execute it.
    #[error("instruction `{raw}` is not supported by the {engine} engine")]
    UnsupportedInstruction {
        /// Source text of the instruction.
        raw: String,
        /// Name of the rejecting engine.
        engine: &'static str,
    },

    /// A configuration value is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A run exceeded its cycle ceiling without finishing.
    #[error("simulation did not terminate within {limit} cycles")]
    DidNotTerminate {
        /// The cycle ceiling that was exceeded.
        limit: u64,
    },

    /// The source program could not be assembled.
    #[error(transparent)]
    Assembly(#[from] AsmError),
}

/// Assembly error, tagged with the 1-based source line it was found on.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AsmError {
    /// The mnemonic is not part of the instruction set.
    #[error("line {line}: unknown instruction `{mnemonic}`")]
    UnknownMnemonic {
        /// Source line.
        line: usize,
        /// The unrecognised mnemonic.
        mnemonic: String,
    },

    /// The instruction has the wrong number of operands.
    #[error("line {line}: `{mnemonic}` expects {expected} operands, found {found}")]
    OperandCount {
        /// Source line.
        line: usize,
        /// The instruction mnemonic.
        mnemonic: String,
        /// Operands the instruction takes.
        expected: usize,
        /// Operands that were written.
        found: usize,
    },

    /// A register operand is not `$N`, `$fN` or an ABI name.
    #[error("line {line}: invalid register `{token}`")]
    InvalidRegister {
        /// Source line.
        line: usize,
        /// The offending operand.
        token: String,
    },

    /// A memory operand is not of the form `offset($base)`.
    #[error("line {line}: malformed address `{token}`, expected offset($base)")]
    InvalidAddress {
        /// Source line.
        line: usize,
        /// The offending operand.
        token: String,
    },

    /// An immediate operand is neither an integer nor a label.
    #[error("line {line}: invalid immediate `{token}`")]
    InvalidImmediate {
        /// Source line.
        line: usize,
        /// The offending operand.
        token: String,
    },

    /// A label definition is empty or contains whitespace.
    #[error("line {line}: invalid label `{label}`")]
    InvalidLabel {
        /// Source line.
        line: usize,
        /// The offending label text.
        label: String,
    },

    /// A branch or jump names a label that is never defined.
    #[error("line {line}: undefined label `{label}`")]
    UndefinedLabel {
        /// Source line of the reference.
        line: usize,
        /// The missing label.
        label: String,
    },

    /// A label is defined more than once.
    #[error("line {line}: label `{label}` already defined on line {first}")]
    DuplicateLabel {
        /// Source line of the second definition.
        line: usize,
        /// The duplicated label.
        label: String,
        /// Source line of the first definition.
        first: usize,
    },
}
