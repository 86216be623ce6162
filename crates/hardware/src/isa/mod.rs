//! Instruction Set Definitions.
//!
//! Contains the opcode set, the decoded instruction record, the control-signal decoder
//! and the assembler that produces label-resolved programs.
//!
//! # Profiles
//!
//! * Pipeline: integer R/I-type ALU ops, `lw`/`sw`, conditional branches and the
//!   `li`/`mv`/`j`/`nop` pseudo-instructions.
//! * Tomasulo: `L.D`, `S.D`, `ADD.D`, `SUB.D`, `MUL.D`, `DIV.D`.

/// Register name mappings (`$N`, `$fN`, ABI names).
pub mod abi;

/// Two-pass assembler producing label-resolved programs.
pub mod asm;

/// Opcode to control-signal decoding.
pub mod decode;

/// Opcodes, decoded instruction records and programs.
pub mod instruction;

/// Control signals shared by both engines.
pub mod signals;

pub use asm::assemble;
pub use instruction::{Instruction, Opcode, Profile, Program};
pub use signals::ControlSignals;
