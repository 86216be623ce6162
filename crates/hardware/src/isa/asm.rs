//! Two-pass assembler.
//!
//! Turns program text into a label-resolved [`Program`]. It provides:
//! 1. **Pass One:** Strips `#` comments and blank lines, records `label:` definitions
//!    (a label may share its line with an instruction) and parses operands.
//! 2. **Pass Two:** Resolves label immediates to `target_index - own_index`.
//!
//! Assembly is a pure function; errors are reported before any engine exists.

use std::collections::HashMap;

use super::abi::{REG_ZERO, register_index};
use super::instruction::{Instruction, Opcode, Program};
use crate::common::error::AsmError;

/// Operand layout of an opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// `rd, rs1, rs2`
    Reg3,
    /// `rd, rs1, imm`
    RegImm,
    /// `rd, off(base)`
    Load,
    /// `rs2, off(base)`
    Store,
    /// `rs1, rs2, target`
    Branch,
    /// `rs1, target`
    BranchZero,
    /// `rd, imm`
    LoadImm,
    /// `rd, rs1`
    Move,
    /// `target`
    Jump,
    /// no operands
    Bare,
}

impl Format {
    const fn of(op: Opcode) -> Self {
        match op {
            Opcode::Add
            | Opcode::Sub
            | Opcode::And
            | Opcode::Or
            | Opcode::Xor
            | Opcode::Sll
            | Opcode::Srl
            | Opcode::Sra
            | Opcode::AddD
            | Opcode::SubD
            | Opcode::MulD
            | Opcode::DivD => Self::Reg3,
            Opcode::Addi
            | Opcode::Andi
            | Opcode::Ori
            | Opcode::Xori
            | Opcode::Slli
            | Opcode::Srli
            | Opcode::Srai => Self::RegImm,
            Opcode::Lw | Opcode::LoadD => Self::Load,
            Opcode::Sw | Opcode::StoreD => Self::Store,
            Opcode::Beq | Opcode::Bne | Opcode::Bgt | Opcode::Bge | Opcode::Blt | Opcode::Ble => {
                Self::Branch
            }
            Opcode::Beqz | Opcode::Bnez => Self::BranchZero,
            Opcode::Li => Self::LoadImm,
            Opcode::Mv => Self::Move,
            Opcode::J => Self::Jump,
            Opcode::Nop => Self::Bare,
        }
    }

    const fn operand_count(self) -> usize {
        match self {
            Self::Reg3 | Self::RegImm | Self::Branch => 3,
            Self::Load | Self::Store | Self::BranchZero | Self::LoadImm | Self::Move => 2,
            Self::Jump => 1,
            Self::Bare => 0,
        }
    }
}

/// An immediate before label resolution.
#[derive(Clone, Debug)]
enum Imm {
    Value(i64),
    Label(String),
}

/// Output of pass one for a single instruction.
#[derive(Debug)]
struct Pending {
    line: usize,
    inst: Instruction,
    label: Option<String>,
}

/// Assembles program text.
///
/// # Arguments
///
/// * `source` - Program text, one instruction per line.
///
/// # Returns
///
/// The label-resolved program, or the first error found (with its 1-based line).
///
/// # Examples
///
/// ```
/// use pipesim_core::isa::asm::assemble;
///
/// let program = assemble("loop: addi $1, $1, -1\n bnez $1, loop # spin").unwrap();
/// assert_eq!(program.len(), 2);
/// assert_eq!(program.get(1).unwrap().imm, Some(-1));
/// ```
pub fn assemble(source: &str) -> Result<Program, AsmError> {
    let mut labels: HashMap<String, (usize, usize)> = HashMap::new();
    let mut pending = Vec::new();

    for (line_idx, text) in source.lines().enumerate() {
        let line = line_idx + 1;
        let code = text.split('#').next().unwrap_or_default().trim();
        if code.is_empty() {
            continue;
        }

        let code = match code.split_once(':') {
            Some((label, rest)) => {
                let label = label.trim();
                if label.is_empty() || label.contains(char::is_whitespace) {
                    return Err(AsmError::InvalidLabel {
                        line,
                        label: label.to_string(),
                    });
                }
                if let Some(&(_, first)) = labels.get(label) {
                    return Err(AsmError::DuplicateLabel {
                        line,
                        label: label.to_string(),
                        first,
                    });
                }
                let _ = labels.insert(label.to_string(), (pending.len(), line));
                rest.trim()
            }
            None => code,
        };
        if code.is_empty() {
            continue;
        }

        pending.push(parse_line(code, line)?);
    }

    let insts = pending
        .into_iter()
        .enumerate()
        .map(|(own, p)| match p.label {
            Some(label) => match labels.get(&label) {
                Some(&(target, _)) => Ok(Instruction {
                    imm: Some(target as i64 - own as i64),
                    ..p.inst
                }),
                None => Err(AsmError::UndefinedLabel {
                    line: p.line,
                    label,
                }),
            },
            None => Ok(p.inst),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Program::new(insts))
}

/// Parses one label-free instruction.
fn parse_line(code: &str, line: usize) -> Result<Pending, AsmError> {
    let (mnemonic, rest) = code
        .split_once(char::is_whitespace)
        .map_or((code, ""), |(m, r)| (m, r.trim()));
    let op = Opcode::from_mnemonic(mnemonic).ok_or_else(|| AsmError::UnknownMnemonic {
        line,
        mnemonic: mnemonic.to_string(),
    })?;

    let args: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split(',').map(str::trim).collect()
    };
    let format = Format::of(op);
    if args.len() != format.operand_count() {
        return Err(AsmError::OperandCount {
            line,
            mnemonic: mnemonic.to_string(),
            expected: format.operand_count(),
            found: args.len(),
        });
    }

    let reg = |token: &str| {
        register_index(token).ok_or_else(|| AsmError::InvalidRegister {
            line,
            token: token.to_string(),
        })
    };

    let (rs1, rs2, rd, imm) = match format {
        Format::Reg3 => (
            Some(reg(args[1])?),
            Some(reg(args[2])?),
            Some(reg(args[0])?),
            None,
        ),
        Format::RegImm => (
            Some(reg(args[1])?),
            None,
            Some(reg(args[0])?),
            Some(immediate(args[2], line)?),
        ),
        Format::Load => {
            let (offset, base) = address(args[1], line)?;
            (Some(base), None, Some(reg(args[0])?), Some(Imm::Value(offset)))
        }
        Format::Store => {
            let (offset, base) = address(args[1], line)?;
            (Some(base), Some(reg(args[0])?), None, Some(Imm::Value(offset)))
        }
        Format::Branch => (
            Some(reg(args[0])?),
            Some(reg(args[1])?),
            None,
            Some(immediate(args[2], line)?),
        ),
        Format::BranchZero => (
            Some(reg(args[0])?),
            Some(REG_ZERO),
            None,
            Some(immediate(args[1], line)?),
        ),
        Format::LoadImm => (
            Some(REG_ZERO),
            None,
            Some(reg(args[0])?),
            Some(immediate(args[1], line)?),
        ),
        Format::Move => (
            Some(reg(args[1])?),
            None,
            Some(reg(args[0])?),
            Some(Imm::Value(0)),
        ),
        Format::Jump => (
            Some(REG_ZERO),
            Some(REG_ZERO),
            None,
            Some(immediate(args[0], line)?),
        ),
        Format::Bare => (None, None, None, None),
    };

    let (imm, label) = match imm {
        Some(Imm::Value(v)) => (Some(v), None),
        // Placeholder until pass two.
        Some(Imm::Label(l)) => (Some(0), Some(l)),
        None => (None, None),
    };

    Ok(Pending {
        line,
        inst: Instruction::new(op, rs1, rs2, rd, imm, code),
        label,
    })
}

/// Parses an integer literal (decimal or `0x` hex, optionally signed).
fn integer(token: &str) -> Option<i64> {
    let (negative, digits) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Parses an immediate: an integer literal or a label reference.
fn immediate(token: &str, line: usize) -> Result<Imm, AsmError> {
    if let Some(value) = integer(token) {
        return Ok(Imm::Value(value));
    }
    let is_label = token
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '.')
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if is_label {
        Ok(Imm::Label(token.to_string()))
    } else {
        Err(AsmError::InvalidImmediate {
            line,
            token: token.to_string(),
        })
    }
}

/// Parses an `offset($base)` memory operand; an empty offset is zero.
fn address(token: &str, line: usize) -> Result<(i64, usize), AsmError> {
    let malformed = || AsmError::InvalidAddress {
        line,
        token: token.to_string(),
    };
    let (offset, rest) = token.split_once('(').ok_or_else(malformed)?;
    let base = rest.strip_suffix(')').ok_or_else(malformed)?;
    let offset = offset.trim();
    let offset = if offset.is_empty() {
        0
    } else {
        integer(offset).ok_or_else(malformed)?
    };
    let base = register_index(base).ok_or_else(|| AsmError::InvalidRegister {
        line,
        token: base.trim().to_string(),
    })?;
    Ok((offset, base))
}
