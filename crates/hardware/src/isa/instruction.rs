//! Decoded instruction records.
//!
//! Provides the opcode set, the single instruction record that both engines consume,
//! and the label-resolved program sequence produced by the assembler.

use std::fmt;
use std::sync::Arc;

use super::decode::control_signals;
use super::signals::ControlSignals;

/// Which engine an opcode belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Profile {
    /// Integer opcodes executed by the in-order pipeline.
    Pipeline,
    /// Double-precision opcodes executed by the Tomasulo engine.
    Tomasulo,
}

/// Instruction opcodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `add rd, rs1, rs2`
    Add,
    /// `sub rd, rs1, rs2`
    Sub,
    /// `and rd, rs1, rs2`
    And,
    /// `or rd, rs1, rs2`
    Or,
    /// `xor rd, rs1, rs2`
    Xor,
    /// `sll rd, rs1, rs2`
    Sll,
    /// `srl rd, rs1, rs2`
    Srl,
    /// `sra rd, rs1, rs2`
    Sra,
    /// `addi rd, rs1, imm`
    Addi,
    /// `andi rd, rs1, imm`
    Andi,
    /// `ori rd, rs1, imm`
    Ori,
    /// `xori rd, rs1, imm`
    Xori,
    /// `slli rd, rs1, imm`
    Slli,
    /// `srli rd, rs1, imm`
    Srli,
    /// `srai rd, rs1, imm`
    Srai,
    /// `lw rd, off(base)`
    Lw,
    /// `sw rs2, off(base)`
    Sw,
    /// `beq rs1, rs2, target`
    Beq,
    /// `bne rs1, rs2, target`
    Bne,
    /// `bgt rs1, rs2, target`
    Bgt,
    /// `bge rs1, rs2, target`
    Bge,
    /// `blt rs1, rs2, target`
    Blt,
    /// `ble rs1, rs2, target`
    Ble,
    /// `beqz rs1, target`
    Beqz,
    /// `bnez rs1, target`
    Bnez,
    /// `li rd, imm` (pseudo: `addi rd, $0, imm`)
    Li,
    /// `mv rd, rs` (pseudo: `addi rd, rs, 0`)
    Mv,
    /// `j target` (pseudo: always-taken branch)
    J,
    /// `nop`
    #[default]
    Nop,
    /// `L.D fd, off(base)`
    LoadD,
    /// `S.D fs, off(base)`
    StoreD,
    /// `ADD.D fd, fs, ft`
    AddD,
    /// `SUB.D fd, fs, ft`
    SubD,
    /// `MUL.D fd, fs, ft`
    MulD,
    /// `DIV.D fd, fs, ft`
    DivD,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Self; 35] = [
        Self::Add,
        Self::Sub,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Sll,
        Self::Srl,
        Self::Sra,
        Self::Addi,
        Self::Andi,
        Self::Ori,
        Self::Xori,
        Self::Slli,
        Self::Srli,
        Self::Srai,
        Self::Lw,
        Self::Sw,
        Self::Beq,
        Self::Bne,
        Self::Bgt,
        Self::Bge,
        Self::Blt,
        Self::Ble,
        Self::Beqz,
        Self::Bnez,
        Self::Li,
        Self::Mv,
        Self::J,
        Self::Nop,
        Self::LoadD,
        Self::StoreD,
        Self::AddD,
        Self::SubD,
        Self::MulD,
        Self::DivD,
    ];

    /// Assembly mnemonic.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Sll => "sll",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Addi => "addi",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Xori => "xori",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Lw => "lw",
            Self::Sw => "sw",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Bgt => "bgt",
            Self::Bge => "bge",
            Self::Blt => "blt",
            Self::Ble => "ble",
            Self::Beqz => "beqz",
            Self::Bnez => "bnez",
            Self::Li => "li",
            Self::Mv => "mv",
            Self::J => "j",
            Self::Nop => "nop",
            Self::LoadD => "L.D",
            Self::StoreD => "S.D",
            Self::AddD => "ADD.D",
            Self::SubD => "SUB.D",
            Self::MulD => "MUL.D",
            Self::DivD => "DIV.D",
        }
    }

    /// Looks up a mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(text))
    }

    /// Engine that executes this opcode.
    pub const fn profile(self) -> Profile {
        match self {
            Self::LoadD | Self::StoreD | Self::AddD | Self::SubD | Self::MulD | Self::DivD => {
                Profile::Tomasulo
            }
            _ => Profile::Pipeline,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// A decoded, label-resolved instruction.
///
/// Immutable once assembled. Cloning is cheap: the source text is shared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Source text, without label or comment.
    pub raw: Arc<str>,
    /// Position in the program; `None` for synthesized bubbles.
    pub index: Option<usize>,
    /// First source register.
    pub rs1: Option<usize>,
    /// Second source register (store data for `sw`/`S.D`).
    pub rs2: Option<usize>,
    /// Destination register.
    pub rd: Option<usize>,
    /// Immediate; branch targets are relative to the instruction's own index.
    pub imm: Option<i64>,
    /// Opcode.
    pub op: Opcode,
    /// Data-path control signals derived from `op`.
    pub ctrl: ControlSignals,
}

impl Instruction {
    /// Builds an instruction and derives its control signals.
    ///
    /// The index is assigned when the instruction is placed in a [`Program`].
    pub fn new(
        op: Opcode,
        rs1: Option<usize>,
        rs2: Option<usize>,
        rd: Option<usize>,
        imm: Option<i64>,
        raw: &str,
    ) -> Self {
        Self {
            raw: Arc::from(raw),
            index: None,
            rs1,
            rs2,
            rd,
            imm,
            op,
            ctrl: control_signals(op),
        }
    }

    /// The synthesized no-op used for stalls, flushes and fetches past the end.
    pub fn bubble() -> Self {
        Self::new(Opcode::Nop, None, None, None, None, "nop")
    }

    /// Returns `true` for an instruction that is not part of the program.
    pub const fn is_bubble(&self) -> bool {
        self.index.is_none()
    }

    /// Register this instruction writes, if any.
    ///
    /// Register 0 counts as "no destination": writing it has no effect.
    pub fn dest(&self) -> Option<usize> {
        self.rd.filter(|&rd| self.ctrl.reg_write && rd != 0)
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::bubble()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(idx) => write!(f, "[{idx}] {}", self.raw),
            None => f.write_str("(bubble)"),
        }
    }
}

/// An ordered, label-resolved instruction sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    insts: Vec<Instruction>,
}

impl Program {
    /// Places instructions in program order, assigning each its index.
    pub fn new(insts: Vec<Instruction>) -> Self {
        let insts = insts
            .into_iter()
            .enumerate()
            .map(|(idx, inst)| Instruction {
                index: Some(idx),
                ..inst
            })
            .collect();
        Self { insts }
    }

    /// Instruction at `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<&Instruction> {
        self.insts.get(idx)
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.insts.len()
    }

    /// Returns `true` for an empty program.
    pub fn is_empty(&self) -> bool {
        self.insts.is_empty()
    }

    /// Iterates in program order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.insts.iter()
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.insts.iter()
    }
}
