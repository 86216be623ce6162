//! Data-path control signals and operation types.
//!
//! This module defines the signals that steer an instruction through either engine.
//! It performs:
//! 1. **Operation Classification:** ALU operation and the functional unit that executes it.
//! 2. **Operand Selection:** Sources for ALU inputs (registers, PC, or the immediate).
//! 3. **Memory and Write-Back Control:** Load/store intent and the write-back source.
//! 4. **Branch Control:** The predicate a branch evaluates over its two register operands.

/// ALU operation types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AluOp {
    /// Addition (also address and branch-target computation).
    #[default]
    Add,

    /// Subtraction.
    Sub,

    /// Bitwise AND.
    And,

    /// Bitwise OR.
    Or,

    /// Bitwise XOR.
    Xor,

    /// Shift left logical.
    Sll,

    /// Shift right logical.
    Srl,

    /// Shift right arithmetic.
    Sra,

    /// Multiplication.
    Mul,

    /// Division.
    Div,
}

impl AluOp {
    /// Evaluates the operation on the integer data path.
    ///
    /// Addition, subtraction and multiplication wrap; shift amounts use the low 6 bits;
    /// division by zero yields zero.
    pub const fn eval_i64(self, a: i64, b: i64) -> i64 {
        let shamt = (b & 0x3f) as u32;
        match self {
            Self::Add => a.wrapping_add(b),
            Self::Sub => a.wrapping_sub(b),
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
            Self::Sll => a.wrapping_shl(shamt),
            Self::Srl => ((a as u64) >> shamt) as i64,
            Self::Sra => a >> shamt,
            Self::Mul => a.wrapping_mul(b),
            Self::Div => match a.checked_div(b) {
                Some(q) => q,
                None => 0,
            },
        }
    }

    /// Evaluates the operation on the floating-point data path.
    ///
    /// Bitwise and shift operations have no floating-point meaning and produce `NaN`,
    /// which storage then coerces to zero.
    pub fn eval_f64(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => a / b,
            Self::And | Self::Or | Self::Xor | Self::Sll | Self::Srl | Self::Sra => f64::NAN,
        }
    }
}

/// Source for ALU operand A.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpASrc {
    /// Use `rs1` register value.
    #[default]
    Reg1,

    /// Use the instruction's own index (branch targets are PC-relative).
    Pc,
}

/// Source for ALU operand B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OpBSrc {
    /// Use `rs2` register value.
    #[default]
    Reg2,

    /// Use the immediate.
    Imm,
}

/// Source of the value written back to `rd`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WbSel {
    /// ALU result.
    #[default]
    Alu,

    /// Value read from data memory.
    Mem,
}

/// Branch predicate over the two register operands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BranchCond {
    /// Not a branch.
    #[default]
    Never,

    /// Unconditional jump.
    Always,

    /// `rs1 == rs2`
    Eq,

    /// `rs1 != rs2`
    Ne,

    /// `rs1 > rs2`
    Gt,

    /// `rs1 >= rs2`
    Ge,

    /// `rs1 < rs2`
    Lt,

    /// `rs1 <= rs2`
    Le,
}

impl BranchCond {
    /// Returns `true` if the branch is taken for operand values `a` and `b`.
    pub fn taken<T: PartialOrd>(self, a: T, b: T) -> bool {
        match self {
            Self::Never => false,
            Self::Always => true,
            Self::Eq => a == b,
            Self::Ne => a != b,
            Self::Gt => a > b,
            Self::Ge => a >= b,
            Self::Lt => a < b,
            Self::Le => a <= b,
        }
    }
}

/// Functional unit an instruction executes on.
///
/// The pipeline runs everything on its single integer ALU; Tomasulo uses the unit to
/// pick a reservation-station pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExecUnit {
    /// Integer ALU of the in-order pipeline.
    #[default]
    Integer,

    /// Floating-point add/subtract pool.
    AddSub,

    /// Floating-point multiply/divide pool.
    MulDiv,

    /// Load/store pool.
    LoadStore,
}

/// Control signals for an instruction.
///
/// Produced once by [`crate::isa::decode::control_signals`] and carried with the
/// instruction through every stage. The default value is the signal set of a bubble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Source selection for ALU operand A.
    pub a_src: OpASrc,
    /// Source selection for ALU operand B.
    pub b_src: OpBSrc,
    /// ALU operation to perform.
    pub alu: AluOp,
    /// Enable memory read operation (load).
    pub mem_read: bool,
    /// Enable memory write operation (store).
    pub mem_write: bool,
    /// Enable write to the destination register.
    pub reg_write: bool,
    /// Write-back source.
    pub wb_sel: WbSel,
    /// Branch predicate.
    pub branch: BranchCond,
    /// Executing functional unit.
    pub unit: ExecUnit,
}
