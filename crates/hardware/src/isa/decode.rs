//! Data-path decoder.
//!
//! Maps an opcode to the control signals that both engines interpret. One table serves
//! the pipeline's integer path and Tomasulo's floating-point path, so every stage has a
//! single generic code path instead of per-opcode logic.

use super::instruction::Opcode;
use super::signals::{AluOp, BranchCond, ControlSignals, ExecUnit, OpASrc, OpBSrc, WbSel};

/// Integer register-register ALU operation.
fn r_type(alu: AluOp) -> ControlSignals {
    ControlSignals {
        alu,
        reg_write: true,
        ..ControlSignals::default()
    }
}

/// Integer register-immediate ALU operation.
fn i_type(alu: AluOp) -> ControlSignals {
    ControlSignals {
        b_src: OpBSrc::Imm,
        ..r_type(alu)
    }
}

/// PC-relative branch: the ALU computes `pc + imm`, the predicate compares `rs1`/`rs2`.
fn branch(cond: BranchCond) -> ControlSignals {
    ControlSignals {
        a_src: OpASrc::Pc,
        b_src: OpBSrc::Imm,
        branch: cond,
        ..ControlSignals::default()
    }
}

/// Load: address is `rs1 + imm`, write-back comes from memory.
fn load(unit: ExecUnit) -> ControlSignals {
    ControlSignals {
        b_src: OpBSrc::Imm,
        mem_read: true,
        reg_write: true,
        wb_sel: WbSel::Mem,
        unit,
        ..ControlSignals::default()
    }
}

/// Store: address is `rs1 + imm`, data comes from `rs2`.
fn store(unit: ExecUnit) -> ControlSignals {
    ControlSignals {
        b_src: OpBSrc::Imm,
        mem_write: true,
        unit,
        ..ControlSignals::default()
    }
}

/// Floating-point register-register operation on a Tomasulo pool.
fn fp_type(alu: AluOp, unit: ExecUnit) -> ControlSignals {
    ControlSignals {
        unit,
        ..r_type(alu)
    }
}

/// Decodes an opcode into its control signals.
///
/// # Arguments
///
/// * `op` - The opcode to decode.
///
/// # Returns
///
/// The control signals; `Nop` decodes to the all-default bubble signal set.
pub fn control_signals(op: Opcode) -> ControlSignals {
    match op {
        Opcode::Add => r_type(AluOp::Add),
        Opcode::Sub => r_type(AluOp::Sub),
        Opcode::And => r_type(AluOp::And),
        Opcode::Or => r_type(AluOp::Or),
        Opcode::Xor => r_type(AluOp::Xor),
        Opcode::Sll => r_type(AluOp::Sll),
        Opcode::Srl => r_type(AluOp::Srl),
        Opcode::Sra => r_type(AluOp::Sra),

        // li and mv are addi with an implicit $0 source or zero immediate.
        Opcode::Addi | Opcode::Li | Opcode::Mv => i_type(AluOp::Add),
        Opcode::Andi => i_type(AluOp::And),
        Opcode::Ori => i_type(AluOp::Or),
        Opcode::Xori => i_type(AluOp::Xor),
        Opcode::Slli => i_type(AluOp::Sll),
        Opcode::Srli => i_type(AluOp::Srl),
        Opcode::Srai => i_type(AluOp::Sra),

        Opcode::Lw => load(ExecUnit::Integer),
        Opcode::Sw => store(ExecUnit::Integer),

        Opcode::Beq | Opcode::Beqz => branch(BranchCond::Eq),
        Opcode::Bne | Opcode::Bnez => branch(BranchCond::Ne),
        Opcode::Bgt => branch(BranchCond::Gt),
        Opcode::Bge => branch(BranchCond::Ge),
        Opcode::Blt => branch(BranchCond::Lt),
        Opcode::Ble => branch(BranchCond::Le),
        Opcode::J => branch(BranchCond::Always),

        Opcode::Nop => ControlSignals::default(),

        Opcode::LoadD => load(ExecUnit::LoadStore),
        Opcode::StoreD => store(ExecUnit::LoadStore),
        Opcode::AddD => fp_type(AluOp::Add, ExecUnit::AddSub),
        Opcode::SubD => fp_type(AluOp::Sub, ExecUnit::AddSub),
        Opcode::MulD => fp_type(AluOp::Mul, ExecUnit::MulDiv),
        Opcode::DivD => fp_type(AluOp::Div, ExecUnit::MulDiv),
    }
}
