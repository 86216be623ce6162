//! Pipeline Stage Tests.
//!
//! Each stage is exercised in isolation on hand-built latch entries.

use crate::common::builder::{ExMemBuilder, IdExBuilder, InstBuilder, MemWbBuilder, add, lw, sw};
use pipesim_core::common::{DataMemory, RegisterFile, SimError};
use pipesim_core::core::pipeline::latches::IfIdEntry;
use pipesim_core::core::pipeline::traits::PipelineLatch;
use pipesim_core::core::pipeline::stages::fetch::INSTRUCTION_MEMORY_SIZE;
use pipesim_core::core::pipeline::stages::memory::MemWrite;
use pipesim_core::core::pipeline::stages::{
    RegWrite, decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage,
};
use pipesim_core::isa::signals::WbSel;
use pipesim_core::isa::{Opcode, assemble};
use pretty_assertions::assert_eq;

// ══════════════════════════════════════════════════════════
// Fetch
// ══════════════════════════════════════════════════════════

#[test]
fn fetch_reads_instruction_at_pc() {
    let program = assemble("nop\nadd $1, $2, $3").unwrap();
    let entry = fetch_stage(&program, 1).unwrap();
    assert_eq!(entry.pc, 1);
    assert_eq!(entry.inst.op, Opcode::Add);
}

#[test]
fn fetch_past_program_end_is_a_bubble() {
    let program = assemble("nop").unwrap();
    let entry = fetch_stage(&program, 5).unwrap();
    assert!(entry.inst.is_bubble());
}

#[test]
fn fetch_past_instruction_memory_is_fatal() {
    let program = assemble("nop").unwrap();
    assert!(matches!(
        fetch_stage(&program, INSTRUCTION_MEMORY_SIZE),
        Err(SimError::InstructionOutOfBounds { .. })
    ));
}

// ══════════════════════════════════════════════════════════
// Decode
// ══════════════════════════════════════════════════════════

#[test]
fn decode_reads_register_operands() {
    let mut regs = RegisterFile::<i64>::new(48);
    regs.write(1, 10).unwrap();
    regs.write(2, 20).unwrap();
    let if_id = IfIdEntry {
        inst: add(3, 1, 2),
        pc: 4,
    };
    let id_ex = decode_stage(&if_id, &regs, None).unwrap();
    assert_eq!((id_ex.rv1, id_ex.rv2, id_ex.pc), (10, 20, 4));
}

#[test]
fn decode_sees_same_cycle_writeback() {
    let mut regs = RegisterFile::<i64>::new(48);
    regs.write(1, 10).unwrap();
    let if_id = IfIdEntry {
        inst: add(3, 1, 1),
        pc: 0,
    };
    let pending = Some(RegWrite { rd: 1, value: 99 });
    let id_ex = decode_stage(&if_id, &regs, pending).unwrap();
    assert_eq!((id_ex.rv1, id_ex.rv2), (99, 99));
}

#[test]
fn decode_out_of_range_source_is_fatal() {
    let regs = RegisterFile::<i64>::new(8);
    let if_id = IfIdEntry {
        inst: add(3, 9, 1),
        pc: 0,
    };
    assert!(decode_stage(&if_id, &regs, None).is_err());
}

// ══════════════════════════════════════════════════════════
// Execute
// ══════════════════════════════════════════════════════════

#[test]
fn execute_uses_immediate_for_i_type() {
    let inst = InstBuilder::new(Opcode::Addi).rd(1).rs1(2).imm(-5).build();
    let (ex_mem, taken) = execute_stage(&IdExBuilder::new(inst).rv1(7).build());
    assert_eq!(ex_mem.alu, 2);
    assert!(!taken);
}

#[test]
fn execute_store_carries_data_operand() {
    let (ex_mem, _) = execute_stage(&IdExBuilder::new(sw(3, 0, 2)).rv2(42).build());
    assert_eq!(ex_mem.alu, 2);
    assert_eq!(ex_mem.store_data, 42);
}

#[test]
fn execute_resolves_branch_target_relative_to_pc() {
    let beq = InstBuilder::new(Opcode::Beq).rs1(1).rs2(2).imm(-3).build();
    let (ex_mem, taken) = execute_stage(&IdExBuilder::new(beq.clone()).pc(10).rv1(4).rv2(4).build());
    assert!(taken);
    assert_eq!(ex_mem.alu, 7);

    let (_, taken) = execute_stage(&IdExBuilder::new(beq).pc(10).rv1(4).rv2(5).build());
    assert!(!taken);
}

// ══════════════════════════════════════════════════════════
// Memory and Writeback
// ══════════════════════════════════════════════════════════

#[test]
fn memory_stage_loads_value() {
    let mut mem = DataMemory::<i64>::new(32);
    mem.write(3, 77).unwrap();
    let (mem_wb, store) = mem_stage(&ExMemBuilder::new(lw(1, 0, 3)).alu(3).build(), &mem).unwrap();
    assert_eq!(mem_wb.load_data, 77);
    assert_eq!(mem_wb.result(), 77);
    assert_eq!(store, None);
}

#[test]
fn memory_stage_defers_store() {
    let mem = DataMemory::<i64>::new(32);
    let ex_mem = ExMemBuilder::new(sw(1, 0, 5)).alu(5).store_data(9).build();
    let (_, store) = mem_stage(&ex_mem, &mem).unwrap();
    assert_eq!(store, Some(MemWrite { address: 5, value: 9 }));
    assert_eq!(mem.read(5).unwrap(), 0);
}

#[test]
fn memory_stage_rejects_out_of_range_store() {
    let mem = DataMemory::<i64>::new(32);
    let ex_mem = ExMemBuilder::new(sw(1, 0, 0)).alu(32).build();
    assert!(matches!(
        mem_stage(&ex_mem, &mem),
        Err(SimError::MemoryOutOfBounds { address: 32, .. })
    ));
}

#[test]
fn writeback_selects_alu_or_load_result() {
    let regs = RegisterFile::<i64>::new(48);
    let alu = MemWbBuilder::new(add(3, 1, 2)).alu(5).load_data(8).build();
    assert_eq!(wb_stage(&alu, &regs).unwrap(), Some(RegWrite { rd: 3, value: 5 }));

    let load = MemWbBuilder::new(lw(4, 0, 0)).alu(0).load_data(8).build();
    assert_eq!(wb_stage(&load, &regs).unwrap(), Some(RegWrite { rd: 4, value: 8 }));
}

#[test]
fn writeback_skips_register_zero_and_stores() {
    let regs = RegisterFile::<i64>::new(48);
    let to_zero = MemWbBuilder::new(add(0, 1, 2)).alu(5).build();
    assert_eq!(wb_stage(&to_zero, &regs).unwrap(), None);
    let store = MemWbBuilder::new(sw(1, 0, 0)).build();
    assert_eq!(wb_stage(&store, &regs).unwrap(), None);
}

#[test]
fn writeback_value_follows_select_signal() {
    let regs = RegisterFile::<i64>::new(48);
    let mut inst = add(3, 1, 2);
    inst.ctrl.wb_sel = WbSel::Mem;
    let entry = MemWbBuilder::new(inst).alu(5).load_data(8).build();
    assert_eq!(entry.result(), 8);
    assert_eq!(wb_stage(&entry, &regs).unwrap(), Some(RegWrite { rd: 3, value: 8 }));

    let mut inst = lw(4, 0, 0);
    inst.ctrl.wb_sel = WbSel::Alu;
    let entry = MemWbBuilder::new(inst).alu(5).load_data(8).build();
    assert_eq!(entry.result(), 5);
}

// ══════════════════════════════════════════════════════════
// Latches
// ══════════════════════════════════════════════════════════

#[test]
fn flushed_latch_holds_a_bubble() {
    let mut id_ex = IdExBuilder::new(add(3, 1, 2)).rv1(4).rv2(6).build();
    assert!(!id_ex.is_empty());
    id_ex.flush();
    assert!(id_ex.is_empty());
    assert_eq!((id_ex.rv1, id_ex.rv2), (0, 0));
}
