//! Common Data Bus Tests.
//!
//! One broadcast per cycle, granted in ADD, MUL, MEM order. A broadcast frees its
//! station, writes its register if still the latest producer, and wakes every waiting
//! operand, including one issued in the same cycle.

use crate::common::harness::{finish_tomasulo, fp, tomasulo, tomasulo_with};
use crate::common::observers::StatusRecorder;
use pipesim_core::RunMode;
use pipesim_core::config::Config;
use pipesim_core::core::tomasulo::{FuClass, InstructionStatus, Operand};
use pretty_assertions::assert_eq;

#[test]
fn simultaneous_finishers_broadcast_in_consecutive_cycles() {
    let mut config = Config::default();
    config.tomasulo.latency.add_sub = 3;
    config.tomasulo.latency.mul = 2;
    let source = "
        ADD.D $f0, $f2, $f4
        MUL.D $f6, $f2, $f4
    ";
    let mut engine = tomasulo_with(source, &config, &[(fp(2), 1.0), (fp(4), 2.0)], &[]);
    let mut recorder = StatusRecorder::default();
    let _ = engine.run_with(RunMode::ToCompletion, &mut recorder).unwrap();

    assert_eq!(recorder.cycle_of(0, InstructionStatus::ExecuteEnd), Some(4));
    assert_eq!(recorder.cycle_of(1, InstructionStatus::ExecuteEnd), Some(4));
    assert_eq!(recorder.cycle_of(0, InstructionStatus::WriteBack), Some(5));
    assert_eq!(recorder.cycle_of(1, InstructionStatus::WriteBack), Some(6));
    assert_eq!(engine.register(fp(0)).unwrap(), 3.0);
    assert_eq!(engine.register(fp(6)).unwrap(), 2.0);
}

#[test]
fn status_sequence_for_single_add() {
    let mut engine = tomasulo("ADD.D $f0, $f2, $f4", &[(fp(2), 1.0), (fp(4), 2.0)], &[]);
    let mut recorder = StatusRecorder::default();
    let _ = engine.run_with(RunMode::ToCompletion, &mut recorder).unwrap();

    assert_eq!(recorder.in_cycle(1), vec![(Some(0), InstructionStatus::Issued)]);
    assert_eq!(recorder.in_cycle(2), vec![(Some(0), InstructionStatus::ExecuteStart)]);
    assert_eq!(recorder.in_cycle(3), vec![(Some(0), InstructionStatus::ExecuteEnd)]);
    assert_eq!(recorder.in_cycle(4), vec![(Some(0), InstructionStatus::WriteBack)]);
}

#[test]
fn broadcast_chain() {
    let source = "
        MUL.D $f1, $f2, $f3
        ADD.D $f4, $f1, $f5
        SUB.D $f6, $f1, $f7
    ";
    let regs = [(fp(2), 1.0), (fp(3), 2.0), (fp(5), 3.0), (fp(7), 4.0)];
    let mut engine = tomasulo(source, &regs, &[]);
    assert_eq!(finish_tomasulo(&mut engine), 16);
    assert_eq!(engine.register(fp(1)).unwrap(), 2.0);
    assert_eq!(engine.register(fp(4)).unwrap(), 5.0);
    assert_eq!(engine.register(fp(6)).unwrap(), -2.0);
    assert_eq!(engine.stats().finished_instructions, 3);
}

#[test]
fn arithmetic_then_load() {
    let source = "
        ADD.D $f1, $f1, $f2
        ADD.D $f0, $f1, $f2
        ADD.D $f3, $f3, $f3
        L.D $f0, 0($0)
    ";
    let mut engine = tomasulo(source, &[], &[]);
    assert_eq!(finish_tomasulo(&mut engine), 8);
}

#[test]
fn broadcast_wakes_operand_issued_same_cycle() {
    let source = "
        ADD.D $f0, $f2, $f4
        L.D $f6, 0($0)
        L.D $f8, 1($0)
        ADD.D $f10, $f0, $f2
    ";
    let mut engine = tomasulo(source, &[(fp(2), 1.0), (fp(4), 2.0)], &[]);
    for _ in 0..4 {
        engine.step().unwrap();
    }
    // ADD0 broadcast in cycle 4, the cycle ADD1 issued waiting on it.
    let add = engine.stations(FuClass::Add);
    assert!(!add[0].is_busy());
    let res = add[1].reservation().expect("ADD1 busy");
    assert_eq!(res.j, Operand::Ready(3.0));
    assert_eq!(res.remaining, None);

    let mut recorder = StatusRecorder::default();
    let _ = engine.run_with(RunMode::ToCompletion, &mut recorder).unwrap();
    assert_eq!(recorder.cycle_of(3, InstructionStatus::ExecuteStart), Some(5));
    assert_eq!(engine.register(fp(10)).unwrap(), 4.0);
    assert_eq!(engine.stats().cycles, 7);
}

#[test]
fn slide_example() {
    let source = "
        L.D $f6, 0($2)
        L.D $f2, 0($3)
        MUL.D $f0, $f2, $f4
        SUB.D $f8, $f6, $f2
        DIV.D $f10, $f0, $f6
        ADD.D $f6, $f8, $f2
    ";
    let mut engine = tomasulo(source, &[(2, 2.0), (3, 3.0)], &[(2, 1.0), (3, 2.0)]);
    assert_eq!(finish_tomasulo(&mut engine), 57);
    assert_eq!(engine.register(fp(6)).unwrap(), 1.0);
    assert_eq!(engine.register(fp(8)).unwrap(), -1.0);
    assert_eq!(engine.register(fp(10)).unwrap(), 0.0);
    assert_eq!(engine.stats().finished_instructions, 6);
}
