//! Control Hazard Tests: Predict Not Taken.
//!
//! Fetch always continues sequentially. A branch resolving taken in EX flushes IF/ID and
//! ID/EX, redirects the PC and counts one misprediction; it takes precedence over any
//! data hazard detected in the same cycle.

use crate::common::harness::{finish_pipeline, pipeline};
use crate::common::observers::PipelineRecorder;
use pipesim_core::core::pipeline::HazardKind;
use pipesim_core::{RunMode, SimError};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn taken_branch_flushes_wrong_path() {
    let source = "
        lw $1, 0($0)
        lw $2, 1($0)
        nop
        nop
        beqz $0, target
        add $3, $2, $2
    target:
        nop
        nop
        add $4, $1, $1
    ";
    let mut engine = pipeline(source, false, &[(0, 1), (1, 2)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.stats().predict_fails, 1);
    assert_eq!(engine.register(3).unwrap(), 0);
    assert_eq!(engine.register(4).unwrap(), 2);
}

#[test]
fn not_taken_branch_falls_through() {
    let source = "
        lw $1, 0($0)
        lw $2, 1($0)
        nop # avoid RAW
        nop # avoid RAW
        beqz $1, target
        add $3, $2, $2
    target:
        nop
        nop
        add $4, $1, $1
    ";
    let mut engine = pipeline(source, false, &[(0, 1), (1, 2)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.stats().predict_fails, 0);
    assert_eq!(engine.register(3).unwrap(), 4);
    assert_eq!(engine.register(4).unwrap(), 2);
}

#[test]
fn branch_waits_for_its_operand() {
    let source = "
        lw $1, 0($0)
        lw $2, 1($0)
        lw $3, 2($0)
        beqz $3, target
        add $4, $1, $2
        add $5, $1, $2
    target:
        add $6, $1, $2
    ";
    let mut engine = pipeline(source, false, &[(0, 1), (1, 2), (2, 0)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.register(4).unwrap(), 0);
    assert_eq!(engine.register(5).unwrap(), 0);
    assert_eq!(engine.register(6).unwrap(), 3);
    assert_eq!(engine.stats().data_hazard_stalls, 2);
    assert_eq!(engine.stats().predict_fails, 1);
}

#[test]
fn flushed_instruction_does_not_stall() {
    let source = "
        lw $1, 0($0)
        beqz $0, 3
        lw $2, 1($0)
        add $3, $1, $2
        add $4, $1, $2
    ";
    let mut engine = pipeline(source, false, &[(0, 1), (1, 2)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.register(3).unwrap(), 0);
    assert_eq!(engine.register(4).unwrap(), 1);
    assert_eq!(engine.stats().data_hazard_stalls, 0);
}

#[test]
fn stall_then_not_taken() {
    let source = "
        lw $1, 0($0)
        lw $2, 1($0)
        lw $3, 2($0)
        beqz $2, 3
        add $4, $1, $3
        add $5, $1, $2
        add $6, $1, $2
    ";
    let mut engine = pipeline(source, false, &[(0, 1), (1, 2), (2, 3)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.register(4).unwrap(), 4);
    assert_eq!(engine.register(5).unwrap(), 3);
    assert_eq!(engine.register(6).unwrap(), 3);
    assert_eq!(engine.stats().data_hazard_stalls, 1);
}

#[rstest]
#[case::forwarding(true, 16)]
#[case::stalling(false, 22)]
fn backward_branch_loops(#[case] forwarding: bool, #[case] cycles: u64) {
    let source = "
        li $3, 3
    target: addi $1, $1, 1
        bne $1, $3, target
        sw $1, 0($0)
    ";
    let mut engine = pipeline(source, forwarding, &[]);
    assert_eq!(finish_pipeline(&mut engine), cycles);
    assert_eq!(engine.register(1).unwrap(), 3);
    assert_eq!(engine.memory_at(0).unwrap(), 3);
    assert_eq!(engine.stats().predict_fails, 2);
}

#[test]
fn branch_event_reports_flushed_instructions() {
    let mut engine = pipeline("j 2\nli $1, 1\nli $2, 2", false, &[]);
    let mut recorder = PipelineRecorder::default();
    let _ = engine.run_with(RunMode::ToCompletion, &mut recorder);
    let branches = recorder.hazards_of(HazardKind::Branch);
    assert_eq!(branches.len(), 1);
    assert_eq!(branches[0].cycle, 3);
    assert_eq!(branches[0].instruction.index, Some(0));
    assert_eq!(engine.register(1).unwrap(), 0);
    assert_eq!(engine.register(2).unwrap(), 2);
}

#[test]
fn negative_branch_target_is_fatal_and_atomic() {
    let mut engine = pipeline("nop\nj -5", false, &[]);
    engine.tick().unwrap();
    engine.tick().unwrap();
    engine.tick().unwrap();
    let before = (engine.pc(), engine.latches(), engine.stats());
    assert_eq!(
        engine.tick(),
        Err(SimError::InstructionOutOfBounds { index: -4, limit: 1000 })
    );
    assert_eq!((engine.pc(), engine.latches(), engine.stats()), before);
}

const FIBONACCI: &str = "
lw $1, 0($0)
ble $1, $0, invalid_input
li $2, 0
li $3, 1
beq $1, $3, return_0 # n == 1
li $4, 2
beq $1, $4, return_1 # n == 2
addi $1, $1, -2
loop:
  beqz $1, end
  addi $1, $1, -1
  add $4, $2, $3
  addi $2, $3, 0
  addi $3, $4, 0
  beqz $0, loop
invalid_input:
  li $3, -1
  beqz $0, end
return_0:
  li $3, 0
  beqz $0, end
return_1:
  li $3, 1
  beqz $0, end
end:
  sw $3, 1($0)
";

#[rstest]
#[case(10, 34)]
#[case(2, 1)]
#[case(1, 0)]
#[case(0, -1)]
fn fibonacci(#[case] n: i64, #[case] expected: i64, #[values(true, false)] forwarding: bool) {
    let mut engine = pipeline(FIBONACCI, forwarding, &[(0, n)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.memory_at(1).unwrap(), expected);
}

#[test]
fn fibonacci_forwarding_saves_cycles() {
    let mut stalling = pipeline(FIBONACCI, false, &[(0, 10)]);
    let mut forwarding = pipeline(FIBONACCI, true, &[(0, 10)]);
    assert_eq!(finish_pipeline(&mut stalling), 96);
    assert_eq!(finish_pipeline(&mut forwarding), 81);
    assert_eq!(stalling.stats().data_hazard_stalls, 16);
    assert_eq!(forwarding.stats().data_hazard_stalls, 1);
    assert_eq!(forwarding.stats().predict_fails, 9);
}
