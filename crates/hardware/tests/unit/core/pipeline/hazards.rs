//! Data Hazard Tests: Stalling and Forwarding.
//!
//! Runs whole programs and checks the stall, forward and completion counters together
//! with the final state. With forwarding off every read-after-write on an in-flight
//! producer stalls; with forwarding on only a load feeding the next instruction does.

use crate::common::harness::{finish_pipeline, pipeline};
use crate::common::observers::PipelineRecorder;
use pipesim_core::RunMode;
use pipesim_core::core::pipeline::HazardKind;
use pretty_assertions::assert_eq;
use rstest::rstest;

const LOAD_ADD_STORE: &str = "
    lw $1, 0($0)
    lw $2, 1($0)
    add $3, $1, $2
    sw $3, 2($0)
";

#[rstest]
#[case::stalling(false, 4, 0, 12)]
#[case::forwarding(true, 1, 2, 9)]
fn load_add_store(
    #[case] forwarding: bool,
    #[case] stalls: u64,
    #[case] forwards: u64,
    #[case] cycles: u64,
) {
    let mut engine = pipeline(LOAD_ADD_STORE, forwarding, &[(0, 1), (1, 2)]);
    assert_eq!(finish_pipeline(&mut engine), cycles);

    assert_eq!(engine.memory_at(2).unwrap(), 3);
    assert_eq!(engine.register(1).unwrap(), 1);
    assert_eq!(engine.register(2).unwrap(), 2);
    let stats = engine.stats();
    assert_eq!(stats.data_hazard_stalls, stalls);
    assert_eq!(stats.forwards, forwards);
    assert_eq!(stats.finished_instructions, 4);
    assert_eq!(stats.cycles, cycles);
}

#[test]
fn forwarding_chain_through_dependent_adds() {
    let source = "
        lw $1, 0($0)
        lw $2, 1($0)
        add $3, $1, $2
        add $4, $3, $3
    ";
    let mut engine = pipeline(source, true, &[(0, 1), (1, 2)]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.register(3).unwrap(), 3);
    assert_eq!(engine.register(4).unwrap(), 6);
    // One load-use stall, then $2 from MEM/WB and $3 into both operands.
    assert_eq!(engine.stats().data_hazard_stalls, 1);
    assert_eq!(engine.stats().forwards, 3);
}

#[test]
fn ex_mem_wins_over_mem_wb() {
    let source = "
        li $1, 1
        li $2, 2
        li $3, 3
        li $4, 4
        add $1, $1, $2
        add $1, $1, $3
        add $1, $1, $4
    ";
    let mut engine = pipeline(source, true, &[]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.register(1).unwrap(), 10);
    assert_eq!(engine.stats().data_hazard_stalls, 0);
}

#[test]
fn forward_events_name_source_target_and_value() {
    let mut engine = pipeline(LOAD_ADD_STORE, true, &[(0, 1), (1, 2)]);
    let mut recorder = PipelineRecorder::default();
    for _ in 0..20 {
        engine.tick_with(&mut recorder).unwrap();
    }
    assert_eq!(recorder.forwards.len(), 2);

    let first = &recorder.forwards[0];
    assert_eq!(first.register, 2);
    assert_eq!(first.value, 2);
    assert_eq!(first.source.index, Some(1));
    assert_eq!(first.target.index, Some(2));

    let second = &recorder.forwards[1];
    assert_eq!(second.register, 3);
    assert_eq!(second.value, 3);
    assert_eq!(second.target.index, Some(3));
    assert!(second.cycle > first.cycle);
}

#[test]
fn stall_events_report_the_consumer() {
    let mut engine = pipeline(LOAD_ADD_STORE, false, &[(0, 1), (1, 2)]);
    let mut recorder = PipelineRecorder::default();
    let _ = pipesim_core::sim::run(&mut engine, RunMode::ToCompletion, &mut recorder, 100).unwrap();

    let stalls = recorder.hazards_of(HazardKind::Data);
    assert_eq!(stalls.len(), 4);
    assert_eq!(stalls[0].instruction.index, Some(2));
    assert_eq!(stalls[3].instruction.index, Some(3));
    assert!(recorder.hazards_of(HazardKind::Branch).is_empty());
}

#[test]
fn stall_holds_pc_and_if_id() {
    let mut engine = pipeline("lw $1, 0($0)\nadd $2, $1, $1", false, &[]);
    // Cycle 3 decodes the add while the load enters EX/MEM: stall.
    for _ in 0..3 {
        engine.tick().unwrap();
    }
    assert_eq!(engine.stats().data_hazard_stalls, 1);
    let latches = engine.latches();
    assert!(latches.id_ex.inst.is_bubble());
    assert_eq!(latches.if_id.inst.index, Some(1));
    assert_eq!(engine.pc(), 2);
}

#[test]
fn register_zero_never_stalls() {
    let mut engine = pipeline("add $0, $1, $1\nadd $2, $0, $0", false, &[]);
    let _ = finish_pipeline(&mut engine);
    assert_eq!(engine.stats().data_hazard_stalls, 0);
    assert_eq!(engine.register(0).unwrap(), 0);
}
