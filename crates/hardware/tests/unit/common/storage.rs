//! Register File and Data Memory Tests.
//!
//! Verifies the hard-wired zero register, bounds checking, non-numeric coercion and
//! snapshot independence for both cell types.

use crate::common::logs::capture_warnings;
use pipesim_core::common::{DataMemory, RegisterFile, SimError};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn register_zero_reads_zero_after_write() {
    let mut regs = RegisterFile::<i64>::new(48);
    regs.write(0, 99).unwrap();
    assert_eq!(regs.read(0).unwrap(), 0);
}

#[test]
fn register_out_of_bounds_is_fatal() {
    let mut regs = RegisterFile::<f64>::new(48);
    assert_eq!(
        regs.read(48),
        Err(SimError::RegisterOutOfBounds { index: 48, len: 48 })
    );
    assert!(regs.write(100, 1.0).is_err());
}

#[test]
fn register_nan_write_is_coerced_to_zero() {
    let mut regs = RegisterFile::<f64>::new(48);
    regs.write(33, 4.5).unwrap();
    regs.write(33, f64::NAN).unwrap();
    assert_eq!(regs.read(33).unwrap(), 0.0);
}

#[test]
fn non_numeric_writes_log_a_warning() {
    let logs = capture_warnings(|| {
        let mut regs = RegisterFile::<f64>::new(48);
        regs.write(33, f64::NAN).unwrap();
        let mut mem = DataMemory::<f64>::new(32);
        mem.write(4, f64::NAN).unwrap();
        regs.write(34, 1.5).unwrap();
    });
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("non-numeric register write, storing zero"), "{logs}");
    assert!(logs.contains("non-numeric memory write, storing zero"), "{logs}");
    assert_eq!(logs.lines().count(), 2, "{logs}");
}

#[test]
fn register_snapshot_is_a_copy() {
    let mut regs = RegisterFile::<i64>::new(4);
    let snap = regs.snapshot();
    regs.write(1, 7).unwrap();
    assert_eq!(snap, vec![0, 0, 0, 0]);
    assert_eq!(regs.snapshot(), vec![0, 7, 0, 0]);
}

#[test]
fn memory_has_no_hardwired_cell() {
    let mut mem = DataMemory::<i64>::new(32);
    mem.write(0, 5).unwrap();
    assert_eq!(mem.read(0).unwrap(), 5);
}

#[test]
fn memory_rejects_negative_and_past_end() {
    let mem = DataMemory::<i64>::new(32);
    assert_eq!(
        mem.read(-1),
        Err(SimError::MemoryOutOfBounds { address: -1, len: 32 })
    );
    assert_eq!(
        mem.read(32),
        Err(SimError::MemoryOutOfBounds { address: 32, len: 32 })
    );
}

#[test]
fn memory_reset_zeroes_all_cells() {
    let mut mem = DataMemory::<f64>::new(8);
    mem.write(3, 2.5).unwrap();
    mem.reset();
    assert!(mem.snapshot().iter().all(|&v| v == 0.0));
}

proptest! {
    #[test]
    fn register_zero_is_always_zero(writes in prop::collection::vec((0usize..48, any::<i64>()), 0..64)) {
        let mut regs = RegisterFile::<i64>::new(48);
        for (idx, val) in writes {
            regs.write(idx, val).unwrap();
            prop_assert_eq!(regs.read(0).unwrap(), 0);
        }
    }

    #[test]
    fn register_write_then_read(idx in 1usize..48, val in -1.0e12f64..1.0e12) {
        let mut regs = RegisterFile::<f64>::new(48);
        regs.write(idx, val).unwrap();
        prop_assert_eq!(regs.read(idx).unwrap(), val);
    }
}
