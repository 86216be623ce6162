//! Run control.
//!
//! Both engines advance one cycle per `tick`/`step`. This module layers the run modes
//! on top: a single step, run-to-completion and run-to-breakpoint, all bounded by a
//! cycle ceiling.

/// Run modes and the bounded run loop.
pub mod runner;

pub use runner::{Engine, RunMode, run};
