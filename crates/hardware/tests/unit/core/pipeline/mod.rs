/// Taken and not-taken branches, flushes and their interaction with stalls.
pub mod branches;


/// Data hazards with and without forwarding.
pub mod hazards;

/// Single-stage behaviour (fetch, decode, execute, memory, writeback).
pub mod stages;
