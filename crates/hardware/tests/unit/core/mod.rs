/// Five-stage pipeline tests.
pub mod pipeline;

/// Tomasulo engine tests.
pub mod tomasulo;
