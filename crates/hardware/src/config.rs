//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize both engines.
//! It provides:
//! 1. **Defaults:** Baseline machine constants (register count, memory size, station pools).
//! 2. **Structures:** Hierarchical config for the shared machine, the pipeline and Tomasulo.
//! 3. **Validation:** Rejecting zero-sized storage, pools and latencies before an engine is built.
//!
//! Configuration is supplied as JSON (the CLI's `--config` flag) or via `Config::default()`.
//! Every field is optional in JSON; missing fields take the defaults below.

use serde::Deserialize;

use crate::common::error::SimError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Register count: `$0..$31` followed by `$f0..$f15`.
    pub const REGISTER_COUNT: usize = 48;

    /// Data memory size in cells.
    pub const MEMORY_SIZE: usize = 32;

    /// Cycle ceiling for run-to-completion and run-to-breakpoint.
    ///
    /// Exceeding it aborts the run with `SimError::DidNotTerminate`.
    pub const MAX_CYCLES: u64 = 10_000;

    /// Number of ADD/SUB reservation stations.
    pub const ADD_STATIONS: usize = 3;

    /// Number of MUL/DIV reservation stations.
    pub const MUL_STATIONS: usize = 2;

    /// Number of load/store reservation stations.
    pub const MEM_STATIONS: usize = 3;

    /// `ADD.D`/`SUB.D` execution latency in cycles.
    pub const LATENCY_ADD_SUB: u32 = 2;

    /// `MUL.D` execution latency in cycles.
    pub const LATENCY_MUL: u32 = 10;

    /// `DIV.D` execution latency in cycles.
    pub const LATENCY_DIV: u32 = 40;

    /// `L.D`/`S.D` execution latency in cycles.
    pub const LATENCY_MEM: u32 = 2;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::Config;
///
/// let json = r#"{
///     "pipeline": { "forwarding": true },
///     "tomasulo": { "mul_stations": 4, "latency": { "div": 20 } }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.pipeline.forwarding);
/// assert_eq!(config.tomasulo.mul_stations, 4);
/// assert_eq!(config.tomasulo.latency.div, 20);
/// assert_eq!(config.tomasulo.latency.mul, 10);
/// assert_eq!(config.machine.register_count, 48);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Storage sizes and run limits shared by both engines
    #[serde(default)]
    pub machine: MachineConfig,
    /// In-order pipeline options
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Tomasulo station pools and latencies
    #[serde(default)]
    pub tomasulo: TomasuloConfig,
}

impl Config {
    /// Checks that every size, pool and latency is non-zero.
    ///
    /// # Returns
    ///
    /// `Ok(())` for a usable configuration, otherwise `SimError::InvalidConfig`
    /// naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        let checks = [
            ("machine.register_count", self.machine.register_count as u64),
            ("machine.memory_size", self.machine.memory_size as u64),
            ("machine.max_cycles", self.machine.max_cycles),
            ("tomasulo.add_stations", self.tomasulo.add_stations as u64),
            ("tomasulo.mul_stations", self.tomasulo.mul_stations as u64),
            ("tomasulo.mem_stations", self.tomasulo.mem_stations as u64),
            ("tomasulo.latency.add_sub", u64::from(self.tomasulo.latency.add_sub)),
            ("tomasulo.latency.mul", u64::from(self.tomasulo.latency.mul)),
            ("tomasulo.latency.div", u64::from(self.tomasulo.latency.div)),
            ("tomasulo.latency.mem", u64::from(self.tomasulo.latency.mem)),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(SimError::InvalidConfig(format!("{name} must be non-zero"))),
            None => Ok(()),
        }
    }
}

/// Storage sizes and run limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MachineConfig {
    /// Number of registers (general and floating-point share one file)
    #[serde(default = "MachineConfig::default_register_count")]
    pub register_count: usize,

    /// Number of data memory cells
    #[serde(default = "MachineConfig::default_memory_size")]
    pub memory_size: usize,

    /// Cycle ceiling for run-to-completion and run-to-breakpoint
    #[serde(default = "MachineConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl MachineConfig {
    fn default_register_count() -> usize {
        defaults::REGISTER_COUNT
    }

    fn default_memory_size() -> usize {
        defaults::MEMORY_SIZE
    }

    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            register_count: defaults::REGISTER_COUNT,
            memory_size: defaults::MEMORY_SIZE,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// In-order pipeline options.
///
/// Branch prediction is fixed at predict-not-taken and has no knob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PipelineConfig {
    /// Bypass EX/MEM and MEM/WB results into decode instead of stalling
    #[serde(default)]
    pub forwarding: bool,
}

/// Tomasulo station pools.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TomasuloConfig {
    /// Number of ADD/SUB reservation stations
    #[serde(default = "TomasuloConfig::default_add_stations")]
    pub add_stations: usize,

    /// Number of MUL/DIV reservation stations
    #[serde(default = "TomasuloConfig::default_mul_stations")]
    pub mul_stations: usize,

    /// Number of load/store reservation stations
    #[serde(default = "TomasuloConfig::default_mem_stations")]
    pub mem_stations: usize,

    /// Per-operation execution latencies
    #[serde(default)]
    pub latency: LatencyConfig,
}

impl TomasuloConfig {
    fn default_add_stations() -> usize {
        defaults::ADD_STATIONS
    }

    fn default_mul_stations() -> usize {
        defaults::MUL_STATIONS
    }

    fn default_mem_stations() -> usize {
        defaults::MEM_STATIONS
    }
}

impl Default for TomasuloConfig {
    fn default() -> Self {
        Self {
            add_stations: defaults::ADD_STATIONS,
            mul_stations: defaults::MUL_STATIONS,
            mem_stations: defaults::MEM_STATIONS,
            latency: LatencyConfig::default(),
        }
    }
}

/// Execution latencies in cycles, counted from the cycle execution starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LatencyConfig {
    /// `ADD.D` and `SUB.D`
    #[serde(default = "LatencyConfig::default_add_sub")]
    pub add_sub: u32,

    /// `MUL.D`
    #[serde(default = "LatencyConfig::default_mul")]
    pub mul: u32,

    /// `DIV.D`
    #[serde(default = "LatencyConfig::default_div")]
    pub div: u32,

    /// `L.D` and `S.D`
    #[serde(default = "LatencyConfig::default_mem")]
    pub mem: u32,
}

impl LatencyConfig {
    fn default_add_sub() -> u32 {
        defaults::LATENCY_ADD_SUB
    }

    fn default_mul() -> u32 {
        defaults::LATENCY_MUL
    }

    fn default_div() -> u32 {
        defaults::LATENCY_DIV
    }

    fn default_mem() -> u32 {
        defaults::LATENCY_MEM
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            add_sub: defaults::LATENCY_ADD_SUB,
            mul: defaults::LATENCY_MUL,
            div: defaults::LATENCY_DIV,
            mem: defaults::LATENCY_MEM,
        }
    }
}
