//! Simulation statistics collection and reporting.
//!
//! This module tracks the per-engine counters. It provides:
//! 1. **Cycle and CPI:** Total cycles, completed instructions, and derived CPI/IPC.
//! 2. **Pipeline Hazards:** Data-hazard stalls, branch mispredictions, and forwards.
//! 3. **Reporting:** A plain-text report and `serde` serialization for machine output.
//!
//! Both structures are plain counters owned by their engine and reset with it.

use serde::Serialize;

/// Ratio helper: `num / den`, or 0 when nothing has been counted yet.
fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// In-order pipeline statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Total cycles simulated.
    pub cycles: u64,
    /// Real instructions that left the MEM/WB latch.
    pub finished_instructions: u64,
    /// Cycles in which decode was replaced by a bubble because of a data hazard.
    pub data_hazard_stalls: u64,
    /// Taken branches (the fixed predict-not-taken policy guessed wrong).
    pub predict_fails: u64,
    /// Operand values bypassed from EX/MEM or MEM/WB.
    pub forwards: u64,
}

impl PipelineStats {
    /// Cycles per completed instruction, 0 before anything completes.
    pub fn cpi(&self) -> f64 {
        ratio(self.cycles, self.finished_instructions)
    }

    /// Completed instructions per cycle, 0 before the first cycle.
    pub fn ipc(&self) -> f64 {
        ratio(self.finished_instructions, self.cycles)
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.finished_instructions);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("sim_cpi                  {:.4}", self.cpi());
        println!("----------------------------------------------------------");
        println!("HAZARDS");
        println!("  stalls.data            {}", self.data_hazard_stalls);
        println!("  bp.mispredicts         {}", self.predict_fails);
        println!("  forwards               {}", self.forwards);
        println!("==========================================================");
    }
}

/// Tomasulo engine statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TomasuloStats {
    /// Total cycles simulated.
    pub cycles: u64,
    /// CDB broadcasts plus completed stores.
    pub finished_instructions: u64,
}

impl TomasuloStats {
    /// Cycles per completed instruction, 0 before anything completes.
    pub fn cpi(&self) -> f64 {
        ratio(self.cycles, self.finished_instructions)
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("TOMASULO SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.finished_instructions);
        println!("sim_cpi                  {:.4}", self.cpi());
        println!("==========================================================");
    }
}
