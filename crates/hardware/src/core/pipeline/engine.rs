//! In-order five-stage pipeline engine.
//!
//! One call to [`PipelineEngine::tick`] simulates one clock cycle:
//! 1. **Compute:** Every stage runs on the pre-cycle latches. Write-back goes first and
//!    its register write is visible to decode of the same cycle.
//! 2. **Resolve:** A taken branch flushes IF/ID and ID/EX and redirects the PC; otherwise
//!    the decoded instruction is checked for data hazards (stall) or, with forwarding on,
//!    has its operands bypassed.
//! 3. **Commit:** The register write, the store and the new latch set are installed
//!    together, then observers are notified.
//!
//! Every fallible check happens during compute, so an error leaves the engine exactly as
//! it was after the previous cycle.

use tracing::debug;

use crate::common::error::SimError;
use crate::common::memory::DataMemory;
use crate::common::reg::RegisterFile;
use crate::config::Config;
use crate::core::pipeline::events::{ForwardEvent, HazardEvent, HazardKind};
use crate::core::pipeline::hazards::{self, HazardOutcome};
use crate::core::pipeline::latches::PipelineLatches;
use crate::core::pipeline::stages::fetch::INSTRUCTION_MEMORY_SIZE;
use crate::core::pipeline::stages::{decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage};
use crate::core::pipeline::traits::{PipelineLatch, PipelineObserver};
use crate::isa::{Profile, Program};
use crate::sim::runner::{self, Engine, RunMode};
use crate::stats::PipelineStats;

/// Name used in `UnsupportedInstruction` errors.
const ENGINE_NAME: &str = "pipeline";

/// Rejects instructions the integer pipeline cannot execute.
fn check_profile(program: &Program) -> Result<(), SimError> {
    match program.iter().find(|inst| inst.op.profile() != Profile::Pipeline) {
        Some(inst) => Err(SimError::UnsupportedInstruction {
            raw: inst.raw.to_string(),
            engine: ENGINE_NAME,
        }),
        None => Ok(()),
    }
}

/// In-order pipeline with hazard detection, optional forwarding and predict-not-taken
/// branches.
#[derive(Clone, Debug)]
pub struct PipelineEngine {
    program: Program,
    pc: usize,
    latches: PipelineLatches,
    registers: RegisterFile<i64>,
    memory: DataMemory<i64>,
    forwarding: bool,
    stats: PipelineStats,
    max_cycles: u64,
}

impl PipelineEngine {
    /// Creates a pipeline for `program`.
    ///
    /// # Arguments
    ///
    /// * `program` - A label-resolved program using only pipeline opcodes.
    /// * `config` - Storage sizes, cycle ceiling and the forwarding switch.
    ///
    /// # Returns
    ///
    /// The engine in its reset state, `InvalidConfig` for an unusable configuration, or
    /// `UnsupportedInstruction` for a Tomasulo-only opcode.
    pub fn new(program: Program, config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        check_profile(&program)?;
        Ok(Self {
            program,
            pc: 0,
            latches: PipelineLatches::default(),
            registers: RegisterFile::new(config.machine.register_count),
            memory: DataMemory::new(config.machine.memory_size),
            forwarding: config.pipeline.forwarding,
            stats: PipelineStats::default(),
            max_cycles: config.machine.max_cycles,
        })
    }

    /// Simulates one clock cycle without an observer.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.tick_with(&mut ())
    }

    /// Simulates one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `observer` - Receives the cycle's hazard and forward events after commit.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or a bounds error; on error nothing from this cycle is committed.
    pub fn tick_with(&mut self, observer: &mut dyn PipelineObserver) -> Result<(), SimError> {
        let cycle = self.stats.cycles + 1;
        let old = &self.latches;

        // Compute every stage from the pre-cycle state.
        let reg_write = wb_stage(&old.mem_wb, &self.registers)?;
        let (mem_wb, store) = mem_stage(&old.ex_mem, &self.memory)?;
        let (ex_mem, taken) = execute_stage(&old.id_ex);
        let mut id_ex = decode_stage(&old.if_id, &self.registers, reg_write)?;
        let mut if_id = fetch_stage(&self.program, self.pc)?;

        let mut stats = self.stats;
        let mut hazard = None;
        let mut forwards = Vec::new();
        let next_pc;

        if taken {
            let target = ex_mem.alu;
            next_pc = usize::try_from(target).map_err(|_| SimError::InstructionOutOfBounds {
                index: target,
                limit: INSTRUCTION_MEMORY_SIZE,
            })?;
            debug!(cycle, branch = %ex_mem.inst, target, "branch taken, flushing IF/ID and ID/EX");
            stats.predict_fails += 1;
            hazard = Some(HazardEvent {
                cycle,
                kind: HazardKind::Branch,
                instruction: ex_mem.inst.clone(),
                description: format!(
                    "branch taken to {target}; flushed `{}` and `{}`",
                    id_ex.inst.raw, if_id.inst.raw
                ),
            });
            id_ex.flush();
            if_id.flush();
        } else {
            let outcome = if self.forwarding {
                hazards::resolve_forwarding(&id_ex, &ex_mem, &mem_wb)
            } else {
                hazards::detect_stall(&id_ex, &ex_mem, &mem_wb)
            };
            match outcome {
                HazardOutcome::Stall { register, producer } => {
                    debug!(cycle, consumer = %id_ex.inst, %producer, register, "data hazard, stalling");
                    stats.data_hazard_stalls += 1;
                    hazard = Some(HazardEvent {
                        cycle,
                        kind: HazardKind::Data,
                        instruction: id_ex.inst.clone(),
                        description: format!(
                            "`{}` waits for register {register} from `{}`",
                            id_ex.inst.raw, producer.raw
                        ),
                    });
                    id_ex.flush();
                    if_id = old.if_id.clone();
                    next_pc = self.pc;
                }
                HazardOutcome::Forward(list) => {
                    for fwd in list {
                        debug!(cycle, source = %fwd.source, target = %id_ex.inst, register = fwd.register, value = fwd.value, "forward");
                        fwd.apply(&mut id_ex);
                        stats.forwards += 1;
                        forwards.push(ForwardEvent {
                            cycle,
                            source: fwd.source,
                            target: id_ex.inst.clone(),
                            register: fwd.register,
                            value: fwd.value,
                        });
                    }
                    next_pc = self.pc + 1;
                }
                HazardOutcome::Clear => next_pc = self.pc + 1,
            }
        }

        stats.cycles += 1;
        if !old.mem_wb.inst.is_bubble() {
            stats.finished_instructions += 1;
        }

        // Commit. Both writes were bounds-checked above.
        if let Some(w) = reg_write {
            self.registers.write(w.rd, w.value)?;
        }
        if let Some(s) = store {
            self.memory.write(s.address, s.value)?;
        }
        self.latches = PipelineLatches {
            if_id,
            id_ex,
            ex_mem,
            mem_wb,
        };
        self.pc = next_pc;
        self.stats = stats;

        for event in &forwards {
            observer.on_forward(event);
        }
        if let Some(event) = &hazard {
            observer.on_hazard(event);
        }
        Ok(())
    }

    /// Runs in the given mode without an observer, bounded by the configured cycle ceiling.
    ///
    /// # Returns
    ///
    /// The number of cycles simulated.
    pub fn run(&mut self, mode: RunMode) -> Result<u64, SimError> {
        self.run_with(mode, &mut ())
    }

    /// Runs in the given mode, bounded by the configured cycle ceiling.
    pub fn run_with(
        &mut self,
        mode: RunMode,
        observer: &mut (dyn PipelineObserver + 'static),
    ) -> Result<u64, SimError> {
        let limit = self.max_cycles;
        runner::run(self, mode, observer, limit)
    }

    /// Returns `true` when every latch holds a bubble and nothing remains to fetch.
    pub fn is_finished(&self) -> bool {
        self.latches.is_empty() && self.program.get(self.pc).is_none()
    }

    /// Program index of the instruction the next cycle fetches.
    pub fn next_index(&self) -> Option<usize> {
        self.program.get(self.pc).and_then(|inst| inst.index)
    }

    /// Returns PC, registers, memory, latches and statistics to their initial state.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.latches = PipelineLatches::default();
        self.registers.reset();
        self.memory.reset();
        self.stats = PipelineStats::default();
    }

    /// Enables or disables forwarding. Resets the engine.
    pub fn set_forwarding(&mut self, enabled: bool) {
        self.forwarding = enabled;
        self.reset();
    }

    /// Replaces the program. Resets the engine.
    ///
    /// # Returns
    ///
    /// `UnsupportedInstruction` (leaving the engine untouched) for a Tomasulo-only opcode.
    pub fn set_program(&mut self, program: Program) -> Result<(), SimError> {
        check_profile(&program)?;
        self.program = program;
        self.reset();
        Ok(())
    }

    /// Whether forwarding is enabled.
    pub const fn forwarding(&self) -> bool {
        self.forwarding
    }

    /// Index of the next instruction to fetch.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Copy of the current latches.
    pub fn latches(&self) -> PipelineLatches {
        self.latches.clone()
    }

    /// Copy of the statistics.
    pub const fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// The loaded program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Copy of every register.
    pub fn registers(&self) -> Vec<i64> {
        self.registers.snapshot()
    }

    /// Copy of every memory cell.
    pub fn memory(&self) -> Vec<i64> {
        self.memory.snapshot()
    }

    /// Reads one register.
    pub fn register(&self, idx: usize) -> Result<i64, SimError> {
        self.registers.read(idx)
    }

    /// Writes one register (ignored for register 0).
    pub fn set_register(&mut self, idx: usize, value: i64) -> Result<(), SimError> {
        self.registers.write(idx, value)
    }

    /// Reads one memory cell.
    pub fn memory_at(&self, address: i64) -> Result<i64, SimError> {
        self.memory.read(address)
    }

    /// Writes one memory cell.
    pub fn set_memory(&mut self, address: i64, value: i64) -> Result<(), SimError> {
        self.memory.write(address, value)
    }
}

impl Engine for PipelineEngine {
    type Observer = dyn PipelineObserver;

    fn step_with(&mut self, observer: &mut Self::Observer) -> Result<(), SimError> {
        self.tick_with(observer)
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }

    fn next_index(&self) -> Option<usize> {
        Self::next_index(self)
    }
}
