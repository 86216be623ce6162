//! Tomasulo dynamic-scheduling engine.
//!
//! One call to [`TomasuloEngine::step`] simulates one clock cycle:
//! 1. **Issue:** The next instruction takes the lowest free station of its pool, capturing
//!    ready operand values (or producer tags) through the register-status table.
//! 2. **Execute:** Every busy station is evaluated from the pre-cycle state: starting its
//!    countdown once operands are ready (memory ops only at the queue head), or counting down.
//! 3. **Write-Back:** At most one finished arithmetic op or load wins the CDB per cycle, in
//!    ADD, MUL, MEM order, lowest index first. Stores write memory directly instead.
//!
//! The outcome is applied in a fixed order: issue, CDB broadcast, countdown updates,
//! store write, queue pop. A broadcast therefore also resolves operands of the
//! instruction issued in the same cycle, but nothing issued or broadcast in a cycle can
//! start executing before the next one.

use tracing::{debug, trace};

use crate::common::error::SimError;
use crate::common::memory::DataMemory;
use crate::common::reg::RegisterFile;
use crate::config::{Config, LatencyConfig};
use crate::core::tomasulo::events::{InstructionStatus, StatusEvent, TomasuloObserver};
use crate::core::tomasulo::mem_queue::MemoryQueue;
use crate::core::tomasulo::station::{
    FuClass, Operand, Reservation, ReservationStation, StationPools, StationTag,
};
use crate::core::tomasulo::status::RegisterStatus;
use crate::isa::{Instruction, Opcode, Profile, Program};
use crate::sim::runner::{self, Engine, RunMode};
use crate::stats::TomasuloStats;

/// Name used in `UnsupportedInstruction` errors.
const ENGINE_NAME: &str = "tomasulo";

/// Rejects instructions that have no station pool.
fn check_profile(program: &Program) -> Result<(), SimError> {
    match program.iter().find(|inst| inst.op.profile() != Profile::Tomasulo) {
        Some(inst) => Err(SimError::UnsupportedInstruction {
            raw: inst.raw.to_string(),
            engine: ENGINE_NAME,
        }),
        None => Ok(()),
    }
}

/// Execution latency of an opcode.
const fn latency(latencies: &LatencyConfig, op: Opcode) -> u32 {
    match op {
        Opcode::MulD => latencies.mul,
        Opcode::DivD => latencies.div,
        Opcode::LoadD | Opcode::StoreD => latencies.mem,
        _ => latencies.add_sub,
    }
}

/// Converts a computed floating-point address to a memory index.
fn effective_address(mem: &DataMemory<f64>, base: f64, imm: i64) -> Result<i64, SimError> {
    let value = base + imm as f64;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(SimError::InvalidAddress { value });
    }
    let address = value as i64;
    let _ = mem.check(address)?;
    Ok(address)
}

/// The single CDB grant of a cycle.
#[derive(Debug)]
struct Broadcast {
    tag: StationTag,
    dest: Option<usize>,
    value: f64,
}

/// Tomasulo engine: three reservation-station pools, a register-status table and a
/// memory order queue over a floating-point register file and data memory.
#[derive(Clone, Debug)]
pub struct TomasuloEngine {
    program: Program,
    pc: usize,
    stations: StationPools,
    status: RegisterStatus,
    mem_queue: MemoryQueue,
    registers: RegisterFile<f64>,
    memory: DataMemory<f64>,
    latencies: LatencyConfig,
    stats: TomasuloStats,
    max_cycles: u64,
}

impl TomasuloEngine {
    /// Creates an engine for `program`.
    ///
    /// # Arguments
    ///
    /// * `program` - A label-resolved program using only Tomasulo opcodes.
    /// * `config` - Storage sizes, pool sizes, latencies and the cycle ceiling.
    ///
    /// # Returns
    ///
    /// The engine in its reset state, `InvalidConfig` for an unusable configuration, or
    /// `UnsupportedInstruction` for an integer-pipeline opcode.
    pub fn new(program: Program, config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        check_profile(&program)?;
        let t = &config.tomasulo;
        Ok(Self {
            program,
            pc: 0,
            stations: StationPools::new(t.add_stations, t.mul_stations, t.mem_stations),
            status: RegisterStatus::new(config.machine.register_count),
            mem_queue: MemoryQueue::new(),
            registers: RegisterFile::new(config.machine.register_count),
            memory: DataMemory::new(config.machine.memory_size),
            latencies: t.latency,
            stats: TomasuloStats::default(),
            max_cycles: config.machine.max_cycles,
        })
    }

    /// Simulates one clock cycle without an observer.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.step_with(&mut ())
    }

    /// Reads a source operand through the register-status table.
    fn operand(&self, reg: Option<usize>) -> Result<Operand, SimError> {
        let Some(reg) = reg else {
            return Ok(Operand::Ready(0.0));
        };
        Ok(match self.status.producer(reg)? {
            Some(tag) => Operand::Pending(tag),
            None => Operand::Ready(self.registers.read(reg)?),
        })
    }

    /// Plans this cycle's issue from the pre-cycle state.
    fn plan_issue(&self) -> Result<Option<(StationTag, Reservation)>, SimError> {
        let Some(inst) = self.program.get(self.pc) else {
            return Ok(None);
        };
        let class = FuClass::for_unit(inst.ctrl.unit).ok_or_else(|| {
            SimError::UnsupportedInstruction {
                raw: inst.raw.to_string(),
                engine: ENGINE_NAME,
            }
        })?;
        let Some(tag) = self.stations.free_slot(class) else {
            trace!(inst = %inst, pool = %class, "structural stall, no free station");
            return Ok(None);
        };
        let dest = inst.dest();
        if let Some(d) = dest {
            self.registers.check(d)?;
        }
        Ok(Some((
            tag,
            Reservation {
                instruction: inst.clone(),
                j: self.operand(inst.rs1)?,
                k: self.operand(inst.rs2)?,
                dest,
                imm: inst.imm.unwrap_or(0),
                address: None,
                remaining: None,
            },
        )))
    }

    /// Simulates one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `observer` - Receives the cycle's status transitions after commit.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or a bounds/address error; on error nothing from this cycle is committed.
    pub fn step_with(&mut self, observer: &mut dyn TomasuloObserver) -> Result<(), SimError> {
        let cycle = self.stats.cycles + 1;
        let mut events = Vec::new();
        let mut stats = self.stats;

        let mut stations = self.stations.clone();
        let mut status = self.status.clone();
        let mut queue = self.mem_queue.clone();
        let mut pc = self.pc;

        // Issue.
        if let Some((tag, reservation)) = self.plan_issue()? {
            debug!(cycle, inst = %reservation.instruction, station = %tag, "issue");
            if let Some(d) = reservation.dest {
                status.set_producer(d, tag)?;
            }
            if tag.class == FuClass::Mem {
                queue.push(tag.index);
            }
            events.push(StatusEvent {
                cycle,
                instruction: reservation.instruction.clone(),
                status: InstructionStatus::Issued,
            });
            if let Some(slot) = stations.get_mut(tag) {
                *slot = ReservationStation::Occupied(Box::new(reservation));
            }
            pc += 1;
        }

        // Execute, deciding from the pre-cycle stations only.
        let mut cdb: Option<Broadcast> = None;
        let mut store: Option<(i64, f64)> = None;
        let mut pop_queue = false;

        for (tag, station) in self.stations.iter() {
            let Some(res) = station.reservation() else {
                continue;
            };
            let inst = &res.instruction;
            let ctrl = inst.ctrl;
            let lat = latency(&self.latencies, inst.op);
            let is_mem = tag.class == FuClass::Mem;

            // New countdown value for this station, if it changes.
            let mut update: Option<(u32, Option<i64>)> = None;

            match res.remaining {
                None => {
                    if is_mem {
                        if let (true, Operand::Ready(base)) = (self.mem_queue.is_head(tag.index), res.j) {
                            let address = effective_address(&self.memory, base, res.imm)?;
                            update = Some((lat.saturating_sub(1), Some(address)));
                            // A load releases its queue slot once it starts; a store holds it.
                            if ctrl.mem_read {
                                pop_queue = true;
                            }
                        }
                    } else if res.operands().is_some() {
                        update = Some((lat.saturating_sub(1), None));
                    }
                    if update.is_some() {
                        trace!(cycle, inst = %inst, station = %tag, "execute start");
                        events.push(StatusEvent {
                            cycle,
                            instruction: inst.clone(),
                            status: InstructionStatus::ExecuteStart,
                        });
                    }
                }
                Some(0) if ctrl.mem_write => {
                    if let (Some(address), Operand::Ready(value)) = (res.address, res.k) {
                        debug!(cycle, inst = %inst, station = %tag, address, value, "store write");
                        store = Some((address, value));
                        pop_queue = true;
                        stats.finished_instructions += 1;
                        if let Some(slot) = stations.get_mut(tag) {
                            *slot = ReservationStation::Free;
                        }
                        events.push(StatusEvent {
                            cycle,
                            instruction: inst.clone(),
                            status: InstructionStatus::WriteBack,
                        });
                    }
                }
                Some(0) => {
                    if cdb.is_none() {
                        let value = if ctrl.mem_read {
                            match res.address {
                                Some(address) => Some(self.memory.read(address)?),
                                None => None,
                            }
                        } else {
                            res.operands().map(|(a, b)| ctrl.alu.eval_f64(a, b))
                        };
                        if let Some(value) = value {
                            debug!(cycle, inst = %inst, station = %tag, value, "CDB grant");
                            cdb = Some(Broadcast {
                                tag,
                                dest: res.dest,
                                value,
                            });
                            events.push(StatusEvent {
                                cycle,
                                instruction: inst.clone(),
                                status: InstructionStatus::WriteBack,
                            });
                        }
                    }
                }
                Some(r) => update = Some((r - 1, res.address)),
            }

            if let Some((remaining, address)) = update {
                if remaining == 0 {
                    events.push(StatusEvent {
                        cycle,
                        instruction: inst.clone(),
                        status: InstructionStatus::ExecuteEnd,
                    });
                }
                if let Some(next) = stations.get_mut(tag).and_then(ReservationStation::reservation_mut) {
                    next.remaining = Some(remaining);
                    next.address = address;
                }
            }
        }

        // CDB broadcast.
        let mut reg_write = None;
        if let Some(b) = &cdb {
            if let Some(slot) = stations.get_mut(b.tag) {
                *slot = ReservationStation::Free;
            }
            if let Some(d) = b.dest {
                if status.clear_if_match(d, b.tag) {
                    reg_write = Some((d, b.value));
                }
            }
            for res in stations.reservations_mut() {
                res.j.resolve(b.tag, b.value);
                res.k.resolve(b.tag, b.value);
            }
            stats.finished_instructions += 1;
        }

        if pop_queue {
            let _ = queue.pop();
        }
        stats.cycles += 1;

        // Commit. Register and memory targets were bounds-checked above.
        if let Some((d, value)) = reg_write {
            self.registers.write(d, value)?;
        }
        if let Some((address, value)) = store {
            self.memory.write(address, value)?;
        }
        self.stations = stations;
        self.status = status;
        self.mem_queue = queue;
        self.pc = pc;
        self.stats = stats;

        for event in &events {
            observer.on_status(event);
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
        observer: &mut (dyn TomasuloObserver + 'static),
    ) -> Result<u64, SimError> {
        let limit = self.max_cycles;
        runner::run(self, mode, observer, limit)
    }

    /// Returns `true` once every instruction has issued, every station is free and no
    /// register awaits a value.
    pub fn is_finished(&self) -> bool {
        self.pc >= self.program.len() && self.stations.all_free() && self.status.is_clear()
    }

    /// Program index of the next instruction to issue.
    pub fn next_index(&self) -> Option<usize> {
        self.program.get(self.pc).and_then(|inst| inst.index)
    }

    /// Returns PC, stations, tags, queue, registers, memory and statistics to their initial state.
    pub fn reset(&mut self) {
        self.pc = 0;
        self.stations.clear();
        self.status.flush();
        self.mem_queue.clear();
        self.registers.reset();
        self.memory.reset();
        self.stats = TomasuloStats::default();
    }

    /// Replaces the program. Resets the engine.
    ///
    /// # Returns
    ///
    /// `UnsupportedInstruction` (leaving the engine untouched) for a pipeline opcode.
    pub fn set_program(&mut self, program: Program) -> Result<(), SimError> {
        check_profile(&program)?;
        self.program = program;
        self.reset();
        Ok(())
    }

    /// Copy of one station pool.
    pub fn stations(&self, class: FuClass) -> Vec<ReservationStation> {
        self.stations.pool(class).to_vec()
    }

    /// Copy of the register-status table.
    pub fn register_status(&self) -> Vec<Option<StationTag>> {
        self.status.snapshot()
    }

    /// Copy of the memory order queue (MEM station indices, head first).
    pub fn memory_queue(&self) -> Vec<usize> {
        self.mem_queue.snapshot()
    }

    /// Index of the next instruction to issue.
    pub const fn pc(&self) -> usize {
        self.pc
    }

    /// Copy of the statistics.
    pub const fn stats(&self) -> TomasuloStats {
        self.stats
    }

    /// The loaded program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Instruction held by the station `tag`, if busy.
    pub fn instruction_at(&self, tag: StationTag) -> Option<&Instruction> {
        self.stations
            .get(tag)
            .and_then(ReservationStation::reservation)
            .map(|res| &res.instruction)
    }

    /// Copy of every register.
    pub fn registers(&self) -> Vec<f64> {
        self.registers.snapshot()
    }

    /// Copy of every memory cell.
    pub fn memory(&self) -> Vec<f64> {
        self.memory.snapshot()
    }

    /// Reads one register.
    pub fn register(&self, idx: usize) -> Result<f64, SimError> {
        self.registers.read(idx)
    }

    /// Writes one register (ignored for register 0).
    pub fn set_register(&mut self, idx: usize, value: f64) -> Result<(), SimError> {
        self.registers.write(idx, value)
    }

    /// Reads one memory cell.
    pub fn memory_at(&self, address: i64) -> Result<f64, SimError> {
        self.memory.read(address)
    }

    /// Writes one memory cell.
    pub fn set_memory(&mut self, address: i64, value: f64) -> Result<(), SimError> {
        self.memory.write(address, value)
    }
}

impl Engine for TomasuloEngine {
    type Observer = dyn TomasuloObserver;

    fn step_with(&mut self, observer: &mut Self::Observer) -> Result<(), SimError> {
        Self::step_with(self, observer)
    }

    fn is_finished(&self) -> bool {
        Self::is_finished(self)
    }

    fn next_index(&self) -> Option<usize> {
        Self::next_index(self)
    }
}
