//! Reservation stations.
//!
//! A station slot is either free or holds one in-flight instruction. Operands are either
//! a captured value or the tag of the station that will produce it, so a free slot with
//! stale operands, or an operand that is both, cannot be represented.

use std::fmt;

use crate::isa::Instruction;
use crate::isa::signals::ExecUnit;

/// Station pool (functional-unit class).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FuClass {
    /// `ADD.D` / `SUB.D`.
    Add,
    /// `MUL.D` / `DIV.D`.
    Mul,
    /// `L.D` / `S.D`.
    Mem,
}

impl FuClass {
    /// Pools in CDB arbitration order.
    pub const ALL: [Self; 3] = [Self::Add, Self::Mul, Self::Mem];

    /// Pool serving an execution unit; the integer ALU has none.
    pub const fn for_unit(unit: ExecUnit) -> Option<Self> {
        match unit {
            ExecUnit::AddSub => Some(Self::Add),
            ExecUnit::MulDiv => Some(Self::Mul),
            ExecUnit::LoadStore => Some(Self::Mem),
            ExecUnit::Integer => None,
        }
    }
}

impl fmt::Display for FuClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "ADD",
            Self::Mul => "MUL",
            Self::Mem => "MEM",
        })
    }
}

/// Identifies one station: pool and slot index.
///
/// Used both in the register-status table and inside waiting operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StationTag {
    /// Pool.
    pub class: FuClass,
    /// Slot within the pool.
    pub index: usize,
}

impl StationTag {
    /// Creates a tag.
    pub const fn new(class: FuClass, index: usize) -> Self {
        Self { class, index }
    }
}

impl fmt::Display for StationTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.index)
    }
}

/// A source operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    /// Value captured at issue or delivered by the CDB.
    Ready(f64),
    /// Waiting for the station with this tag to broadcast.
    Pending(StationTag),
}

impl Operand {
    /// Replaces a pending operand waiting on `tag` with `value`.
    pub fn resolve(&mut self, tag: StationTag, value: f64) {
        if *self == Self::Pending(tag) {
            *self = Self::Ready(value);
        }
    }
}

/// An instruction held by a station.
#[derive(Clone, Debug, PartialEq)]
pub struct Reservation {
    /// The source instruction.
    pub instruction: Instruction,
    /// First operand (`rs1`; the base register of a memory op).
    pub j: Operand,
    /// Second operand (`rs2`; the data of a store).
    pub k: Operand,
    /// Destination register, absent for stores and register 0.
    pub dest: Option<usize>,
    /// Address offset for memory ops.
    pub imm: i64,
    /// Effective address, computed when a memory op starts.
    pub address: Option<i64>,
    /// Cycles of execution left; `None` until execution starts.
    pub remaining: Option<u32>,
}

impl Reservation {
    /// Both operand values, once neither is pending.
    pub const fn operands(&self) -> Option<(f64, f64)> {
        match (self.j, self.k) {
            (Operand::Ready(a), Operand::Ready(b)) => Some((a, b)),
            _ => None,
        }
    }
}

/// One reservation-station slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ReservationStation {
    /// Not busy.
    #[default]
    Free,
    /// Busy with an instruction.
    Occupied(Box<Reservation>),
}

impl ReservationStation {
    /// Returns `true` if the slot holds an instruction.
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Occupied(_))
    }

    /// The held instruction's state, if busy.
    pub fn reservation(&self) -> Option<&Reservation> {
        match self {
            Self::Occupied(res) => Some(&**res),
            Self::Free => None,
        }
    }

    /// Mutable access to the held instruction's state, if busy.
    pub fn reservation_mut(&mut self) -> Option<&mut Reservation> {
        match self {
            Self::Occupied(res) => Some(&mut **res),
            Self::Free => None,
        }
    }
}

/// The three station pools.
#[derive(Clone, Debug, PartialEq)]
pub struct StationPools {
    add: Vec<ReservationStation>,
    mul: Vec<ReservationStation>,
    mem: Vec<ReservationStation>,
}

impl StationPools {
    /// Creates free pools of the given sizes.
    pub fn new(add: usize, mul: usize, mem: usize) -> Self {
        Self {
            add: vec![ReservationStation::Free; add],
            mul: vec![ReservationStation::Free; mul],
            mem: vec![ReservationStation::Free; mem],
        }
    }

    /// Stations of one pool.
    pub fn pool(&self, class: FuClass) -> &[ReservationStation] {
        match class {
            FuClass::Add => &self.add,
            FuClass::Mul => &self.mul,
            FuClass::Mem => &self.mem,
        }
    }

    fn pool_mut(&mut self, class: FuClass) -> &mut [ReservationStation] {
        match class {
            FuClass::Add => &mut self.add,
            FuClass::Mul => &mut self.mul,
            FuClass::Mem => &mut self.mem,
        }
    }

    /// Station named by `tag`.
    pub fn get(&self, tag: StationTag) -> Option<&ReservationStation> {
        self.pool(tag.class).get(tag.index)
    }

    /// Mutable station named by `tag`.
    pub fn get_mut(&mut self, tag: StationTag) -> Option<&mut ReservationStation> {
        self.pool_mut(tag.class).get_mut(tag.index)
    }

    /// Lowest-indexed free station of a pool.
    pub fn free_slot(&self, class: FuClass) -> Option<StationTag> {
        self.pool(class)
            .iter()
            .position(|s| !s.is_busy())
            .map(|index| StationTag::new(class, index))
    }

    /// Every station with its tag, in CDB arbitration order (ADD, MUL, MEM; lowest index first).
    pub fn iter(&self) -> impl Iterator<Item = (StationTag, &ReservationStation)> {
        FuClass::ALL.into_iter().flat_map(move |class| {
            self.pool(class)
                .iter()
                .enumerate()
                .map(move |(index, s)| (StationTag::new(class, index), s))
        })
    }

    /// Every busy station's state, mutably.
    pub fn reservations_mut(&mut self) -> impl Iterator<Item = &mut Reservation> {
        self.add
            .iter_mut()
            .chain(self.mul.iter_mut())
            .chain(self.mem.iter_mut())
            .filter_map(ReservationStation::reservation_mut)
    }

    /// Returns `true` if no station is busy.
    pub fn all_free(&self) -> bool {
        self.iter().all(|(_, s)| !s.is_busy())
    }

    /// Frees every station.
    pub fn clear(&mut self) {
        for class in FuClass::ALL {
            self.pool_mut(class).fill(ReservationStation::Free);
        }
    }
}
