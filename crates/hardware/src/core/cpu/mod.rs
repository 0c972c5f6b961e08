//! WDC 65C02 core.
//!
//! This module defines `W65c02`, an instruction-stepped model of the W65C02S used by the
//! audio coprocessor. It coordinates the following:
//! 1. **State Management:** Registers, status flags, and the `WAI`/`STP` latches.
//! 2. **Execution:** Whole-instruction stepping with base and penalty cycle counts.
//! 3. **Interrupts:** IRQ entry through the bus, `BRK`, and `RTI`.
//! 4. **Diagnostics:** Reserved opcodes and `STP` are reported to the bus as halts.
//!
//! The core owns no memory. Every access goes through the [`Bus`] passed into each call,
//! and every write can unwind the current instruction with a [`Stop`](crate::common::Stop).

/// Opcode dispatch and ALU operations.
pub mod execution;

/// Processor status flags.
pub mod flags;

/// Bus helpers: fetches, stack, and addressing modes.
pub mod memory;

/// Base cycle counts.
pub mod timing;

/// Interrupt entry and return.
pub mod trap;

use self::flags::{D, I, Status};
use crate::common::Flow;
use crate::common::constants::RESET_VECTOR;
use crate::core::bus::Bus;
use crate::core::processor::{CpuSnapshot, Processor, Tally};

/// W65C02S register file and execution latches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct W65c02 {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer, offset into page 1.
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Status register.
    pub p: Status,

    freeze: bool,
    waiting: bool,
    irq_line: bool,
    illegal_opcode: bool,
    illegal_opcode_src: u16,
    /// Extra cycles taken by the current instruction.
    penalty: u8,
}

impl W65c02 {
    /// Creates a core in its power-on state, PC at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the core and loads PC from the reset vector.
    pub fn reset<B: Bus>(&mut self, bus: &mut B) {
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
        self.p = Status::default();
        self.p.set(I, true);
        self.p.set(D, false);
        self.freeze = false;
        self.waiting = false;
        self.illegal_opcode = false;
        self.illegal_opcode_src = 0;
        self.pc = self.read_word(bus, RESET_VECTOR);
        tracing::debug!("reset: pc={:04x}", self.pc);
    }

    /// Returns `true` once `STP` has executed.
    pub const fn is_frozen(&self) -> bool {
        self.freeze
    }

    /// Executes one instruction and charges its cycles to `tally`.
    ///
    /// Cycles are charged even when a write inside the instruction unwinds it.
    /// At trace level the registers and opcode are logged before execution.
    pub fn step<B: Bus>(&mut self, bus: &mut B, tally: &mut Tally) -> Flow {
        let at = self.pc;
        let opcode = self.fetch(bus);
        tracing::trace!("{}: {opcode:02x}", CpuSnapshot { pc: at, ..self.snapshot() });
        self.penalty = 0;

        let result = self.execute(bus, opcode, at);

        tally.instructions += 1;
        tally.cycles += u64::from(timing::BASE_CYCLES[opcode as usize]) + u64::from(self.penalty);
        result
    }
}

impl Processor for W65c02 {
    fn attach<B: Bus>(bus: &mut B) -> Self {
        let mut cpu = Self::new();
        cpu.reset(bus);
        cpu
    }

    fn run_batch<B: Bus>(&mut self, bus: &mut B, max_steps: u32, tally: &mut Tally) -> Flow {
        for _ in 0..max_steps {
            if self.freeze || self.waiting {
                break;
            }
            self.step(bus, tally)?;
        }
        Ok(())
    }

    fn is_waiting(&self) -> bool {
        self.waiting
    }

    fn request_interrupt<B: Bus>(&mut self, bus: &mut B, tally: &mut Tally) -> Flow {
        self.irq_line = true;
        if self.freeze {
            return Ok(());
        }
        self.waiting = false;
        if self.p.is_set(I) {
            return Ok(());
        }
        tally.cycles += u64::from(trap::IRQ_CYCLES);
        self.irq(bus)
    }

    fn clear_interrupt(&mut self) {
        self.irq_line = false;
    }

    fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            pc: self.pc,
            status: self.p.bits(),
            freeze: self.freeze,
            waiting: self.waiting,
            illegal_opcode: self.illegal_opcode,
            illegal_opcode_src: self.illegal_opcode_src,
        }
    }
}
