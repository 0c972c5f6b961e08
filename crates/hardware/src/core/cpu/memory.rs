//! Bus access helpers.
//!
//! Instruction fetch, little-endian word reads, the page-1 stack, and effective
//! address calculation for every 65C02 addressing mode. Indexed modes that cross
//! a page charge one penalty cycle when the instruction asks for it.

use super::W65c02;
use crate::common::Flow;
use crate::common::constants::STACK_BASE;
use crate::core::bus::Bus;

/// Operand addressing modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// `#nn`
    Immediate,
    /// `zp`
    ZeroPage,
    /// `zp,X`
    ZeroPageX,
    /// `zp,Y`
    ZeroPageY,
    /// `abs`
    Absolute,
    /// `abs,X`
    AbsoluteX,
    /// `abs,Y`
    AbsoluteY,
    /// `(zp,X)`
    IndirectX,
    /// `(zp),Y`
    IndirectY,
    /// `(zp)`
    ZeroPageIndirect,
}

#[inline(always)]
const fn crosses_page(base: u16, addr: u16) -> bool {
    base & 0xFF00 != addr & 0xFF00
}

impl W65c02 {
    /// Reads the byte at PC and advances PC.
    #[inline(always)]
    pub(super) fn fetch<B: Bus>(&mut self, bus: &mut B) -> u8 {
        let value = bus.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    /// Reads the little-endian word at PC and advances PC by two.
    #[inline(always)]
    pub(super) fn fetch_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.fetch(bus);
        let hi = self.fetch(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Reads a little-endian word; the high byte address wraps at 16 bits.
    pub(super) fn read_word<B: Bus>(&self, bus: &mut B, addr: u16) -> u16 {
        let lo = bus.read(addr);
        let hi = bus.read(addr.wrapping_add(1));
        u16::from_le_bytes([lo, hi])
    }

    /// Reads a pointer from zero page; the high byte wraps within page 0.
    fn read_zp_word<B: Bus>(&self, bus: &mut B, ptr: u8) -> u16 {
        let lo = bus.read(u16::from(ptr));
        let hi = bus.read(u16::from(ptr.wrapping_add(1)));
        u16::from_le_bytes([lo, hi])
    }

    pub(super) fn push<B: Bus>(&mut self, bus: &mut B, value: u8) -> Flow {
        let addr = STACK_BASE | u16::from(self.sp);
        self.sp = self.sp.wrapping_sub(1);
        bus.write(addr, value)
    }

    pub(super) fn push_word<B: Bus>(&mut self, bus: &mut B, value: u16) -> Flow {
        let [lo, hi] = value.to_le_bytes();
        self.push(bus, hi)?;
        self.push(bus, lo)
    }

    pub(super) fn pull<B: Bus>(&mut self, bus: &mut B) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE | u16::from(self.sp))
    }

    pub(super) fn pull_word<B: Bus>(&mut self, bus: &mut B) -> u16 {
        let lo = self.pull(bus);
        let hi = self.pull(bus);
        u16::from_le_bytes([lo, hi])
    }

    /// Computes the effective address of a memory operand.
    ///
    /// `penalize` charges a cycle when an indexed access crosses a page; stores
    /// and most read-modify-write instructions already pay for it in their base
    /// count and pass `false`.
    ///
    /// # Arguments
    ///
    /// * `bus` - Bus used for operand and pointer reads.
    /// * `mode` - Addressing mode; must not be [`Mode::Immediate`].
    /// * `penalize` - Whether a page cross costs an extra cycle.
    pub(super) fn resolve<B: Bus>(&mut self, bus: &mut B, mode: Mode, penalize: bool) -> u16 {
        match mode {
            Mode::Immediate => {
                let addr = self.pc;
                self.pc = self.pc.wrapping_add(1);
                addr
            }
            Mode::ZeroPage => u16::from(self.fetch(bus)),
            Mode::ZeroPageX => u16::from(self.fetch(bus).wrapping_add(self.x)),
            Mode::ZeroPageY => u16::from(self.fetch(bus).wrapping_add(self.y)),
            Mode::Absolute => self.fetch_word(bus),
            Mode::AbsoluteX => {
                let base = self.fetch_word(bus);
                self.indexed(base, self.x, penalize)
            }
            Mode::AbsoluteY => {
                let base = self.fetch_word(bus);
                self.indexed(base, self.y, penalize)
            }
            Mode::IndirectX => {
                let ptr = self.fetch(bus).wrapping_add(self.x);
                self.read_zp_word(bus, ptr)
            }
            Mode::IndirectY => {
                let ptr = self.fetch(bus);
                let base = self.read_zp_word(bus, ptr);
                self.indexed(base, self.y, penalize)
            }
            Mode::ZeroPageIndirect => {
                let ptr = self.fetch(bus);
                self.read_zp_word(bus, ptr)
            }
        }
    }

    fn indexed(&mut self, base: u16, index: u8, penalize: bool) -> u16 {
        let addr = base.wrapping_add(u16::from(index));
        if penalize && crosses_page(base, addr) {
            self.penalty += 1;
        }
        addr
    }

    /// Reads an operand, charging the page-cross penalty.
    pub(super) fn load<B: Bus>(&mut self, bus: &mut B, mode: Mode) -> u8 {
        let addr = self.resolve(bus, mode, true);
        bus.read(addr)
    }

    /// Writes `value` to the operand address.
    pub(super) fn store<B: Bus>(&mut self, bus: &mut B, mode: Mode, value: u8) -> Flow {
        let addr = self.resolve(bus, mode, false);
        bus.write(addr, value)
    }

    /// Branches by the signed offset at PC when `taken`.
    ///
    /// A taken branch costs one cycle, plus one more if it lands on another page.
    pub(super) fn branch<B: Bus>(&mut self, bus: &mut B, taken: bool) {
        let offset = self.fetch(bus) as i8;
        if taken {
            let target = self.pc.wrapping_add_signed(i16::from(offset));
            self.penalty += 1 + u8::from(crosses_page(self.pc, target));
            self.pc = target;
        }
    }
}
