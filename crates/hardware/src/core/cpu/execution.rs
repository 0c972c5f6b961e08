//! Opcode Dispatch.
//!
//! This module decodes and executes one W65C02S instruction. It performs the following:
//! 1. **Dispatch:** A single match over all 256 opcodes, grouped by instruction.
//! 2. **ALU:** Binary and decimal add/subtract, compares, logic, shifts and rotates.
//! 3. **65C02 Extensions:** `BRA`, `STZ`, `TSB`/`TRB`, `(zp)` operands, `RMB`/`SMB`/`BBR`/`BBS`.
//! 4. **Halts:** `WAI` parks the core, `STP` freezes it, reserved opcodes run as NOPs
//!    and raise a halt notice.

use super::W65c02;
use super::flags::{C, D, I, N, Status, V, Z};
use super::memory::Mode::{
    self, Absolute, AbsoluteX, AbsoluteY, Immediate, IndirectX, IndirectY, ZeroPage,
    ZeroPageIndirect, ZeroPageX, ZeroPageY,
};
use crate::common::Flow;
use crate::core::bus::Bus;

impl W65c02 {
    /// Executes `opcode`, fetched from `at`. PC already points past the opcode byte.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, opcode: u8, at: u16) -> Flow {
        match opcode {
            // Loads
            0xA9 => self.read_op(bus, Immediate, Self::lda),
            0xA5 => self.read_op(bus, ZeroPage, Self::lda),
            0xB5 => self.read_op(bus, ZeroPageX, Self::lda),
            0xAD => self.read_op(bus, Absolute, Self::lda),
            0xBD => self.read_op(bus, AbsoluteX, Self::lda),
            0xB9 => self.read_op(bus, AbsoluteY, Self::lda),
            0xA1 => self.read_op(bus, IndirectX, Self::lda),
            0xB1 => self.read_op(bus, IndirectY, Self::lda),
            0xB2 => self.read_op(bus, ZeroPageIndirect, Self::lda),
            0xA2 => self.read_op(bus, Immediate, Self::ldx),
            0xA6 => self.read_op(bus, ZeroPage, Self::ldx),
            0xB6 => self.read_op(bus, ZeroPageY, Self::ldx),
            0xAE => self.read_op(bus, Absolute, Self::ldx),
            0xBE => self.read_op(bus, AbsoluteY, Self::ldx),
            0xA0 => self.read_op(bus, Immediate, Self::ldy),
            0xA4 => self.read_op(bus, ZeroPage, Self::ldy),
            0xB4 => self.read_op(bus, ZeroPageX, Self::ldy),
            0xAC => self.read_op(bus, Absolute, Self::ldy),
            0xBC => self.read_op(bus, AbsoluteX, Self::ldy),

            // Stores
            0x85 => self.store(bus, ZeroPage, self.a)?,
            0x95 => self.store(bus, ZeroPageX, self.a)?,
            0x8D => self.store(bus, Absolute, self.a)?,
            0x9D => self.store(bus, AbsoluteX, self.a)?,
            0x99 => self.store(bus, AbsoluteY, self.a)?,
            0x81 => self.store(bus, IndirectX, self.a)?,
            0x91 => self.store(bus, IndirectY, self.a)?,
            0x92 => self.store(bus, ZeroPageIndirect, self.a)?,
            0x86 => self.store(bus, ZeroPage, self.x)?,
            0x96 => self.store(bus, ZeroPageY, self.x)?,
            0x8E => self.store(bus, Absolute, self.x)?,
            0x84 => self.store(bus, ZeroPage, self.y)?,
            0x94 => self.store(bus, ZeroPageX, self.y)?,
            0x8C => self.store(bus, Absolute, self.y)?,
            0x64 => self.store(bus, ZeroPage, 0)?,
            0x74 => self.store(bus, ZeroPageX, 0)?,
            0x9C => self.store(bus, Absolute, 0)?,
            0x9E => self.store(bus, AbsoluteX, 0)?,

            // Logic and arithmetic
            0x09 => self.read_op(bus, Immediate, Self::ora),
            0x05 => self.read_op(bus, ZeroPage, Self::ora),
            0x15 => self.read_op(bus, ZeroPageX, Self::ora),
            0x0D => self.read_op(bus, Absolute, Self::ora),
            0x1D => self.read_op(bus, AbsoluteX, Self::ora),
            0x19 => self.read_op(bus, AbsoluteY, Self::ora),
            0x01 => self.read_op(bus, IndirectX, Self::ora),
            0x11 => self.read_op(bus, IndirectY, Self::ora),
            0x12 => self.read_op(bus, ZeroPageIndirect, Self::ora),
            0x29 => self.read_op(bus, Immediate, Self::and),
            0x25 => self.read_op(bus, ZeroPage, Self::and),
            0x35 => self.read_op(bus, ZeroPageX, Self::and),
            0x2D => self.read_op(bus, Absolute, Self::and),
            0x3D => self.read_op(bus, AbsoluteX, Self::and),
            0x39 => self.read_op(bus, AbsoluteY, Self::and),
            0x21 => self.read_op(bus, IndirectX, Self::and),
            0x31 => self.read_op(bus, IndirectY, Self::and),
            0x32 => self.read_op(bus, ZeroPageIndirect, Self::and),
            0x49 => self.read_op(bus, Immediate, Self::eor),
            0x45 => self.read_op(bus, ZeroPage, Self::eor),
            0x55 => self.read_op(bus, ZeroPageX, Self::eor),
            0x4D => self.read_op(bus, Absolute, Self::eor),
            0x5D => self.read_op(bus, AbsoluteX, Self::eor),
            0x59 => self.read_op(bus, AbsoluteY, Self::eor),
            0x41 => self.read_op(bus, IndirectX, Self::eor),
            0x51 => self.read_op(bus, IndirectY, Self::eor),
            0x52 => self.read_op(bus, ZeroPageIndirect, Self::eor),
            0x69 => self.read_op(bus, Immediate, Self::adc),
            0x65 => self.read_op(bus, ZeroPage, Self::adc),
            0x75 => self.read_op(bus, ZeroPageX, Self::adc),
            0x6D => self.read_op(bus, Absolute, Self::adc),
            0x7D => self.read_op(bus, AbsoluteX, Self::adc),
            0x79 => self.read_op(bus, AbsoluteY, Self::adc),
            0x61 => self.read_op(bus, IndirectX, Self::adc),
            0x71 => self.read_op(bus, IndirectY, Self::adc),
            0x72 => self.read_op(bus, ZeroPageIndirect, Self::adc),
            0xE9 => self.read_op(bus, Immediate, Self::sbc),
            0xE5 => self.read_op(bus, ZeroPage, Self::sbc),
            0xF5 => self.read_op(bus, ZeroPageX, Self::sbc),
            0xED => self.read_op(bus, Absolute, Self::sbc),
            0xFD => self.read_op(bus, AbsoluteX, Self::sbc),
            0xF9 => self.read_op(bus, AbsoluteY, Self::sbc),
            0xE1 => self.read_op(bus, IndirectX, Self::sbc),
            0xF1 => self.read_op(bus, IndirectY, Self::sbc),
            0xF2 => self.read_op(bus, ZeroPageIndirect, Self::sbc),

            // Compares and bit tests
            0xC9 => self.read_op(bus, Immediate, Self::cmp),
            0xC5 => self.read_op(bus, ZeroPage, Self::cmp),
            0xD5 => self.read_op(bus, ZeroPageX, Self::cmp),
            0xCD => self.read_op(bus, Absolute, Self::cmp),
            0xDD => self.read_op(bus, AbsoluteX, Self::cmp),
            0xD9 => self.read_op(bus, AbsoluteY, Self::cmp),
            0xC1 => self.read_op(bus, IndirectX, Self::cmp),
            0xD1 => self.read_op(bus, IndirectY, Self::cmp),
            0xD2 => self.read_op(bus, ZeroPageIndirect, Self::cmp),
            0xE0 => self.read_op(bus, Immediate, Self::cpx),
            0xE4 => self.read_op(bus, ZeroPage, Self::cpx),
            0xEC => self.read_op(bus, Absolute, Self::cpx),
            0xC0 => self.read_op(bus, Immediate, Self::cpy),
            0xC4 => self.read_op(bus, ZeroPage, Self::cpy),
            0xCC => self.read_op(bus, Absolute, Self::cpy),
            0x89 => self.read_op(bus, Immediate, Self::bit_immediate),
            0x24 => self.read_op(bus, ZeroPage, Self::bit),
            0x34 => self.read_op(bus, ZeroPageX, Self::bit),
            0x2C => self.read_op(bus, Absolute, Self::bit),
            0x3C => self.read_op(bus, AbsoluteX, Self::bit),

            // Shifts, rotates, increments
            0x0A => self.a = self.asl(self.a),
            0x06 => self.modify(bus, ZeroPage, false, Self::asl)?,
            0x16 => self.modify(bus, ZeroPageX, false, Self::asl)?,
            0x0E => self.modify(bus, Absolute, false, Self::asl)?,
            0x1E => self.modify(bus, AbsoluteX, true, Self::asl)?,
            0x2A => self.a = self.rol(self.a),
            0x26 => self.modify(bus, ZeroPage, false, Self::rol)?,
            0x36 => self.modify(bus, ZeroPageX, false, Self::rol)?,
            0x2E => self.modify(bus, Absolute, false, Self::rol)?,
            0x3E => self.modify(bus, AbsoluteX, true, Self::rol)?,
            0x4A => self.a = self.lsr(self.a),
            0x46 => self.modify(bus, ZeroPage, false, Self::lsr)?,
            0x56 => self.modify(bus, ZeroPageX, false, Self::lsr)?,
            0x4E => self.modify(bus, Absolute, false, Self::lsr)?,
            0x5E => self.modify(bus, AbsoluteX, true, Self::lsr)?,
            0x6A => self.a = self.ror(self.a),
            0x66 => self.modify(bus, ZeroPage, false, Self::ror)?,
            0x76 => self.modify(bus, ZeroPageX, false, Self::ror)?,
            0x6E => self.modify(bus, Absolute, false, Self::ror)?,
            0x7E => self.modify(bus, AbsoluteX, true, Self::ror)?,
            0x1A => self.a = self.increment(self.a),
            0xE6 => self.modify(bus, ZeroPage, false, Self::increment)?,
            0xF6 => self.modify(bus, ZeroPageX, false, Self::increment)?,
            0xEE => self.modify(bus, Absolute, false, Self::increment)?,
            0xFE => self.modify(bus, AbsoluteX, false, Self::increment)?,
            0x3A => self.a = self.decrement(self.a),
            0xC6 => self.modify(bus, ZeroPage, false, Self::decrement)?,
            0xD6 => self.modify(bus, ZeroPageX, false, Self::decrement)?,
            0xCE => self.modify(bus, Absolute, false, Self::decrement)?,
            0xDE => self.modify(bus, AbsoluteX, false, Self::decrement)?,
            0x04 => self.modify(bus, ZeroPage, false, Self::tsb)?,
            0x0C => self.modify(bus, Absolute, false, Self::tsb)?,
            0x14 => self.modify(bus, ZeroPage, false, Self::trb)?,
            0x1C => self.modify(bus, Absolute, false, Self::trb)?,

            // Register transfers and index arithmetic
            0xE8 => self.x = self.increment(self.x),
            0xC8 => self.y = self.increment(self.y),
            0xCA => self.x = self.decrement(self.x),
            0x88 => self.y = self.decrement(self.y),
            0xAA => self.x = self.transfer(self.a),
            0xA8 => self.y = self.transfer(self.a),
            0x8A => self.a = self.transfer(self.x),
            0x98 => self.a = self.transfer(self.y),
            0xBA => self.x = self.transfer(self.sp),
            0x9A => self.sp = self.x,

            // Stack
            0x48 => self.push(bus, self.a)?,
            0xDA => self.push(bus, self.x)?,
            0x5A => self.push(bus, self.y)?,
            0x08 => self.push(bus, self.p.pushed(true))?,
            0x68 => {
                let value = self.pull(bus);
                self.a = self.transfer(value);
            }
            0xFA => {
                let value = self.pull(bus);
                self.x = self.transfer(value);
            }
            0x7A => {
                let value = self.pull(bus);
                self.y = self.transfer(value);
            }
            0x28 => {
                let value = self.pull(bus);
                self.p = Status::from_byte(value);
            }

            // Flags
            0x18 => self.p.set(C, false),
            0x38 => self.p.set(C, true),
            0x58 => self.p.set(I, false),
            0x78 => self.p.set(I, true),
            0xB8 => self.p.set(V, false),
            0xD8 => self.p.set(D, false),
            0xF8 => self.p.set(D, true),

            // Branches
            0x10 => self.branch(bus, !self.p.is_set(N)),
            0x30 => self.branch(bus, self.p.is_set(N)),
            0x50 => self.branch(bus, !self.p.is_set(V)),
            0x70 => self.branch(bus, self.p.is_set(V)),
            0x90 => self.branch(bus, !self.p.is_set(C)),
            0xB0 => self.branch(bus, self.p.is_set(C)),
            0xD0 => self.branch(bus, !self.p.is_set(Z)),
            0xF0 => self.branch(bus, self.p.is_set(Z)),
            0x80 => self.branch(bus, true),

            // Jumps, calls, interrupts
            0x4C => self.pc = self.fetch_word(bus),
            0x6C => {
                let ptr = self.fetch_word(bus);
                self.pc = self.read_word(bus, ptr);
            }
            0x7C => {
                let ptr = self.fetch_word(bus).wrapping_add(u16::from(self.x));
                self.pc = self.read_word(bus, ptr);
            }
            0x20 => {
                let target = self.fetch_word(bus);
                self.push_word(bus, self.pc.wrapping_sub(1))?;
                self.pc = target;
            }
            0x60 => self.pc = self.pull_word(bus).wrapping_add(1),
            0x40 => self.rti(bus),
            0x00 => self.brk(bus)?,

            // Rockwell/WDC bit operations
            op if op & 0x0F == 0x07 => {
                let mask = 1u8 << ((op >> 4) & 0x07);
                let set = op & 0x80 != 0;
                self.modify(bus, ZeroPage, false, move |_, value| {
                    if set { value | mask } else { value & !mask }
                })?;
            }
            op if op & 0x0F == 0x0F => {
                let mask = 1u8 << ((op >> 4) & 0x07);
                let set = op & 0x80 != 0;
                let zp = self.fetch(bus);
                let value = bus.read(u16::from(zp));
                self.branch(bus, (value & mask != 0) == set);
            }

            0xEA => {}
            0xCB => {
                if !self.irq_line {
                    self.waiting = true;
                }
            }
            0xDB => {
                self.freeze = true;
                tracing::warn!("STP at {at:04x}");
                bus.notify_halt();
            }

            // Reserved: NOPs of their architectural length
            0x02 | 0x22 | 0x42 | 0x62 | 0x82 | 0xC2 | 0xE2 | 0x44 | 0x54 | 0xD4 | 0xF4 => {
                self.reserved(bus, opcode, at, 1);
            }
            0x5C | 0xDC | 0xFC => self.reserved(bus, opcode, at, 2),
            // Columns 3 and B
            _ => self.reserved(bus, opcode, at, 0),
        }
        Ok(())
    }

    fn read_op<B: Bus>(&mut self, bus: &mut B, mode: Mode, op: fn(&mut Self, u8)) {
        let value = self.load(bus, mode);
        op(self, value);
    }

    fn modify<B, F>(&mut self, bus: &mut B, mode: Mode, penalize: bool, op: F) -> Flow
    where
        B: Bus,
        F: FnOnce(&mut Self, u8) -> u8,
    {
        let addr = self.resolve(bus, mode, penalize);
        let value = bus.read(addr);
        let result = op(self, value);
        bus.write(addr, result)
    }

    fn reserved<B: Bus>(&mut self, bus: &mut B, opcode: u8, at: u16, operands: u16) {
        self.pc = self.pc.wrapping_add(operands);
        self.illegal_opcode = true;
        self.illegal_opcode_src = at;
        tracing::warn!("reserved opcode {opcode:02x} at {at:04x}");
        bus.notify_halt();
    }

    fn transfer(&mut self, value: u8) -> u8 {
        self.p.set_nz(value);
        value
    }

    fn lda(&mut self, value: u8) {
        self.a = self.transfer(value);
    }

    fn ldx(&mut self, value: u8) {
        self.x = self.transfer(value);
    }

    fn ldy(&mut self, value: u8) {
        self.y = self.transfer(value);
    }

    fn ora(&mut self, value: u8) {
        self.a = self.transfer(self.a | value);
    }

    fn and(&mut self, value: u8) {
        self.a = self.transfer(self.a & value);
    }

    fn eor(&mut self, value: u8) {
        self.a = self.transfer(self.a ^ value);
    }

    /// Binary `A + value + C`: result, carry out, signed overflow.
    fn binary_sum(&self, value: u8) -> (u8, bool, bool) {
        let sum = u16::from(self.a) + u16::from(value) + u16::from(self.p.carry());
        let result = sum as u8;
        let overflow = (self.a ^ result) & (value ^ result) & 0x80 != 0;
        (result, sum > 0xFF, overflow)
    }

    fn adc(&mut self, value: u8) {
        if !self.p.is_set(D) {
            let (result, carry, overflow) = self.binary_sum(value);
            self.p.set(C, carry);
            self.p.set(V, overflow);
            self.a = self.transfer(result);
            return;
        }

        self.penalty += 1;
        let a = i16::from(self.a);
        let b = i16::from(value);
        let mut lo = (a & 0x0F) + (b & 0x0F) + i16::from(self.p.carry());
        if lo >= 0x0A {
            lo = ((lo + 0x06) & 0x0F) + 0x10;
        }
        let signed = i16::from((self.a & 0xF0) as i8) + i16::from((value & 0xF0) as i8) + lo;
        let mut sum = (a & 0xF0) + (b & 0xF0) + lo;
        if sum >= 0xA0 {
            sum += 0x60;
        }
        self.p.set(V, !(-128..=127).contains(&signed));
        self.p.set(C, sum >= 0x100);
        self.a = self.transfer(sum as u8);
    }

    fn sbc(&mut self, value: u8) {
        let (result, carry, overflow) = self.binary_sum(!value);
        self.p.set(V, overflow);
        if !self.p.is_set(D) {
            self.p.set(C, carry);
            self.a = self.transfer(result);
            return;
        }

        self.penalty += 1;
        let a = i16::from(self.a);
        let b = i16::from(value);
        let borrow = 1 - i16::from(self.p.carry());
        let lo = (a & 0x0F) - (b & 0x0F) - borrow;
        let mut diff = a - b - borrow;
        if diff < 0 {
            diff -= 0x60;
        }
        if lo < 0 {
            diff -= 0x06;
        }
        self.p.set(C, carry);
        self.a = self.transfer(diff as u8);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.p.set(C, register >= value);
        self.p.set_nz(register.wrapping_sub(value));
    }

    fn cmp(&mut self, value: u8) {
        self.compare(self.a, value);
    }

    fn cpx(&mut self, value: u8) {
        self.compare(self.x, value);
    }

    fn cpy(&mut self, value: u8) {
        self.compare(self.y, value);
    }

    fn bit(&mut self, value: u8) {
        self.p.set(Z, self.a & value == 0);
        self.p.set(N, value & 0x80 != 0);
        self.p.set(V, value & 0x40 != 0);
    }

    fn bit_immediate(&mut self, value: u8) {
        self.p.set(Z, self.a & value == 0);
    }

    fn asl(&mut self, value: u8) -> u8 {
        self.p.set(C, value & 0x80 != 0);
        self.transfer(value << 1)
    }

    fn lsr(&mut self, value: u8) -> u8 {
        self.p.set(C, value & 0x01 != 0);
        self.transfer(value >> 1)
    }

    fn rol(&mut self, value: u8) -> u8 {
        let carry_in = self.p.carry();
        self.p.set(C, value & 0x80 != 0);
        self.transfer((value << 1) | carry_in)
    }

    fn ror(&mut self, value: u8) -> u8 {
        let carry_in = self.p.carry() << 7;
        self.p.set(C, value & 0x01 != 0);
        self.transfer((value >> 1) | carry_in)
    }

    fn increment(&mut self, value: u8) -> u8 {
        self.transfer(value.wrapping_add(1))
    }

    fn decrement(&mut self, value: u8) -> u8 {
        self.transfer(value.wrapping_sub(1))
    }

    fn tsb(&mut self, value: u8) -> u8 {
        self.p.set(Z, self.a & value == 0);
        value | self.a
    }

    fn trb(&mut self, value: u8) -> u8 {
        self.p.set(Z, self.a & value == 0);
        value & !self.a
    }
}
