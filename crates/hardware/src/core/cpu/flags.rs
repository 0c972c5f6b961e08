//! Processor status register.

/// Carry.
pub const C: u8 = 0x01;
/// Zero.
pub const Z: u8 = 0x02;
/// IRQ disable.
pub const I: u8 = 0x04;
/// Decimal mode.
pub const D: u8 = 0x08;
/// Break; only exists in pushed copies of the register.
pub const B: u8 = 0x10;
/// Unused, reads as 1.
pub const U: u8 = 0x20;
/// Overflow.
pub const V: u8 = 0x40;
/// Negative.
pub const N: u8 = 0x80;

/// The `P` register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status(u8);

impl Default for Status {
    fn default() -> Self {
        Self(U | I)
    }
}

impl Status {
    /// Builds a status value from a raw byte, as pulled from the stack.
    ///
    /// `B` is dropped and `U` forced on.
    #[inline]
    pub const fn from_byte(value: u8) -> Self {
        Self((value & !B) | U)
    }

    /// Raw register value.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Value pushed to the stack; `brk` sets `B` in the copy.
    #[inline]
    pub const fn pushed(self, brk: bool) -> u8 {
        if brk { self.0 | B | U } else { (self.0 & !B) | U }
    }

    /// Tests a flag.
    #[inline(always)]
    pub const fn is_set(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// Sets or clears a flag.
    #[inline(always)]
    pub const fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }

    /// Sets `N` and `Z` from a result byte.
    #[inline(always)]
    pub const fn set_nz(&mut self, value: u8) {
        self.set(Z, value == 0);
        self.set(N, value & 0x80 != 0);
    }

    /// Carry as 0 or 1.
    #[inline(always)]
    pub const fn carry(self) -> u8 {
        self.0 & C
    }
}
