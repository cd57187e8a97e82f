//! LR35902 register file.
//!
//! The CPU has eight 8-bit registers (A, F, B, C, D, E, H, L) that are
//! stored as four 16-bit pairs:
//! - AF: accumulator (high) and flags (low)
//! - BC, DE, HL: general purpose pairs, HL doubling as the memory pointer
//!
//! plus the 16-bit program counter (PC) and stack pointer (SP).
//!
//! Bits 15-8 of a pair hold the high register, bits 7-0 the low one.
//! Writing one half never disturbs the other.

use crate::cpu::memory::{Memory, MemoryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bits 15-8 of a register pair.
#[inline]
pub const fn high_byte(pair: u16) -> u8 {
    (pair >> 8) as u8
}

/// Bits 7-0 of a register pair.
#[inline]
pub const fn low_byte(pair: u16) -> u8 {
    (pair & 0x00FF) as u8
}

/// Replace the high half of `pair`, keeping the low half bit-exact.
#[inline]
pub const fn with_high(pair: u16, value: u8) -> u16 {
    (pair & 0x00FF) | ((value as u16) << 8)
}

/// Replace the low half of `pair`, keeping the high half bit-exact.
#[inline]
pub const fn with_low(pair: u16, value: u8) -> u16 {
    (pair & 0xFF00) | value as u16
}

/// A named 8-bit register.
///
/// F is deliberately absent: it is only reachable through [`Registers::f`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg8 {
    A,
    B,
    C,
    D,
    E,
    H,
    L,
}

impl Reg8 {
    pub const ALL: [Reg8; 7] = [Reg8::A, Reg8::B, Reg8::C, Reg8::D, Reg8::E, Reg8::H, Reg8::L];

    /// Register selected by a 3-bit operand field (6 is `(HL)` and yields `None`).
    pub fn from_code(code: u8) -> Option<Self> {
        match code & 0x07 {
            0 => Some(Reg8::B),
            1 => Some(Reg8::C),
            2 => Some(Reg8::D),
            3 => Some(Reg8::E),
            4 => Some(Reg8::H),
            5 => Some(Reg8::L),
            7 => Some(Reg8::A),
            _ => None,
        }
    }

    /// Inverse of [`Reg8::from_code`].
    pub fn code(self) -> u8 {
        match self {
            Reg8::B => 0,
            Reg8::C => 1,
            Reg8::D => 2,
            Reg8::E => 3,
            Reg8::H => 4,
            Reg8::L => 5,
            Reg8::A => 7,
        }
    }
}

impl fmt::Display for Reg8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg8::A => "A",
            Reg8::B => "B",
            Reg8::C => "C",
            Reg8::D => "D",
            Reg8::E => "E",
            Reg8::H => "H",
            Reg8::L => "L",
        };
        f.write_str(name)
    }
}

/// A 16-bit register: one of the four pairs, or an index register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Reg16::AF => "AF",
            Reg16::BC => "BC",
            Reg16::DE => "DE",
            Reg16::HL => "HL",
            Reg16::SP => "SP",
            Reg16::PC => "PC",
        };
        f.write_str(name)
    }
}

/// The LR35902 register file.
///
/// Every field is a plain 16-bit word; no combination of values is invalid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    /// A (high) and flags F (low).
    pub af: u16,
    /// B (high) and C (low).
    pub bc: u16,
    /// D (high) and E (low).
    pub de: u16,
    /// H (high) and L (low).
    pub hl: u16,
    /// Program counter: address of the byte being consumed.
    pub pc: u16,
    /// Stack pointer.
    pub sp: u16,
}

impl Registers {
    /// Create a register file with all values zeroed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all registers to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ==================== 8-bit halves ====================

    #[inline]
    pub fn a(&self) -> u8 {
        high_byte(self.af)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af = with_high(self.af, value);
    }

    /// Raw flag byte. Flag semantics are not computed by this core.
    #[inline]
    pub fn f(&self) -> u8 {
        low_byte(self.af)
    }

    #[inline]
    pub fn set_f(&mut self, value: u8) {
        self.af = with_low(self.af, value);
    }

    #[inline]
    pub fn b(&self) -> u8 {
        high_byte(self.bc)
    }

    #[inline]
    pub fn set_b(&mut self, value: u8) {
        self.bc = with_high(self.bc, value);
    }

    #[inline]
    pub fn c(&self) -> u8 {
        low_byte(self.bc)
    }

    #[inline]
    pub fn set_c(&mut self, value: u8) {
        self.bc = with_low(self.bc, value);
    }

    #[inline]
    pub fn d(&self) -> u8 {
        high_byte(self.de)
    }

    #[inline]
    pub fn set_d(&mut self, value: u8) {
        self.de = with_high(self.de, value);
    }

    #[inline]
    pub fn e(&self) -> u8 {
        low_byte(self.de)
    }

    #[inline]
    pub fn set_e(&mut self, value: u8) {
        self.de = with_low(self.de, value);
    }

    #[inline]
    pub fn h(&self) -> u8 {
        high_byte(self.hl)
    }

    #[inline]
    pub fn set_h(&mut self, value: u8) {
        self.hl = with_high(self.hl, value);
    }

    #[inline]
    pub fn l(&self) -> u8 {
        low_byte(self.hl)
    }

    #[inline]
    pub fn set_l(&mut self, value: u8) {
        self.hl = with_low(self.hl, value);
    }

    /// Read a named 8-bit register.
    pub fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a(),
            Reg8::B => self.b(),
            Reg8::C => self.c(),
            Reg8::D => self.d(),
            Reg8::E => self.e(),
            Reg8::H => self.h(),
            Reg8::L => self.l(),
        }
    }

    /// Write a named 8-bit register, leaving its partner half untouched.
    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.set_a(value),
            Reg8::B => self.set_b(value),
            Reg8::C => self.set_c(value),
            Reg8::D => self.set_d(value),
            Reg8::E => self.set_e(value),
            Reg8::H => self.set_h(value),
            Reg8::L => self.set_l(value),
        }
    }

    // ==================== 16-bit registers ====================

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af,
            Reg16::BC => self.bc,
            Reg16::DE => self.de,
            Reg16::HL => self.hl,
            Reg16::SP => self.sp,
            Reg16::PC => self.pc,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.af = value,
            Reg16::BC => self.bc = value,
            Reg16::DE => self.de = value,
            Reg16::HL => self.hl = value,
            Reg16::SP => self.sp = value,
            Reg16::PC => self.pc = value,
        }
    }

    /// Advance the program counter by one, wrapping at 16 bits.
    /// Returns the new value.
    #[inline]
    pub fn advance_pc(&mut self) -> u16 {
        self.pc = self.pc.wrapping_add(1);
        self.pc
    }

    // ==================== (HL) ====================

    /// The byte HL points at.
    pub fn read_hl_indirect(&self, mem: &Memory) -> Result<u8, MemoryError> {
        mem.read(self.hl)
    }

    /// Store a byte at the address HL points at.
    pub fn write_hl_indirect(&self, mem: &mut Memory, value: u8) -> Result<(), MemoryError> {
        mem.write(self.hl, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_high_low_byte() {
        assert_eq!(high_byte(0xFE6C), 0xFE);
        assert_eq!(low_byte(0xFE6C), 0x6C);
    }

    #[test]
    fn test_set_a_keeps_flags() {
        let mut regs = Registers { af: 0xFFCC, ..Registers::new() };
        regs.set_a(0xAA);
        assert_eq!(regs.af, 0xAACC);
    }

    #[test]
    fn test_set_b_and_c() {
        let mut regs = Registers { bc: 0xFFCC, ..Registers::new() };
        regs.set_b(0xAA);
        assert_eq!(regs.bc, 0xAACC);

        let mut regs = Registers { bc: 0xFFCC, ..Registers::new() };
        regs.set_c(0xAA);
        assert_eq!(regs.bc, 0xFFAA);
    }

    #[test]
    fn test_set8_touches_only_its_pair() {
        for reg in Reg8::ALL {
            let mut regs = Registers {
                af: 0x1111,
                bc: 0x2222,
                de: 0x3333,
                hl: 0x4444,
                pc: 0x5555,
                sp: 0x6666,
            };
            let before = regs;
            regs.set8(reg, 0x99);
            assert_eq!(regs.get8(reg), 0x99);
            assert_eq!(regs.pc, before.pc);
            assert_eq!(regs.sp, before.sp);
            assert_eq!(regs.f(), 0x11, "{} clobbered F", reg);
        }
    }

    #[test]
    fn test_reg_codes() {
        for reg in Reg8::ALL {
            assert_eq!(Reg8::from_code(reg.code()), Some(reg));
        }
        assert_eq!(Reg8::from_code(6), None);
    }

    #[test]
    fn test_advance_pc_wraps() {
        let mut regs = Registers { pc: 0xFFFF, ..Registers::new() };
        assert_eq!(regs.advance_pc(), 0x0000);
    }

    #[test]
    fn test_hl_indirect() {
        let mut mem = Memory::from_bytes(vec![0; 0x20]);
        let regs = Registers { hl: 0x0012, ..Registers::new() };
        regs.write_hl_indirect(&mut mem, 0xAB).unwrap();
        assert_eq!(regs.read_hl_indirect(&mem).unwrap(), 0xAB);
        assert_eq!(mem.read(0x0012).unwrap(), 0xAB);
    }

    #[test]
    fn test_reset() {
        let mut regs = Registers { af: 1, bc: 2, de: 3, hl: 4, pc: 5, sp: 6 };
        regs.reset();
        assert_eq!(regs, Registers::new());
    }

    proptest! {
        #[test]
        fn prop_with_high_preserves_low(pair in any::<u16>(), v in any::<u8>()) {
            let out = with_high(pair, v);
            prop_assert_eq!(low_byte(out), low_byte(pair));
            prop_assert_eq!(high_byte(out), v);
        }

        #[test]
        fn prop_with_low_preserves_high(pair in any::<u16>(), v in any::<u8>()) {
            let out = with_low(pair, v);
            prop_assert_eq!(high_byte(out), high_byte(pair));
            prop_assert_eq!(low_byte(out), v);
        }

        #[test]
        fn prop_set8_get8_roundtrip(af in any::<u16>(), bc in any::<u16>(), de in any::<u16>(),
                                    hl in any::<u16>(), idx in 0usize..7, v in any::<u8>()) {
            let reg = Reg8::ALL[idx];
            let mut regs = Registers { af, bc, de, hl, pc: 0, sp: 0 };
            regs.set8(reg, v);
            prop_assert_eq!(regs.get8(reg), v);
        }
    }
}
