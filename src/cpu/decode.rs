//! Instruction decoder for the LR35902 load family.
//!
//! Each opcode byte maps to at most one [`Instruction`]. The variants follow
//! the addressing modes of the load group rather than individual opcodes, so
//! the interpreter in [`crate::cpu::execute`] is a single exhaustive `match`.

use crate::cpu::registers::{Reg16, Reg8};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pointer adjustment applied after an `(HL+)` / `(HL-)` access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Inc,
    Dec,
}

impl Step {
    /// Apply the step to a pointer, wrapping at 16 bits.
    #[inline]
    pub fn apply(self, ptr: u16) -> u16 {
        match self {
            Step::Inc => ptr.wrapping_add(1),
            Step::Dec => ptr.wrapping_sub(1),
        }
    }

    fn suffix(self) -> char {
        match self {
            Step::Inc => '+',
            Step::Dec => '-',
        }
    }
}

/// Source of the offset into the high page (0xFF00-0xFFFF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighOffset {
    /// One immediate operand byte.
    Imm,
    /// Low byte of a register pair (C for BC).
    LowOf(Reg16),
}

/// Decoded load instruction.
///
/// Operand bytes (`d8`, `d16`, `a8`, `a16`, `r8`) are not stored here; they
/// are fetched from the instruction stream at execution time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ==================== 8-bit ====================

    /// `LD r,r'`
    LdRegReg { dst: Reg8, src: Reg8 },

    /// `LD r,d8`
    LdRegImm { dst: Reg8 },

    /// `LD (rr),d8`
    LdIndImm { ptr: Reg16 },

    /// `LD r,(rr)`
    LdRegInd { dst: Reg8, ptr: Reg16 },

    /// `LD (rr),r`
    LdIndReg { ptr: Reg16, src: Reg8 },

    /// `LD r,(rr+)` / `LD r,(rr-)`
    LdRegIndStep { dst: Reg8, ptr: Reg16, step: Step },

    /// `LD (rr+),r` / `LD (rr-),r`
    LdIndStepReg { ptr: Reg16, step: Step, src: Reg8 },

    /// `LDH r,(a8)` / `LD r,(C)`
    LdRegHigh { dst: Reg8, offset: HighOffset },

    /// `LDH (a8),r` / `LD (C),r`
    LdHighReg { offset: HighOffset, src: Reg8 },

    /// `LD r,(a16)`
    LdRegAbs { dst: Reg8 },

    /// `LD (a16),r`
    LdAbsReg { src: Reg8 },

    // ==================== 16-bit ====================

    /// `LD (a16),rr`, stored little-endian
    LdAbsPair { src: Reg16 },

    /// `LD rr,d16`
    LdPairImm { dst: Reg16 },

    /// `LD rr,rr'`
    LdPairPair { dst: Reg16, src: Reg16 },

    /// `LD rr,rr'+r8`
    LdPairOffset { dst: Reg16, base: Reg16 },
}

impl Instruction {
    /// Encoded length in bytes, opcode included.
    pub fn size_bytes(&self) -> u8 {
        match self {
            Instruction::LdRegReg { .. }
            | Instruction::LdRegInd { .. }
            | Instruction::LdIndReg { .. }
            | Instruction::LdRegIndStep { .. }
            | Instruction::LdIndStepReg { .. }
            | Instruction::LdPairPair { .. } => 1,

            Instruction::LdRegImm { .. }
            | Instruction::LdIndImm { .. }
            | Instruction::LdPairOffset { .. } => 2,

            Instruction::LdRegHigh { offset, .. } | Instruction::LdHighReg { offset, .. } => {
                match offset {
                    HighOffset::Imm => 2,
                    HighOffset::LowOf(_) => 1,
                }
            }

            Instruction::LdRegAbs { .. }
            | Instruction::LdAbsReg { .. }
            | Instruction::LdAbsPair { .. }
            | Instruction::LdPairImm { .. } => 3,
        }
    }

    /// Number of operand bytes following the opcode.
    pub fn operand_bytes(&self) -> u8 {
        self.size_bytes() - 1
    }
}

/// 16-bit pair selected by bits 5-4 of the `LD rr,d16` opcodes.
fn pair_from_code(code: u8) -> Reg16 {
    match code & 0x03 {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        _ => Reg16::SP,
    }
}

/// Decode one opcode byte.
///
/// Returns `None` for every opcode outside the load family (including
/// 0x76, which sits inside the `LD r,r'` block but is HALT).
pub fn decode(opcode: u8) -> Option<Instruction> {
    use Instruction::*;

    let instr = match opcode {
        0x76 => return None,

        0x40..=0x7F => {
            let dst = Reg8::from_code(opcode >> 3);
            let src = Reg8::from_code(opcode);
            match (dst, src) {
                (Some(dst), Some(src)) => LdRegReg { dst, src },
                (Some(dst), None) => LdRegInd { dst, ptr: Reg16::HL },
                (None, Some(src)) => LdIndReg { ptr: Reg16::HL, src },
                (None, None) => return None,
            }
        }

        0x06 | 0x0E | 0x16 | 0x1E | 0x26 | 0x2E | 0x36 | 0x3E => {
            match Reg8::from_code(opcode >> 3) {
                Some(dst) => LdRegImm { dst },
                None => LdIndImm { ptr: Reg16::HL },
            }
        }

        0x01 | 0x11 | 0x21 | 0x31 => LdPairImm { dst: pair_from_code(opcode >> 4) },

        0x02 => LdIndReg { ptr: Reg16::BC, src: Reg8::A },
        0x12 => LdIndReg { ptr: Reg16::DE, src: Reg8::A },
        0x0A => LdRegInd { dst: Reg8::A, ptr: Reg16::BC },
        0x1A => LdRegInd { dst: Reg8::A, ptr: Reg16::DE },

        0x22 => LdIndStepReg { ptr: Reg16::HL, step: Step::Inc, src: Reg8::A },
        0x32 => LdIndStepReg { ptr: Reg16::HL, step: Step::Dec, src: Reg8::A },
        0x2A => LdRegIndStep { dst: Reg8::A, ptr: Reg16::HL, step: Step::Inc },
        0x3A => LdRegIndStep { dst: Reg8::A, ptr: Reg16::HL, step: Step::Dec },

        0xE0 => LdHighReg { offset: HighOffset::Imm, src: Reg8::A },
        0xF0 => LdRegHigh { dst: Reg8::A, offset: HighOffset::Imm },
        0xE2 => LdHighReg { offset: HighOffset::LowOf(Reg16::BC), src: Reg8::A },
        0xF2 => LdRegHigh { dst: Reg8::A, offset: HighOffset::LowOf(Reg16::BC) },

        0xEA => LdAbsReg { src: Reg8::A },
        0xFA => LdRegAbs { dst: Reg8::A },
        0x08 => LdAbsPair { src: Reg16::SP },

        0xF9 => LdPairPair { dst: Reg16::SP, src: Reg16::HL },
        0xF8 => LdPairOffset { dst: Reg16::HL, base: Reg16::SP },

        _ => return None,
    };

    Some(instr)
}

/// Opcode byte for an instruction, if the hardware has one.
///
/// Variants are more general than the opcode map (e.g. `LD (HL+),H` has a
/// representation but no encoding); those return `None`.
pub fn encode(instr: &Instruction) -> Option<u8> {
    (0..=u8::MAX).find(|&op| decode(op).as_ref() == Some(instr))
}

/// Low half of a pair, as it is written in assembly.
fn low_name(pair: Reg16) -> String {
    match pair {
        Reg16::AF => "F".to_string(),
        Reg16::BC => Reg8::C.to_string(),
        Reg16::DE => Reg8::E.to_string(),
        Reg16::HL => Reg8::L.to_string(),
        other => format!("{}.lo", other),
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::LdRegReg { dst, src } => write!(f, "LD {},{}", dst, src),
            Instruction::LdRegImm { dst } => write!(f, "LD {},d8", dst),
            Instruction::LdIndImm { ptr } => write!(f, "LD ({}),d8", ptr),
            Instruction::LdRegInd { dst, ptr } => write!(f, "LD {},({})", dst, ptr),
            Instruction::LdIndReg { ptr, src } => write!(f, "LD ({}),{}", ptr, src),
            Instruction::LdRegIndStep { dst, ptr, step } => {
                write!(f, "LD {},({}{})", dst, ptr, step.suffix())
            }
            Instruction::LdIndStepReg { ptr, step, src } => {
                write!(f, "LD ({}{}),{}", ptr, step.suffix(), src)
            }
            Instruction::LdRegHigh { dst, offset: HighOffset::Imm } => write!(f, "LDH {},(a8)", dst),
            Instruction::LdRegHigh { dst, offset: HighOffset::LowOf(pair) } => {
                write!(f, "LD {},({})", dst, low_name(*pair))
            }
            Instruction::LdHighReg { offset: HighOffset::Imm, src } => write!(f, "LDH (a8),{}", src),
            Instruction::LdHighReg { offset: HighOffset::LowOf(pair), src } => {
                write!(f, "LD ({}),{}", low_name(*pair), src)
            }
            Instruction::LdRegAbs { dst } => write!(f, "LD {},(a16)", dst),
            Instruction::LdAbsReg { src } => write!(f, "LD (a16),{}", src),
            Instruction::LdAbsPair { src } => write!(f, "LD (a16),{}", src),
            Instruction::LdPairImm { dst } => write!(f, "LD {},d16", dst),
            Instruction::LdPairPair { dst, src } => write!(f, "LD {},{}", dst, src),
            Instruction::LdPairOffset { dst, base } => write!(f, "LD {},{}+r8", dst, base),
        }
    }
}
