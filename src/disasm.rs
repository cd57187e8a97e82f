//! Disassembler for LR35902 load instructions.
//!
//! Converts raw bytes back to readable assembly using the same decoder the
//! dispatch table is built from. Opcodes outside the load family are shown
//! as `DB` data bytes.

use crate::cpu::decode::{decode, Instruction};

/// One decoded line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisasmLine {
    /// Address of the first byte.
    pub addr: u16,
    /// Raw bytes, opcode first.
    pub bytes: Vec<u8>,
    /// Assembly text with operands filled in.
    pub text: String,
}

/// Disassemble the instruction at the start of `bytes`.
///
/// `bytes` must not be empty.
pub fn disassemble_one(bytes: &[u8], addr: u16) -> DisasmLine {
    let opcode = bytes[0];
    let data_byte = || DisasmLine {
        addr,
        bytes: vec![opcode],
        text: format!("DB ${:02X}", opcode),
    };

    let Some(instr) = decode(opcode) else {
        return data_byte();
    };

    let size = instr.size_bytes() as usize;
    if bytes.len() < size {
        return data_byte();
    }

    DisasmLine {
        addr,
        bytes: bytes[..size].to_vec(),
        text: format_instruction(&instr, &bytes[1..size]),
    }
}

/// Disassemble a whole image loaded at `origin`.
pub fn disassemble(bytes: &[u8], origin: u16) -> String {
    let mut output = String::new();
    output.push_str("; LR35902 Disassembly\n");
    output.push_str("; -------------------\n\n");

    let mut offset = 0;
    while offset < bytes.len() {
        let addr = origin.wrapping_add(offset as u16);
        let line = disassemble_one(&bytes[offset..], addr);
        let raw: Vec<String> = line.bytes.iter().map(|b| format!("{:02X}", b)).collect();
        output.push_str(&format!("{:04X}: {:<8}  {}\n", line.addr, raw.join(" "), line.text));
        offset += line.bytes.len();
    }

    output
}

/// Substitute operand bytes into the mnemonic.
///
/// Two-byte operands are assembled high byte first, the order the CPU
/// fetches them in.
fn format_instruction(instr: &Instruction, operands: &[u8]) -> String {
    let text = instr.to_string();
    match *operands {
        [hi, lo] => {
            let value = format!("${:04X}", u16::from_be_bytes([hi, lo]));
            text.replace("d16", &value).replace("a16", &value)
        }
        [byte] => {
            if text.contains("+r8") {
                let offset = byte as i8;
                let sign = if offset < 0 { '-' } else { '+' };
                text.replace("+r8", &format!("{}${:02X}", sign, offset.unsigned_abs()))
            } else {
                text.replace("d8", &format!("${:02X}", byte))
                    .replace("(a8)", &format!("(${:04X})", 0xFF00 | byte as u16))
            }
        }
        _ => text,
    }
}
