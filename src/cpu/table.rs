//! Opcode dispatch table.
//!
//! Built once by [`DispatchTable::new`] and read-only afterwards. The table
//! owns no CPU state, so a single instance can be shared by reference between
//! any number of independent register file / memory pairs.

use crate::cpu::decode::{decode, Instruction};
use crate::cpu::execute::{execute, CpuError};
use crate::cpu::memory::Memory;
use crate::cpu::registers::Registers;

/// Mapping from opcode byte to the instruction it executes.
#[derive(Clone)]
pub struct DispatchTable {
    entries: [Option<Instruction>; 256],
}

impl DispatchTable {
    /// Populate every opcode of the load family.
    pub fn new() -> Self {
        let mut entries = [None; 256];
        for (opcode, entry) in entries.iter_mut().enumerate() {
            *entry = decode(opcode as u8);
        }

        let table = Self { entries };
        log::debug!("dispatch table built with {} opcodes", table.len());
        table
    }

    /// Instruction for `opcode`, if one is populated.
    #[inline]
    pub fn get(&self, opcode: u8) -> Option<Instruction> {
        self.entries[opcode as usize]
    }

    /// Like [`get`](Self::get), but an absent opcode is an error.
    pub fn lookup(&self, opcode: u8) -> Result<Instruction, CpuError> {
        self.get(opcode).ok_or(CpuError::UnimplementedOpcode(opcode))
    }

    pub fn is_implemented(&self, opcode: u8) -> bool {
        self.entries[opcode as usize].is_some()
    }

    /// Number of populated opcodes.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Populated entries in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Instruction)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(op, entry)| entry.map(|instr| (op as u8, instr)))
    }

    /// Run the handler for `opcode`.
    ///
    /// The caller is responsible for having fetched `opcode` from memory at
    /// PC; the handler is chosen purely by the value passed in.
    pub fn dispatch(
        &self,
        opcode: u8,
        regs: &mut Registers,
        mem: &mut Memory,
    ) -> Result<(), CpuError> {
        let instr = match self.lookup(opcode) {
            Ok(instr) => instr,
            Err(e) => {
                log::warn!("PC={:#06x}: {}", regs.pc, e);
                return Err(e);
            }
        };

        log::trace!("PC={:#06x}: {:02X} {}", regs.pc, opcode, instr);
        execute(instr, regs, mem)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("implemented", &self.len())
            .finish()
    }
}
