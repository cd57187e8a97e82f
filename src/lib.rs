//! # LR35902 Core
//!
//! Register file, memory and load-instruction dispatch for the Sharp
//! LR35902, the 8-bit CPU of the original Game Boy.
//!
//! The crate does not drive the CPU. A host owns a [`Registers`] and a
//! [`Memory`], fetches an opcode, and hands it to a [`DispatchTable`]:
//!
//! ```
//! use lr35902::{DispatchTable, Memory, Registers};
//!
//! let table = DispatchTable::new();
//! let mut regs = Registers { af: 0xFFCC, bc: 0xAB12, ..Registers::new() };
//! let mut mem = Memory::new();
//!
//! table.dispatch(0x78, &mut regs, &mut mem).unwrap(); // LD A,B
//! assert_eq!(regs.af, 0xABCC);
//! ```

pub mod cpu;
pub mod disasm;
pub mod state;

// Re-export commonly used types
pub use cpu::{CpuError, DispatchTable, Instruction, Memory, MemoryError, Reg16, Reg8, Registers};
pub use disasm::{disassemble, disassemble_one};
pub use state::{load_registers, register_dump, save_registers, StateError};
