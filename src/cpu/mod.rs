//! CPU core for the Sharp LR35902.
//!
//! This module implements the data-movement half of the instruction set:
//! - the register file (AF, BC, DE, HL pairs plus PC and SP)
//! - a flat 16-bit addressed memory
//! - the load-family decoder, interpreter and opcode dispatch table

pub mod memory;
pub mod registers;
pub mod decode;
pub mod execute;
pub mod table;

pub use memory::{Memory, MemoryError, MEMORY_SIZE};
pub use registers::{Reg16, Reg8, Registers};
pub use decode::{decode, encode, HighOffset, Instruction, Step};
pub use execute::{execute, CpuError};
pub use table::DispatchTable;
