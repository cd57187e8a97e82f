//! Flat byte-addressable memory.
//!
//! The LR35902 sees a 16-bit address space (0x0000-0xFFFF). The backing
//! store may be shorter than that, e.g. a small fixture in a test; any
//! access past its end is reported as a fault rather than wrapped.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of the full LR35902 address space.
pub const MEMORY_SIZE: usize = 0x1_0000;

/// Linear memory: one byte per address.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    cells: Vec<u8>,
}

impl Memory {
    /// Create a full 64 KiB memory with all cells zeroed.
    pub fn new() -> Self {
        Self {
            cells: vec![0; MEMORY_SIZE],
        }
    }

    /// Wrap a caller-supplied byte sequence as-is.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { cells: bytes }
    }

    /// Number of backed addresses.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read the byte at `addr`.
    #[inline]
    pub fn read(&self, addr: u16) -> Result<u8, MemoryError> {
        self.cells
            .get(addr as usize)
            .copied()
            .ok_or(MemoryError::AddressOutOfRange { addr, len: self.cells.len() })
    }

    /// Store `value` at `addr`.
    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) -> Result<(), MemoryError> {
        let len = self.cells.len();
        let cell = self
            .cells
            .get_mut(addr as usize)
            .ok_or(MemoryError::AddressOutOfRange { addr, len })?;
        *cell = value;
        Ok(())
    }

    /// Read a little-endian word: low byte at `addr`, high byte at `addr + 1`.
    ///
    /// This is the in-memory layout of 16-bit data and is unrelated to how
    /// two-byte instruction operands are assembled.
    pub fn read_word(&self, addr: u16) -> Result<u16, MemoryError> {
        let lo = self.read(addr)?;
        let hi = self.read(addr.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Store a little-endian word. Both cells are checked before either is written.
    pub fn write_word(&mut self, addr: u16, value: u16) -> Result<(), MemoryError> {
        let next = addr.wrapping_add(1);
        self.read(addr)?;
        self.read(next)?;
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo)?;
        self.write(next, hi)
    }

    /// Copy `bytes` into memory starting at `start`.
    pub fn load(&mut self, start: u16, bytes: &[u8]) -> Result<(), MemoryError> {
        let start = start as usize;
        if start + bytes.len() > self.cells.len() {
            return Err(MemoryError::ImageTooLarge {
                size: bytes.len(),
                available: self.cells.len().saturating_sub(start),
            });
        }
        self.cells[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Dump memory contents (for debugging). Stops at the end of the store.
    pub fn dump(&self, start: u16, count: usize) -> Vec<(u16, u8)> {
        let start = start as usize;
        let end = (start + count).min(self.cells.len());
        (start..end).map(|i| (i as u16, self.cells[i])).collect()
    }

    /// The raw backing bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let non_zero = self.cells.iter().filter(|&&b| b != 0).count();

        f.debug_struct("Memory")
            .field("non_zero_cells", &non_zero)
            .field("total_cells", &self.cells.len())
            .finish()
    }
}

/// Errors that can occur during memory operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemoryError {
    #[error("memory address {addr:#06x} out of range (backing store is {len} bytes)")]
    AddressOutOfRange { addr: u16, len: usize },

    #[error("image size {size} exceeds available space {available}")]
    ImageTooLarge { size: usize, available: usize },
}
