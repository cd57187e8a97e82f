//! Register snapshots for hosts.
//!
//! Register state is stored as a small JSON object with one field per
//! 16-bit register:
//!
//! ```json
//! { "af": 7199, "bc": 1, "de": 53199, "hl": 4660, "pc": 65281, "sp": 52242 }
//! ```

use crate::cpu::Registers;
use std::path::Path;
use thiserror::Error;

/// Parse a register snapshot from JSON text.
pub fn registers_from_json(text: &str) -> Result<Registers, StateError> {
    serde_json::from_str(text).map_err(|e| StateError::ParseError(e.to_string()))
}

/// Serialize a register snapshot as pretty-printed JSON.
pub fn registers_to_json(regs: &Registers) -> Result<String, StateError> {
    serde_json::to_string_pretty(regs).map_err(|e| StateError::ParseError(e.to_string()))
}

/// Load a register snapshot from disk.
pub fn load_registers<P: AsRef<Path>>(path: P) -> Result<Registers, StateError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| StateError::IoError(e.to_string()))?;
    registers_from_json(&text)
}

/// Save a register snapshot to disk.
pub fn save_registers<P: AsRef<Path>>(path: P, regs: &Registers) -> Result<(), StateError> {
    let text = registers_to_json(regs)?;
    std::fs::write(path.as_ref(), text + "\n").map_err(|e| StateError::IoError(e.to_string()))
}

/// Textual dump of every register: hex then binary, one line per register.
pub fn register_dump(regs: &Registers) -> String {
    let rows = [
        ("AF", regs.af),
        ("BC", regs.bc),
        ("DE", regs.de),
        ("HL", regs.hl),
        ("PC", regs.pc),
        ("SP", regs.sp),
    ];

    rows.iter()
        .map(|(name, value)| format!("{}: {:04x} {:016b}\n", name, value, value))
        .collect()
}

/// Errors that can occur while reading or writing snapshots.
#[derive(Debug, Clone, Error)]
pub enum StateError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("invalid register snapshot: {0}")]
    ParseError(String),
}
