//! LR35902 Core - CLI Entry Point
//!
//! Commands:
//! - `lr35902-emu table` - List every implemented opcode
//! - `lr35902-emu disasm <image>` - Disassemble a raw memory image
//! - `lr35902-emu exec <opcode>` - Dispatch one opcode and show the result
//! - `lr35902-emu dump <state>` - Show a register snapshot

use clap::{Parser, Subcommand};
use lr35902::{DispatchTable, Memory, Registers};

#[derive(Parser)]
#[command(name = "lr35902-emu")]
#[command(author = "Yigit")]
#[command(version = "0.1.0")]
#[command(about = "Register file, memory and load-instruction dispatch for the Sharp LR35902")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every opcode in the dispatch table
    Table,
    /// Disassemble a raw memory image
    Disasm {
        /// Path to the binary image
        image: String,
        /// Address the image is loaded at
        #[arg(short, long, default_value = "0", value_parser = parse_word)]
        origin: u16,
    },
    /// Dispatch a single opcode against a register snapshot and memory image
    Exec {
        /// Opcode to dispatch, e.g. 0x7E
        #[arg(value_parser = parse_byte)]
        opcode: u8,
        /// Raw memory image loaded at address 0
        #[arg(short, long)]
        image: Option<String>,
        /// JSON register snapshot (all registers zero if omitted)
        #[arg(short, long)]
        state: Option<String>,
        /// Size memory to the image instead of the full 64 KiB
        #[arg(long)]
        exact: bool,
        /// Print the resulting registers as JSON
        #[arg(long)]
        json: bool,
        /// Write the resulting registers to this file
        #[arg(long)]
        save: Option<String>,
    },
    /// Print a register snapshot
    Dump {
        /// JSON register snapshot
        state: String,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Table) => {
            print_table();
        }
        Some(Commands::Disasm { image, origin }) => {
            disassemble_file(&image, origin);
        }
        Some(Commands::Exec { opcode, image, state, exact, json, save }) => {
            exec_opcode(opcode, image.as_deref(), state.as_deref(), exact, json, save.as_deref());
        }
        Some(Commands::Dump { state }) => {
            let regs = load_state_or_exit(&state);
            print!("{}", lr35902::register_dump(&regs));
        }
        None => {
            println!("LR35902 Core v0.1.0");
            println!("Load-instruction dispatch for the Sharp LR35902");
            println!();
            println!("Use --help for available commands");
        }
    }
}

fn parse_byte(text: &str) -> Result<u8, String> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid opcode '{}': {}", text, e))
}

fn parse_word(text: &str) -> Result<u16, String> {
    let digits = text.trim_start_matches("0x").trim_start_matches("0X");
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid address '{}': {}", text, e))
}

fn read_image_or_exit(path: &str) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("❌ Failed to read image: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_state_or_exit(path: &str) -> Registers {
    match lr35902::load_registers(path) {
        Ok(regs) => regs,
        Err(e) => {
            eprintln!("❌ Failed to load state: {}", e);
            std::process::exit(1);
        }
    }
}

fn print_table() {
    let table = DispatchTable::new();

    for (opcode, instr) in table.iter() {
        println!("0x{:02X}  {:<14} {} byte(s)", opcode, instr.to_string(), instr.size_bytes());
    }

    println!();
    println!("{} opcodes implemented", table.len());
}

fn disassemble_file(path: &str, origin: u16) {
    let bytes = read_image_or_exit(path);
    println!("{}", lr35902::disassemble(&bytes, origin));
}

fn exec_opcode(
    opcode: u8,
    image: Option<&str>,
    state: Option<&str>,
    exact: bool,
    json: bool,
    save: Option<&str>,
) {
    let bytes = image.map(read_image_or_exit).unwrap_or_default();
    let mut mem = if exact {
        Memory::from_bytes(bytes)
    } else {
        let mut mem = Memory::new();
        if let Err(e) = mem.load(0, &bytes) {
            eprintln!("❌ Failed to load image: {}", e);
            std::process::exit(1);
        }
        mem
    };

    let mut regs = state.map(load_state_or_exit).unwrap_or_default();

    let table = DispatchTable::new();
    if let Err(e) = table.dispatch(opcode, &mut regs, &mut mem) {
        eprintln!("❌ CPU error at PC={:#06x}: {}", regs.pc, e);
        std::process::exit(1);
    }

    if json {
        match lr35902::state::registers_to_json(&regs) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", lr35902::register_dump(&regs));
    }

    if let Some(path) = save {
        if let Err(e) = lr35902::save_registers(path, &regs) {
            eprintln!("❌ Failed to save state: {}", e);
            std::process::exit(1);
        }
    }
}
