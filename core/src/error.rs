use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop the interpreter.
///
/// Engine errors (opcode, stack and memory faults) halt the machine before they
/// are returned. Load errors are raised before the machine ever runs.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("unrecognized opcode {opcode:#06X} at {pc:#05X}")]
    UnrecognizedOpcode { opcode: u16, pc: u16 },

    #[error("stack overflow calling from {pc:#05X}")]
    StackOverflow { pc: u16 },

    #[error("stack underflow returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },

    #[error("memory access out of bounds at {address:#06X}")]
    MemoryOutOfBounds { address: usize },

    #[error("ROM is {size} bytes but at most {max} bytes fit in memory")]
    RomTooLarge { size: usize, max: usize },

    #[error("ROM file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("unable to read ROM")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
