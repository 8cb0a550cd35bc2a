pub use chip8::{Chip8, Step};
pub use error::{Chip8Error, Result};
pub use instruction::Instruction;
pub use keypad::Keypad;
pub use state::{FrameBuffer, State};

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod keypad;
mod opcode;
mod operations;
pub mod rom;
pub mod state;
