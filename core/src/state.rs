use std::fmt::Write;

use log::debug;

use crate::constants::{
    DISPLAY_HEIGHT, DISPLAY_WIDTH, MEMORY_SIZE, PROGRAM_START, SPRITE_SHEET, SPRITE_SHEET_START,
    STACK_SIZE,
};
use crate::error::{Chip8Error, Result};

/// The FrameBuffer is row-major and indexed as `y * DISPLAY_WIDTH + x`
pub type FrameBuffer = [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT];

/// Index of the pixel at `(x, y)` within a FrameBuffer.
pub fn pixel_index(x: usize, y: usize) -> usize {
    y * DISPLAY_WIDTH + x
}

/// The Chip8 internal state
///
/// ## CPU
/// Registers
/// - (v) 16 primary 8-bit registers (V0..VF)
///     - the first 15 (V0..VE) are general purpose registers
///     - the 16th (VF) is the carry, borrow and collision flag
/// - (i) a 16-bit memory address register
///
/// Counter
/// - (pc) a 16-bit program counter
///
/// Pointer
/// - (sp) an 8-bit stack pointer, always within `0..STACK_SIZE`
///
/// Timers
/// - 2 8-bit timers (delay & sound) that count down to 0 once per frame
///
/// ## Memory
/// - 16 slot stack of return addresses
/// - 4096 bytes of addressable memory, with the sprite sheet at 0x000
/// - 64x32 frame buffer
///
/// ## Flags
/// - (running) cleared when the program halts or faults
/// - (needs_repaint) set whenever the frame buffer changes, cleared by whoever draws it
#[derive(Clone)]
pub struct State {
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub delay_timer: u8,
    pub sound_timer: u8,
    pub stack: [u16; STACK_SIZE],
    pub memory: [u8; MEMORY_SIZE],
    pub frame_buffer: FrameBuffer,
    pub needs_repaint: bool,
    pub running: bool,
}

impl State {
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[SPRITE_SHEET_START..SPRITE_SHEET_START + SPRITE_SHEET.len()]
            .copy_from_slice(&SPRITE_SHEET);
        debug!(
            "sprite sheet loaded to {:#05X} ({} bytes), pc = {:#05X}",
            SPRITE_SHEET_START,
            SPRITE_SHEET.len(),
            PROGRAM_START
        );

        State {
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            sp: 0,
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            memory,
            frame_buffer: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            needs_repaint: false,
            running: true,
        }
    }

    /// Borrows `len` bytes of memory starting at `address`.
    pub fn read(&self, address: usize, len: usize) -> Result<&[u8]> {
        let end = Self::checked_end(address, len)?;
        Ok(&self.memory[address..end])
    }

    /// Copies `bytes` into memory starting at `address`.
    /// Nothing is written unless every byte fits.
    pub fn write(&mut self, address: usize, bytes: &[u8]) -> Result<()> {
        let end = Self::checked_end(address, bytes.len())?;
        self.memory[address..end].copy_from_slice(bytes);
        Ok(())
    }

    fn checked_end(address: usize, len: usize) -> Result<usize> {
        match address.checked_add(len) {
            Some(end) if end <= MEMORY_SIZE => Ok(end),
            _ => Err(Chip8Error::MemoryOutOfBounds {
                address: address.max(MEMORY_SIZE),
            }),
        }
    }

    /// STACK.push(addr)
    /// The pointer is bumped before writing, so slot 0 is never used.
    pub fn push(&mut self, address: u16) -> Result<()> {
        if usize::from(self.sp) + 1 >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow { pc: self.pc });
        }
        self.sp += 1;
        self.stack[usize::from(self.sp)] = address;
        Ok(())
    }

    /// STACK.pop()
    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow { pc: self.pc });
        }
        let address = self.stack[usize::from(self.sp)];
        self.sp -= 1;
        Ok(address)
    }

    /// Hex dump of memory, 16 bytes per line.
    pub fn memory_dump(&self) -> String {
        let mut dump = String::with_capacity(MEMORY_SIZE * 3 + MEMORY_SIZE / 16 * 8);
        for (line, chunk) in self.memory.chunks(16).enumerate() {
            let _ = write!(dump, "{:#05x}:", line * 16);
            for byte in chunk {
                let _ = write!(dump, " {:02x}", byte);
            }
            dump.push('\n');
        }
        dump
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}
