/// Total addressable memory in bytes.
pub const MEMORY_SIZE: usize = 4096;

/// Where the sprite sheet is written on initialization.
pub const SPRITE_SHEET_START: usize = 0x000;

/// Where ROMs are loaded and where the program counter starts.
pub const PROGRAM_START: u16 = 0x200;

/// The largest ROM that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Sprites are always a single byte wide.
pub const SPRITE_WIDTH: usize = 8;

/// Number of return addresses the call stack can hold.
/// Slot 0 is never written, so 15 calls may be nested.
pub const STACK_SIZE: usize = 16;

/// Number of instructions executed per timer tick.
pub const STEPS_PER_CYCLE: usize = 10;

/// Timers are decremented once per frame.
pub const FRAMES_PER_SECOND: u32 = 60;

/// Bytes per hexadecimal digit sprite.
pub const SPRITE_HEIGHT: u16 = 5;

/// # Sprite Sheet
/// Sprites for the hexadecimal digits 0..F, 5 bytes each.
///
/// Each byte is one row of the sprite; only the high nibble is drawn.
/// ```text
/// 0xF0  ####
/// 0x90  #  #
/// 0x90  #  #
/// 0x90  #  #
/// 0xF0  ####
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
