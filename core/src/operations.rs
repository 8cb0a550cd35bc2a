use log::{debug, warn};
use rand::Rng;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH, SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::error::Result;
use crate::keypad::Keypad;
use crate::state::{pixel_index, State};

/// How the program counter moves once an operation has run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// pc += 2
    Next,
    /// pc += 4
    Skip,
    /// pc = addr
    Jump(u16),
    /// pc is left alone so the same instruction runs again
    Wait,
}

impl Flow {
    pub fn advance(self, pc: u16) -> u16 {
        match self {
            Flow::Next => pc.wrapping_add(0x2),
            Flow::Skip => pc.wrapping_add(0x4),
            Flow::Jump(addr) => addr,
            Flow::Wait => pc,
        }
    }

    fn skip_if(condition: bool) -> Self {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

/// clear
pub fn clr(state: &mut State) -> Flow {
    state.frame_buffer = [false; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    state.needs_repaint = true;
    Flow::Next
}

/// PC = STACK.pop() + 2
pub fn rts(state: &mut State) -> Result<Flow> {
    let ret = state.pop()?;
    Ok(Flow::Jump(ret.wrapping_add(0x2)))
}

/// Machine code routines aren't supported; the program stops here.
pub fn sys(state: &mut State, addr: u16) -> Flow {
    warn!(
        "SYS {:#05X} at {:#05X} calls machine code, halting",
        addr, state.pc
    );
    state.running = false;
    Flow::Next
}

/// PC = addr
pub fn jump(addr: u16) -> Flow {
    Flow::Jump(addr)
}

/// STACK.push(PC); PC = addr
pub fn call(state: &mut State, addr: u16) -> Result<Flow> {
    state.push(state.pc)?;
    Ok(Flow::Jump(addr))
}

/// if Vx == kk then pc += 2
pub fn ske(state: &State, x: usize, kk: u8) -> Flow {
    Flow::skip_if(state.v[x] == kk)
}

/// if Vx != kk then pc += 2
pub fn skne(state: &State, x: usize, kk: u8) -> Flow {
    Flow::skip_if(state.v[x] != kk)
}

/// if Vx == Vy then pc += 2
pub fn skre(state: &State, x: usize, y: usize) -> Flow {
    Flow::skip_if(state.v[x] == state.v[y])
}

/// Vx = kk
pub fn load(state: &mut State, x: usize, kk: u8) -> Flow {
    state.v[x] = kk;
    Flow::Next
}

/// Vx += kk
/// Overflow is dropped and VF is left alone
pub fn add(state: &mut State, x: usize, kk: u8) -> Flow {
    state.v[x] = state.v[x].wrapping_add(kk);
    Flow::Next
}

/// Vx = Vy
pub fn mv(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] = state.v[y];
    Flow::Next
}

/// Vx |= Vy
pub fn or(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] |= state.v[y];
    Flow::Next
}

/// Vx &= Vy
pub fn and(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] &= state.v[y];
    Flow::Next
}

/// Vx ^= Vy
pub fn xor(state: &mut State, x: usize, y: usize) -> Flow {
    state.v[x] ^= state.v[y];
    Flow::Next
}

// The arithmetic below reads both operands up front and writes VF before Vx,
// so `x == 0xF` ends up holding the result rather than the flag.

/// Vx += Vy; VF = overflow
pub fn addr(state: &mut State, x: usize, y: usize) -> Flow {
    let (res, over) = state.v[x].overflowing_add(state.v[y]);
    state.v[0xF] = u8::from(over);
    state.v[x] = res;
    Flow::Next
}

/// Vx -= Vy; VF = Vx > Vy
pub fn sub(state: &mut State, x: usize, y: usize) -> Flow {
    let (vx, vy) = (state.v[x], state.v[y]);
    state.v[0xF] = u8::from(vx > vy);
    state.v[x] = vx.wrapping_sub(vy);
    Flow::Next
}

/// Vx = Vy >> 1; VF = Vy & 1
pub fn shr(state: &mut State, x: usize, y: usize) -> Flow {
    let vy = state.v[y];
    state.v[0xF] = vy & 0x1;
    state.v[x] = vy >> 1;
    Flow::Next
}

/// Vx = Vy - Vx; VF = Vy > Vx
pub fn subn(state: &mut State, x: usize, y: usize) -> Flow {
    let (vx, vy) = (state.v[x], state.v[y]);
    state.v[0xF] = u8::from(vy > vx);
    state.v[x] = vy.wrapping_sub(vx);
    Flow::Next
}

/// Vx = Vy << 1; VF = Vy & 1
pub fn shl(state: &mut State, x: usize, y: usize) -> Flow {
    let vy = state.v[y];
    state.v[0xF] = vy & 0x1;
    state.v[x] = vy << 1;
    Flow::Next
}

/// if Vx != Vy then pc += 2
pub fn skrne(state: &State, x: usize, y: usize) -> Flow {
    Flow::skip_if(state.v[x] != state.v[y])
}

/// I = addr
pub fn loadi(state: &mut State, addr: u16) -> Flow {
    state.i = addr;
    Flow::Next
}

/// PC = V0 + addr
pub fn jumpi(state: &State, addr: u16) -> Flow {
    Flow::Jump(u16::from(state.v[0x0]) + addr)
}

/// Vx = rand_byte & kk
pub fn rnd<R: Rng + ?Sized>(state: &mut State, rng: &mut R, x: usize, kk: u8) -> Flow {
    let rand_byte: u8 = rng.gen();
    state.v[x] = rand_byte & kk;
    Flow::Next
}

/// draw_sprite(x=Vx y=Vy size=n)
/// XORs a sprite from memory i..i+n at position x, y on the FrameBuffer with wrapping.
/// Sets VF if any pixels are erased
pub fn draw(state: &mut State, x: usize, y: usize, n: u8) -> Result<Flow> {
    let rows = usize::from(n);
    let mut sprite = [0u8; 0xF];
    // A zero row sprite touches no memory, so I isn't checked
    if rows > 0 {
        sprite[..rows].copy_from_slice(state.read(usize::from(state.i), rows)?);
    }

    // Both coordinates are read before VF is cleared in case either names VF
    let origin_x = usize::from(state.v[x]);
    let origin_y = usize::from(state.v[y]);
    state.v[0xF] = 0x0;

    for (row, &byte) in sprite[..rows].iter().enumerate() {
        let py = (origin_y + row) % DISPLAY_HEIGHT;
        for col in 0..SPRITE_WIDTH {
            if (byte >> (SPRITE_WIDTH - 1 - col)) & 0x1 == 0 {
                continue;
            }
            let px = (origin_x + col) % DISPLAY_WIDTH;
            let pixel = &mut state.frame_buffer[pixel_index(px, py)];
            if *pixel {
                state.v[0xF] = 0x1;
            }
            *pixel = !*pixel;
        }
    }

    state.needs_repaint = true;
    Ok(Flow::Next)
}

/// if Vx.pressed then pc += 2
pub fn skpr(state: &State, keypad: &Keypad, x: usize) -> Flow {
    Flow::skip_if(keypad.is_pressed(state.v[x]))
}

/// if !Vx.pressed then pc += 2
pub fn skup(state: &State, keypad: &Keypad, x: usize) -> Flow {
    Flow::skip_if(!keypad.is_pressed(state.v[x]))
}

/// Vx = DT
pub fn moved(state: &mut State, x: usize) -> Flow {
    state.v[x] = state.delay_timer;
    Flow::Next
}

/// await keypress for Vx
/// Holds the pc in place until some key is down
pub fn keyd(state: &mut State, keypad: &Keypad, x: usize) -> Flow {
    match keypad.first_pressed() {
        Some(key) => {
            state.v[x] = key;
            Flow::Next
        }
        None => Flow::Wait,
    }
}

/// DT = Vx
pub fn loads(state: &mut State, x: usize) -> Flow {
    state.delay_timer = state.v[x];
    Flow::Next
}

/// ST = Vx
pub fn ld(state: &mut State, x: usize) -> Flow {
    if state.sound_timer == 0 && state.v[x] > 0 {
        debug!("sound timer started at {}", state.v[x]);
    }
    state.sound_timer = state.v[x];
    Flow::Next
}

/// I += Vx
pub fn addi(state: &mut State, x: usize) -> Flow {
    state.i = state.i.wrapping_add(u16::from(state.v[x]));
    Flow::Next
}

/// I = Vx * 5
/// Set I to the memory address of the sprite for Vx
/// See constants::SPRITE_SHEET for more details
pub fn ldspr(state: &mut State, x: usize) -> Flow {
    state.i = u16::from(state.v[x]) * SPRITE_HEIGHT;
    Flow::Next
}

/// mem[I..I+3] = bcd(Vx)
/// Store BCD repr of Vx in memory starting at address i
pub fn bcd(state: &mut State, x: usize) -> Result<Flow> {
    let value = state.v[x];
    let digits = [value / 100 % 10, value / 10 % 10, value % 10];
    state.write(usize::from(state.i), &digits)?;
    Ok(Flow::Next)
}

/// mem[I..=I+x] = V0..=Vx; I += x + 1
pub fn stor(state: &mut State, x: usize) -> Result<Flow> {
    let count = x + 1;
    let v = state.v;
    state.write(usize::from(state.i), &v[..count])?;
    state.i = state.i.wrapping_add(count as u16);
    Ok(Flow::Next)
}

/// V0..=Vx = mem[I..=I+x]; I += x + 1
pub fn read(state: &mut State, x: usize) -> Result<Flow> {
    let count = x + 1;
    let mut loaded = [0u8; 16];
    loaded[..count].copy_from_slice(state.read(usize::from(state.i), count)?);
    state.v[..count].copy_from_slice(&loaded[..count]);
    state.i = state.i.wrapping_add(count as u16);
    Ok(Flow::Next)
}
