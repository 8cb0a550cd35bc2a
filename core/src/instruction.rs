use std::fmt;

use rand::Rng;

use crate::error::Result;
use crate::keypad::Keypad;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::state::State;

/// A decoded Chip-8 instruction.
///
/// `x` and `y` are register indices, `kk` an immediate byte, `n` a sprite height
/// and `addr` a 12-bit address.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    Clear,
    Return,
    Sys { addr: u16 },
    Jump { addr: u16 },
    Call { addr: u16 },
    SkipEqByte { x: usize, kk: u8 },
    SkipNeByte { x: usize, kk: u8 },
    SkipEqReg { x: usize, y: usize },
    LoadByte { x: usize, kk: u8 },
    AddByte { x: usize, kk: u8 },
    Move { x: usize, y: usize },
    Or { x: usize, y: usize },
    And { x: usize, y: usize },
    Xor { x: usize, y: usize },
    AddReg { x: usize, y: usize },
    Sub { x: usize, y: usize },
    ShiftRight { x: usize, y: usize },
    SubN { x: usize, y: usize },
    ShiftLeft { x: usize, y: usize },
    SkipNeReg { x: usize, y: usize },
    LoadI { addr: u16 },
    JumpV0 { addr: u16 },
    Random { x: usize, kk: u8 },
    Draw { x: usize, y: usize, n: u8 },
    SkipPressed { x: usize },
    SkipNotPressed { x: usize },
    LoadDelay { x: usize },
    WaitKey { x: usize },
    SetDelay { x: usize },
    SetSound { x: usize },
    AddI { x: usize },
    LoadSprite { x: usize },
    StoreBcd { x: usize },
    StoreRegs { x: usize },
    LoadRegs { x: usize },
}

use Instruction::*;

impl Instruction {
    /// Selects the Instruction for a given Opcode.
    ///
    /// Classes 5, 8, 9, E and F only accept the sub-operations listed below;
    /// anything else is unrecognized rather than falling through to another class.
    pub fn decode(op: u16) -> Option<Instruction> {
        let (x, y, n, kk, addr) = (op.x(), op.y(), op.n(), op.kk(), op.nnn());
        let instruction = match (op.class(), n, kk) {
            _ if op == 0x00E0 => Clear,
            _ if op == 0x00EE => Return,
            (0x0, ..) => Sys { addr },
            (0x1, ..) => Jump { addr },
            (0x2, ..) => Call { addr },
            (0x3, ..) => SkipEqByte { x, kk },
            (0x4, ..) => SkipNeByte { x, kk },
            (0x5, 0x0, _) => SkipEqReg { x, y },
            (0x6, ..) => LoadByte { x, kk },
            (0x7, ..) => AddByte { x, kk },
            (0x8, 0x0, _) => Move { x, y },
            (0x8, 0x1, _) => Or { x, y },
            (0x8, 0x2, _) => And { x, y },
            (0x8, 0x3, _) => Xor { x, y },
            (0x8, 0x4, _) => AddReg { x, y },
            (0x8, 0x5, _) => Sub { x, y },
            (0x8, 0x6, _) => ShiftRight { x, y },
            (0x8, 0x7, _) => SubN { x, y },
            (0x8, 0xE, _) => ShiftLeft { x, y },
            (0x9, 0x0, _) => SkipNeReg { x, y },
            (0xA, ..) => LoadI { addr },
            (0xB, ..) => JumpV0 { addr },
            (0xC, ..) => Random { x, kk },
            (0xD, ..) => Draw { x, y, n },
            (0xE, _, 0x9E) => SkipPressed { x },
            (0xE, _, 0xA1) => SkipNotPressed { x },
            (0xF, _, 0x07) => LoadDelay { x },
            (0xF, _, 0x0A) => WaitKey { x },
            (0xF, _, 0x15) => SetDelay { x },
            (0xF, _, 0x18) => SetSound { x },
            (0xF, _, 0x1E) => AddI { x },
            (0xF, _, 0x29) => LoadSprite { x },
            (0xF, _, 0x33) => StoreBcd { x },
            (0xF, _, 0x55) => StoreRegs { x },
            (0xF, _, 0x65) => LoadRegs { x },
            _ => return None,
        };
        Some(instruction)
    }

    /// Runs the instruction against `state`, returning how the pc should move.
    pub fn execute<R: Rng + ?Sized>(
        self,
        state: &mut State,
        keypad: &Keypad,
        rng: &mut R,
    ) -> Result<Flow> {
        let flow = match self {
            Clear => clr(state),
            Return => rts(state)?,
            Sys { addr } => sys(state, addr),
            Jump { addr } => jump(addr),
            Call { addr } => call(state, addr)?,
            SkipEqByte { x, kk } => ske(state, x, kk),
            SkipNeByte { x, kk } => skne(state, x, kk),
            SkipEqReg { x, y } => skre(state, x, y),
            LoadByte { x, kk } => load(state, x, kk),
            AddByte { x, kk } => add(state, x, kk),
            Move { x, y } => mv(state, x, y),
            Or { x, y } => or(state, x, y),
            And { x, y } => and(state, x, y),
            Xor { x, y } => xor(state, x, y),
            AddReg { x, y } => addr(state, x, y),
            Sub { x, y } => sub(state, x, y),
            ShiftRight { x, y } => shr(state, x, y),
            SubN { x, y } => subn(state, x, y),
            ShiftLeft { x, y } => shl(state, x, y),
            SkipNeReg { x, y } => skrne(state, x, y),
            LoadI { addr } => loadi(state, addr),
            JumpV0 { addr } => jumpi(state, addr),
            Random { x, kk } => rnd(state, rng, x, kk),
            Draw { x, y, n } => draw(state, x, y, n)?,
            SkipPressed { x } => skpr(state, keypad, x),
            SkipNotPressed { x } => skup(state, keypad, x),
            LoadDelay { x } => moved(state, x),
            WaitKey { x } => keyd(state, keypad, x),
            SetDelay { x } => loads(state, x),
            SetSound { x } => ld(state, x),
            AddI { x } => addi(state, x),
            LoadSprite { x } => ldspr(state, x),
            StoreBcd { x } => bcd(state, x)?,
            StoreRegs { x } => stor(state, x)?,
            LoadRegs { x } => read(state, x)?,
        };
        Ok(flow)
    }
}

/// Disassembles the instruction using the conventional mnemonics.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Clear => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Sys { addr } => write!(f, "SYS {:#05X}", addr),
            Jump { addr } => write!(f, "JP {:#05X}", addr),
            Call { addr } => write!(f, "CALL {:#05X}", addr),
            SkipEqByte { x, kk } => write!(f, "SE V{:X}, {:#04X}", x, kk),
            SkipNeByte { x, kk } => write!(f, "SNE V{:X}, {:#04X}", x, kk),
            SkipEqReg { x, y } => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadByte { x, kk } => write!(f, "LD V{:X}, {:#04X}", x, kk),
            AddByte { x, kk } => write!(f, "ADD V{:X}, {:#04X}", x, kk),
            Move { x, y } => write!(f, "LD V{:X}, V{:X}", x, y),
            Or { x, y } => write!(f, "OR V{:X}, V{:X}", x, y),
            And { x, y } => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor { x, y } => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg { x, y } => write!(f, "ADD V{:X}, V{:X}", x, y),
            Sub { x, y } => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight { x, y } => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubN { x, y } => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft { x, y } => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg { x, y } => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadI { addr } => write!(f, "LD I, {:#05X}", addr),
            JumpV0 { addr } => write!(f, "JP V0, {:#05X}", addr),
            Random { x, kk } => write!(f, "RND V{:X}, {:#04X}", x, kk),
            Draw { x, y, n } => write!(f, "DRW V{:X}, V{:X}, {:#03X}", x, y, n),
            SkipPressed { x } => write!(f, "SKP V{:X}", x),
            SkipNotPressed { x } => write!(f, "SKNP V{:X}", x),
            LoadDelay { x } => write!(f, "LD V{:X}, DT", x),
            WaitKey { x } => write!(f, "LD V{:X}, K", x),
            SetDelay { x } => write!(f, "LD DT, V{:X}", x),
            SetSound { x } => write!(f, "LD ST, V{:X}", x),
            AddI { x } => write!(f, "ADD I, V{:X}", x),
            LoadSprite { x } => write!(f, "LD F, V{:X}", x),
            StoreBcd { x } => write!(f, "LD B, V{:X}", x),
            StoreRegs { x } => write!(f, "LD [I], V{:X}", x),
            LoadRegs { x } => write!(f, "LD V{:X}, [I]", x),
        }
    }
}
