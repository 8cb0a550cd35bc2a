/// # Opcodes
///
/// Chip-8 opcodes are 16 bits each, stored big-endian. Their behavior is cased on some combination of:
/// - `(n, _, _, _)` the class; applies to all opcodes
/// - `(_, _, _, n)` specific behavior within classes 5, 8 and 9
/// - `(_, _, n, n)` specific behavior within classes E and F
/// - `(_, n, n, n)` some fixed function that doesn't require variables (e.g. CLS; clear screen)
///
/// Nibbles not used to determine the operation carry its operands.
/// - `(_, n, n, n)` a 12-bit address
/// - `(_, _, n, n)` a byte that is assigned to and/or compared with Vx
/// - `(_, n, _, _)` either the register Vx or the range of registers V0..=Vx
/// - `(_, _, n, _)` the register Vy
pub trait Opcode {
    /// The Opcode's most significant nibble.
    /// `[c___]`
    fn class(&self) -> u8;

    /// The Opcode's second nibble, as a register index.
    /// `[_x__]`
    fn x(&self) -> usize;

    /// The Opcode's third nibble, as a register index.
    /// `[__y_]`
    fn y(&self) -> usize;

    /// The Opcode's fourth nibble.
    /// `[___n]`
    fn n(&self) -> u8;

    /// The Opcode's least significant byte.
    /// `[__kk]`
    fn kk(&self) -> u8;

    /// The Opcode without its most significant nibble.
    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn class(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> usize {
        usize::from((self & 0x0F00) >> 8)
    }

    fn y(&self) -> usize {
        usize::from((self & 0x00F0) >> 4)
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn kk(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}

/// Combines the two bytes at `pc` and `pc + 1` into an opcode.
pub fn from_bytes(high: u8, low: u8) -> u16 {
    u16::from(high) << 8 | u16::from(low)
}

#[cfg(test)]
mod test_opcode {
    use super::*;

    #[test]
    fn test_class() {
        let op: u16 = 0xABCD;
        assert_eq!(op.class(), 0xA);
    }

    #[test]
    fn test_registers() {
        let op: u16 = 0xABCD;
        assert_eq!((op.x(), op.y()), (0xB, 0xC));
    }

    #[test]
    fn test_n() {
        let op: u16 = 0xABCD;
        assert_eq!(op.n(), 0xD);
    }

    #[test]
    fn test_kk() {
        let op: u16 = 0xABCD;
        assert_eq!(op.kk(), 0xCD);
    }

    #[test]
    fn test_nnn() {
        let op: u16 = 0xABCD;
        assert_eq!(op.nnn(), 0x0BCD);
    }

    #[test]
    fn test_from_bytes_is_big_endian() {
        assert_eq!(from_bytes(0x4F, 0x13), 0x4F13);
    }
}
