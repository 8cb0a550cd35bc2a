/// # Keypad
/// Chip-8 input is generated with a 16 key hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
/// Keys are tracked by their logical value; mapping physical keys is left to the host.
#[derive(Copy, Clone, Debug, Default)]
pub struct Keypad {
    pressed: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys outside 0x0..=0xF are ignored.
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = true;
        }
    }

    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.pressed.get_mut(usize::from(key)) {
            *pressed = false;
        }
    }

    /// Programs can ask about any register value, not just 0x0..=0xF.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.pressed
            .get(usize::from(key))
            .copied()
            .unwrap_or(false)
    }

    /// The lowest key currently held down.
    pub fn first_pressed(&self) -> Option<u8> {
        self.pressed.iter().position(|&p| p).map(|key| key as u8)
    }
}
