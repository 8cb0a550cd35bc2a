use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_ROM_SIZE, PROGRAM_START, STEPS_PER_CYCLE};
use crate::error::{Chip8Error, Result};
use crate::instruction::Instruction;
use crate::keypad::Keypad;
use crate::opcode;
use crate::operations::Flow;
use crate::state::{FrameBuffer, State};

/// What a single call to `Chip8::step` did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// The instruction ran and the pc moved on
    Executed(Instruction),
    /// `LD Vx, K` is waiting on a key; the pc hasn't moved
    WaitingForKey,
    /// The machine is no longer running; nothing happened
    Halted,
}

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `keypad` with public interfaces for pressing and releasing keys
///  - the random number generator used by `RND`
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - stepping the CPU and running whole cycles
/// - advancing its timers
/// - inspecting its frame buffer for rendering by some display
pub struct Chip8 {
    state: State,
    keypad: Keypad,
    rng: StdRng,
    steps_per_cycle: usize,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            keypad: Keypad::new(),
            rng: StdRng::from_entropy(),
            steps_per_cycle: STEPS_PER_CYCLE,
        }
    }

    /// Makes `RND` reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Sets how many instructions `cycle` runs before ticking the timers.
    pub fn with_steps_per_cycle(mut self, steps: usize) -> Self {
        self.steps_per_cycle = steps;
        self
    }

    /// Load a rom into program memory
    ///
    /// # Arguments
    /// * `rom` the raw program, at most `MAX_ROM_SIZE` bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.state.write(usize::from(PROGRAM_START), rom)?;
        info!("loaded {} byte ROM at {:#05X}", rom.len(), PROGRAM_START);
        Ok(())
    }

    /// Puts the machine back into its initial state.
    /// Program memory is cleared too, so the rom has to be loaded again.
    pub fn reset(&mut self) {
        self.state = State::new();
        self.keypad = Keypad::new();
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.state.frame_buffer
    }

    pub fn needs_repaint(&self) -> bool {
        self.state.needs_repaint
    }

    /// Returns the FrameBuffer if the display should be redrawn, marking it as drawn
    pub fn take_frame(&mut self) -> Option<&FrameBuffer> {
        if self.state.needs_repaint {
            self.state.needs_repaint = false;
            Some(&self.state.frame_buffer)
        } else {
            None
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// Halts the machine, e.g. when the host wants to quit mid `LD Vx, K`
    pub fn stop(&mut self) {
        self.state.running = false;
    }

    /// Whether a beep should currently be playing
    pub fn sound_active(&self) -> bool {
        self.state.sound_timer > 0
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was pressed
    pub fn key_press(&mut self, key: u8) {
        self.keypad.press(key);
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 8-bit representation of the key that was released
    pub fn key_release(&mut self, key: u8) {
        self.keypad.release(key);
    }

    /// Advances the CPU by a single instruction
    /// - does nothing once halted
    /// - gets, decodes and executes the next opcode
    /// - halts on any error before returning it
    pub fn step(&mut self) -> Result<Step> {
        if !self.state.running {
            return Ok(Step::Halted);
        }
        let result = self.execute_next();
        if let Err(e) = &result {
            error!("halting: {}", e);
            self.state.running = false;
        }
        result
    }

    fn execute_next(&mut self) -> Result<Step> {
        let pc = self.state.pc;
        let op = self.get_op()?;
        let instruction = Instruction::decode(op)
            .ok_or(Chip8Error::UnrecognizedOpcode { opcode: op, pc })?;
        trace!("{:#05X}: {:04X}  {}", pc, op, instruction);

        let flow = instruction.execute(&mut self.state, &self.keypad, &mut self.rng)?;
        self.state.pc = flow.advance(pc);

        Ok(match flow {
            Flow::Wait => Step::WaitingForKey,
            _ => Step::Executed(instruction),
        })
    }

    /// Decrements both timers towards 0
    pub fn tick_timers(&mut self) {
        self.state.delay_timer = self.state.delay_timer.saturating_sub(1);

        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
            if self.state.sound_timer == 0 {
                debug!("sound timer expired");
            }
        }
    }

    /// Runs one frame's worth of work
    /// - up to `steps_per_cycle` instructions, stopping early if halted or waiting on a key
    /// - a single timer tick
    pub fn cycle(&mut self) -> Result<()> {
        for _ in 0..self.steps_per_cycle {
            match self.step()? {
                Step::Executed(_) => continue,
                Step::WaitingForKey | Step::Halted => break,
            }
        }
        self.tick_timers();
        Ok(())
    }

    /// Hex dump of the whole address space
    pub fn memory_dump(&self) -> String {
        self.state.memory_dump()
    }

    /// Gets the opcode currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two subsequent bytes.
    fn get_op(&self) -> Result<u16> {
        let bytes = self.state.read(usize::from(self.state.pc), 2)?;
        Ok(opcode::from_bytes(bytes[0], bytes[1]))
    }
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chip8_with(program: &[u8]) -> Chip8 {
        let mut chip8 = Chip8::new().with_seed(0x8);
        chip8.load_rom(program).unwrap();
        chip8
    }

    #[test]
    fn test_chip8_gets_op() {
        let chip8 = chip8_with(&[0xAA, 0xBB]);
        assert_eq!(chip8.get_op().unwrap(), 0xAABB);
    }

    #[test]
    fn test_get_op_past_end_of_memory() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert!(matches!(
            chip8.get_op(),
            Err(Chip8Error::MemoryOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_step_advances_pc() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        let starting_pc = chip8.state.pc;
        assert_eq!(chip8.step().unwrap(), Step::Executed(Instruction::Clear));
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
    }

    #[test]
    fn test_step_waits_for_key() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A]);
        assert_eq!(chip8.step().unwrap(), Step::WaitingForKey);
        assert_eq!(chip8.step().unwrap(), Step::WaitingForKey);
        assert_eq!(chip8.state.pc, 0x200);

        chip8.key_press(0xE);
        assert_eq!(
            chip8.step().unwrap(),
            Step::Executed(Instruction::WaitKey { x: 0x1 })
        );
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_stop_cancels_wait() {
        let mut chip8 = chip8_with(&[0xF1, 0x0A]);
        chip8.step().unwrap();
        chip8.stop();
        chip8.key_press(0x1);
        assert_eq!(chip8.step().unwrap(), Step::Halted);
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_unrecognized_opcode_halts() {
        let mut chip8 = chip8_with(&[0x50, 0x01]);
        match chip8.step() {
            Err(Chip8Error::UnrecognizedOpcode { opcode, pc }) => {
                assert_eq!(opcode, 0x5001);
                assert_eq!(pc, 0x200);
            }
            other => panic!("expected an unrecognized opcode, got {:?}", other),
        }
        assert!(!chip8.is_running());
        assert_eq!(chip8.step().unwrap(), Step::Halted);
    }

    #[test]
    fn test_stack_fault_halts() {
        let mut chip8 = chip8_with(&[0x00, 0xEE]);
        assert!(matches!(
            chip8.step(),
            Err(Chip8Error::StackUnderflow { .. })
        ));
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_tick_timers() {
        let mut chip8 = Chip8::new();
        chip8.state.delay_timer = 0x2;
        chip8.state.sound_timer = 0x1;
        assert!(chip8.sound_active());
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0x1);
        assert_eq!(chip8.state.sound_timer, 0x0);
        assert!(!chip8.sound_active());
        chip8.tick_timers();
        chip8.tick_timers();
        assert_eq!(chip8.state.delay_timer, 0x0);
        assert_eq!(chip8.state.sound_timer, 0x0);
    }

    #[test]
    fn test_cycle_runs_steps_then_ticks_once() {
        // 7001 ADD V0, 1 then JP 0x200, forever
        let mut chip8 = chip8_with(&[0x70, 0x01, 0x12, 0x00]).with_steps_per_cycle(10);
        chip8.state.delay_timer = 0x5;
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.v[0x0], 5);
        assert_eq!(chip8.state.delay_timer, 0x4);
    }

    #[test]
    fn test_cycle_stops_early_when_waiting() {
        // ADD V0, 1 then LD V1, K
        let mut chip8 = chip8_with(&[0x70, 0x01, 0xF1, 0x0A, 0x70, 0x01]);
        chip8.state.sound_timer = 0x3;
        chip8.cycle().unwrap();
        assert_eq!(chip8.state.v[0x0], 1);
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.sound_timer, 0x2);
    }

    #[test]
    fn test_cycle_propagates_faults() {
        let mut chip8 = chip8_with(&[0x60, 0x01, 0xFF, 0xFF]);
        assert!(chip8.cycle().is_err());
        assert_eq!(chip8.state.v[0x0], 0x1);
        assert!(!chip8.is_running());
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAA; MAX_ROM_SIZE + 1];
        assert!(matches!(
            chip8.load_rom(&rom),
            Err(Chip8Error::RomTooLarge { size: 0xE01, max: 0xE00 })
        ));
        assert_eq!(chip8.state.memory[0x200], 0x0);
    }

    #[test]
    fn test_load_rom_fills_program_memory() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAA; MAX_ROM_SIZE];
        chip8.load_rom(&rom).unwrap();
        assert!(chip8.state.memory[0x200..].iter().all(|&b| b == 0xAA));
    }

    #[test]
    fn test_take_frame_clears_repaint() {
        let mut chip8 = chip8_with(&[0x00, 0xE0]);
        assert!(chip8.take_frame().is_none());
        chip8.step().unwrap();
        assert!(chip8.needs_repaint());
        assert!(chip8.take_frame().is_some());
        assert!(!chip8.needs_repaint());
        assert!(chip8.take_frame().is_none());
    }

    #[test]
    fn test_seeded_rnd_is_reproducible() {
        let program = [0xC0, 0xFF, 0xC1, 0xFF];
        let mut a = chip8_with(&program);
        let mut b = chip8_with(&program);
        for _ in 0..2 {
            a.step().unwrap();
            b.step().unwrap();
        }
        assert_eq!(a.state.v[..2], b.state.v[..2]);
    }

    #[test]
    fn test_reset() {
        let mut chip8 = chip8_with(&[0x60, 0x01, 0x00, 0x00]);
        chip8.step().unwrap();
        chip8.key_press(0x3);
        chip8.reset();
        assert_eq!(chip8.state.pc, 0x200);
        assert_eq!(chip8.state.v[0x0], 0x0);
        assert_eq!(chip8.state.memory[0x200], 0x0);
        assert!(!chip8.keypad.is_pressed(0x3));
        assert!(chip8.is_running());
    }
}
