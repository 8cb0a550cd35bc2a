use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Error, Result};
use log::{info, log_enabled, trace, Level};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::{Display, DEFAULT_BACKGROUND, DEFAULT_FOREGROUND};
use emu8_core::{rom, Chip8};

use crate::keymap::keymap;

/// Everything the command line can change about a run
#[derive(Debug)]
pub struct Config {
    pub rom: PathBuf,
    pub scale: u32,
    pub steps_per_frame: usize,
    pub fps: u32,
    pub seed: Option<u64>,
}

/// Loads the rom and runs it until the window is closed or the program stops.
///
/// Faults inside the running program have already been logged by the
/// interpreter and only change the exit code.
pub fn run(config: &Config) -> Result<ExitCode> {
    let mut chip8 = Chip8::new().with_steps_per_cycle(config.steps_per_frame);
    if let Some(seed) = config.seed {
        chip8 = chip8.with_seed(seed);
    }

    // Load ROM
    let program = rom::read(&config.rom)
        .with_context(|| format!("unable to load {}", config.rom.display()))?;
    chip8.load_rom(&program)?;
    if log_enabled!(Level::Trace) {
        trace!("memory after load:\n{}", chip8.memory_dump());
    }

    // Get SDL2 context
    let sdl = sdl2::init()
        .map_err(Error::msg)
        .context("unable to initialize SDL2")?;
    let mut display = Display::new(&sdl, config.scale, DEFAULT_FOREGROUND, DEFAULT_BACKGROUND)
        .map_err(Error::msg)
        .context("unable to open display")?;
    let mut events = sdl.event_pump().map_err(Error::msg)?;

    // Set initial timing
    let frame_time = Duration::from_secs(1) / config.fps;
    let mut last_frame = Instant::now();

    'event: loop {
        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    chip8.stop();
                    info!("quitting");
                    break 'event;
                }
                Event::KeyDown {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_press(kc);
                    }
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    if let Some(kc) = keymap(key) {
                        chip8.key_release(kc);
                    }
                }
                _ => continue,
            };
        }

        // Update state
        if !chip8.is_running() {
            info!("program halted");
            break 'event;
        }
        if chip8.cycle().is_err() {
            return Ok(ExitCode::FAILURE);
        }

        // If the frame changed, render it
        if let Some(frame) = chip8.take_frame() {
            display.render(frame).map_err(Error::msg)?;
        }

        // Handle timing
        let elapsed = last_frame.elapsed();
        if frame_time > elapsed {
            std::thread::sleep(frame_time - elapsed);
        }
        last_frame = Instant::now();
    }

    Ok(ExitCode::SUCCESS)
}
