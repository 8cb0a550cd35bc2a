use std::path::PathBuf;
use std::process::ExitCode;

use clap::{value_parser, ArgAction, Parser};
use log::{error, LevelFilter};

use display::DEFAULT_SCALE;
use emu8_core::constants::{FRAMES_PER_SECOND, STEPS_PER_CYCLE};

mod keymap;
mod run;

/// A Chip-8 interpreter
#[derive(Parser, Debug)]
#[command(name = "emu8", version, about)]
struct Args {
    /// Path to the ROM to run
    rom: PathBuf,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Size of each Chip-8 pixel in screen pixels
    #[arg(long, default_value_t = DEFAULT_SCALE, value_parser = value_parser!(u32).range(1..=64))]
    scale: u32,

    /// Instructions executed per frame
    #[arg(long, default_value_t = STEPS_PER_CYCLE)]
    steps_per_frame: usize,

    /// Frames per second; timers tick once per frame
    #[arg(long, default_value_t = FRAMES_PER_SECOND, value_parser = value_parser!(u32).range(1..=1000))]
    fps: u32,

    /// Seed for RND so runs can be reproduced
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logger(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.verbose);

    let config = run::Config {
        rom: args.rom,
        scale: args.scale,
        steps_per_frame: args.steps_per_frame,
        fps: args.fps,
        seed: args.seed,
    };

    match run::run(&config) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
