use std::path::PathBuf;

use clap::Parser;

mod keymap;
mod run;

/// A CHIP-8 virtual machine
#[derive(Parser, Debug)]
struct Args {
    /// Path of the ROM to execute
    rom: PathBuf,

    /// Instructions per second
    #[arg(long, default_value_t = (1_000_000_000 / vm8::CLOCK_SPEED) as u32, value_parser = clap::value_parser!(u32).range(1..))]
    ips: u32,

    /// Step over unknown opcodes instead of stopping
    #[arg(long)]
    ignore_unknown: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    run::run(args.rom, args.ips, args.ignore_unknown);
}
