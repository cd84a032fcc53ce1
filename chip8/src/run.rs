use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use sdl2::event::Event;
use sdl2::keyboard::Keycode;

use display::Display;
use vm8::Chip8;

use crate::keymap::keymap;

pub fn run(rom: PathBuf, ips: u32, ignore_unknown: bool) {
    let mut chip8: Chip8 = Chip8::new();
    chip8.ignore_unknown_opcodes(ignore_unknown);

    // Get SDL2 context
    let sdl: sdl2::Sdl = sdl2::init().unwrap();
    let mut display: Display = Display::new(&sdl);
    let mut events = sdl.event_pump().unwrap();

    // Load ROM; a ROM that doesn't load leaves nothing to run
    let file = File::open(rom).expect("unable to open file");
    let mut reader = BufReader::new(file);
    match chip8.load_rom(&mut reader) {
        Ok(size) => log::info!("loaded {} byte ROM", size),
        Err(e) => {
            log::error!("failed to load ROM: {}", e);
            return;
        }
    };

    // Set initial timing; the timers tick at 60Hz no matter the CPU clock
    let cycle_time: Duration = Duration::new(0, 1_000_000_000 / ips);
    let cycles_per_timer_tick: u32 = std::cmp::max(1, ips / 60);
    let mut last_cycle: Instant = Instant::now();
    let mut cycles_since_timer_tick: u32 = 0;

    // Whether or not the default clock speed should be respected
    let mut fast_forward: bool = false;

    'event: loop {
        // If the draw flag is set, unset it and render the current frame
        if let Some(frame) = chip8.get_frame() {
            display.render(&frame);
        }

        // Handle input
        for event in events.poll_iter() {
            match event {
                Event::Quit { .. } => break 'event,
                Event::KeyDown {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_press(kc),
                    (Keycode::Space, _) => fast_forward = true,
                    (Keycode::Escape, _) => break 'event,
                    _ => continue,
                },
                Event::KeyUp {
                    keycode: Some(key), ..
                } => match (key, keymap(key)) {
                    (_, Some(kc)) => chip8.key_release(kc),
                    (Keycode::Space, _) => fast_forward = false,
                    _ => continue,
                },
                _ => continue,
            };
        }

        // Update state; fatal machine errors stop execution, the host only reports them
        if let Err(e) = chip8.advance_cpu() {
            log::error!("machine stopped: {}", e);
            break 'event;
        }

        // Approximate the 60Hz timer cadence against the CPU clock
        cycles_since_timer_tick += 1;
        if cycles_since_timer_tick == cycles_per_timer_tick {
            chip8.tick_timers();
            cycles_since_timer_tick = 0;
        }

        // Handle timing
        let current_time = Instant::now();
        let elapsed_cycle_time = current_time - last_cycle;
        if !fast_forward && cycle_time > elapsed_cycle_time {
            std::thread::sleep(cycle_time - elapsed_cycle_time);
        }
        last_cycle = current_time;
    }
}
