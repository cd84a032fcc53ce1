use std::io::Read;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::constants::{MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::Chip8Error;
use crate::instruction;
use crate::opcode::Fields;
use crate::state::{FrameBuffer, State};

/// # Chip-8
/// Chip-8 is a virtual machine and corresponding interpreted language.
///
/// Tracks:
///  - current `state`
///  - `pressed_keys` with public interfaces for manipulating them
///  - the random source for CXNN, seedable for reproducible runs
///
/// Supplies interfaces for:
/// - loading roms
/// - pressing and releasing keys
/// - advancing the CPU one fetch/decode/execute cycle at a time
/// - decrementing its timers at whatever cadence the host drives
/// - inspecting its frame buffer for rendering by some display
///
/// Every fatal condition is returned as a [`Chip8Error`] value; the machine
/// never terminates the host. A failed instruction applies no state change.
/// Each `Chip8` value is fully self-contained, so any number of machines can
/// run side by side.
pub struct Chip8 {
    state: State,
    pressed_keys: [bool; 16],
    rng: StdRng,
    ignore_unknown: bool,
}

impl Chip8 {
    pub fn new() -> Self {
        Chip8 {
            state: State::new(),
            pressed_keys: [false; 16],
            rng: StdRng::from_entropy(),
            ignore_unknown: false,
        }
    }

    /// A machine whose CXNN stream is reproducible; everything else matches `new`
    pub fn with_seed(seed: u64) -> Self {
        Chip8 {
            rng: StdRng::seed_from_u64(seed),
            ..Chip8::new()
        }
    }

    /// Selects what happens when a fetched word decodes to no known
    /// instruction: strict machines (the default) report the error, lenient
    /// ones log a warning and step over the word. Some ROMs probe undefined
    /// opcodes, so this is the host's call.
    pub fn ignore_unknown_opcodes(&mut self, ignore: bool) {
        self.ignore_unknown = ignore;
    }

    /// Load a rom from a source of bytes
    ///
    /// Fails with `RomTooLarge` before touching memory if the image doesn't
    /// fit between PROGRAM_START and the end of memory.
    ///
    /// # Arguments
    /// * `reader` a reader that contains a ROM
    pub fn load_rom(&mut self, reader: &mut dyn Read) -> Result<usize, Chip8Error> {
        let mut rom = Vec::new();
        reader.read_to_end(&mut rom)?;
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.state.memory[PROGRAM_START..PROGRAM_START + rom.len()].copy_from_slice(&rom);
        Ok(rom.len())
    }

    /// Returns the FrameBuffer if the display changed since the last snapshot
    pub fn get_frame(&mut self) -> Option<FrameBuffer> {
        if self.state.draw_flag {
            self.state.draw_flag = false;
            Some(self.state.frame_buffer)
        } else {
            None
        }
    }

    /// Read-only view of the whole machine state
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Set the pressed status of key
    ///
    /// A press that arrives while an FX0A instruction is suspended resolves
    /// the suspension: the key lands in the waiting register and pc moves
    /// past the FX0A word.
    ///
    /// # Arguments
    /// * `key` the key that was pressed, 0x0..=0xF
    pub fn key_press(&mut self, key: u8) {
        assert!(key & 0x0F == key);
        self.pressed_keys[key as usize] = true;
        if let Some(register) = self.state.register_needing_key {
            self.state.v[register as usize] = key;
            self.state.register_needing_key = None;
            self.state.pc += 0x2;
        }
    }

    /// Unset the pressed status of key
    ///
    /// # Arguments
    /// * `key` the key that was released, 0x0..=0xF
    pub fn key_release(&mut self, key: u8) {
        assert!(key & 0x0F == key);
        self.pressed_keys[key as usize] = false;
    }

    /// Advances the CPU by a single cycle
    /// - does nothing while suspended awaiting a keypress
    /// - fetches, decodes and executes the next word, committing the new
    ///   state only if the instruction fully applied
    pub fn advance_cpu(&mut self) -> Result<(), Chip8Error> {
        if self.state.register_needing_key.is_some() {
            return Ok(());
        }
        let word = self.fetch_op()?;
        log::trace!(
            "{:04X} v{:02X?} i{:04X} pc{:04X}",
            word,
            self.state.v,
            self.state.i,
            self.state.pc
        );
        let op = Fields::from(word);
        let operation = match instruction::from_op(op) {
            Ok(operation) => operation,
            Err(e) if self.ignore_unknown => {
                log::warn!("stepping over {}", e);
                self.state.pc += 0x2;
                return Ok(());
            }
            Err(e) => return Err(e),
        };
        // jump/call/ret/skip targets are relative to the already-advanced pc
        let mut fetched = self.state;
        fetched.pc += 0x2;
        self.state = operation(op, &fetched, self.pressed_keys, &mut self.rng)?;
        Ok(())
    }

    /// Decrements both timers by one, clamped at 0
    ///
    /// The machine attaches no cadence to this; a host chasing the
    /// conventional behavior calls it 60 times per second.
    pub fn tick_timers(&mut self) {
        if self.state.delay_timer > 0 {
            self.state.delay_timer -= 1;
        }
        if self.state.sound_timer > 0 {
            self.state.sound_timer -= 1;
        }
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.state.delay_timer = value;
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.state.sound_timer = value;
    }

    /// Gets the word currently pointed at by the pc.
    /// Memory is stored as bytes, but opcodes are 16 bits so we combine two
    /// subsequent bytes; a pc from which either byte would fall outside
    /// memory is a fatal error, not a wrap.
    fn fetch_op(&self) -> Result<u16, Chip8Error> {
        let pc = self.state.pc as usize;
        if pc + 1 >= MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: self.state.pc,
            });
        }
        let left = u16::from(self.state.memory[pc]);
        let right = u16::from(self.state.memory[pc + 1]);
        Ok(left << 8 | right)
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

    fn load(machine: &mut Chip8, rom: &[u8]) {
        let mut rom = rom;
        machine.load_rom(&mut rom).unwrap();
    }

    #[test]
    fn test_chip8_gets_op() {
        let mut chip8 = Chip8::new();
        chip8.state.memory[0x200..0x202].copy_from_slice(&[0xAA, 0xBB]);
        assert_eq!(chip8.fetch_op().unwrap(), 0xAABB);
    }

    #[test]
    fn test_fetch_past_memory_is_fatal() {
        let mut chip8 = Chip8::new();
        chip8.state.pc = 0xFFF;
        assert!(matches!(
            chip8.advance_cpu(),
            Err(Chip8Error::MemoryOutOfBounds { address: 0xFFF })
        ));
    }

    #[test]
    fn test_cycles_while_no_register_needs_key() {
        let mut chip8 = Chip8::new();
        let starting_pc = chip8.state.pc;
        load(&mut chip8, &[0x00, 0xE0]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, starting_pc + 0x2);
    }

    #[test]
    fn test_doesnt_cycle_while_register_needs_key() {
        let mut chip8 = Chip8::new();
        let starting_pc = chip8.state.pc;
        chip8.state.register_needing_key = Some(0x1);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, starting_pc);
    }

    #[test]
    fn test_key_press_resolves_suspension() {
        let mut chip8 = Chip8::new();
        load(&mut chip8, &[0xF1, 0x0A]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.register_needing_key, Some(0x1));
        assert_eq!(chip8.state.pc, 0x200);
        // still parked on the same word
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_press(0xE);
        assert_eq!(chip8.state.register_needing_key, None);
        assert_eq!(chip8.state.v[0x1], 0xE);
        assert_eq!(chip8.state.pc, 0x202);
    }

    #[test]
    fn test_key_press_without_suspension_only_sets_key() {
        let mut chip8 = Chip8::new();
        chip8.key_press(0xA);
        assert!(chip8.pressed_keys[0xA]);
        assert_eq!(chip8.state.pc, 0x200);
        chip8.key_release(0xA);
        assert!(!chip8.pressed_keys[0xA]);
    }

    #[test]
    fn test_load_rom_of_max_size() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; 3584];
        assert_eq!(chip8.load_rom(&mut rom.as_slice()).unwrap(), 3584);
        assert_eq!(chip8.state.memory[0x200], 0xAB);
        assert_eq!(chip8.state.memory[0xFFF], 0xAB);
    }

    #[test]
    fn test_load_rom_too_large() {
        let mut chip8 = Chip8::new();
        let rom = vec![0xAB; 3585];
        assert!(matches!(
            chip8.load_rom(&mut rom.as_slice()),
            Err(Chip8Error::RomTooLarge { size: 3585, .. })
        ));
        // nothing was copied
        assert_eq!(chip8.state.memory[0x200], 0x0);
    }

    #[test]
    fn test_load_rom_leaves_rest_of_program_area_zero() {
        let mut chip8 = Chip8::new();
        load(&mut chip8, &[0x12, 0x00]);
        assert_eq!(chip8.state.memory[0x200..0x202], [0x12, 0x00]);
        assert_eq!(chip8.state.memory[0x202..], [0; 4096 - 0x202]);
    }

    #[test]
    fn test_timers_clamp_at_zero() {
        let mut chip8 = Chip8::new();
        chip8.set_delay_timer(0x2);
        chip8.set_sound_timer(0x1);
        chip8.tick_timers();
        chip8.tick_timers();
        chip8.tick_timers();
        assert_eq!(chip8.delay_timer(), 0x0);
        assert_eq!(chip8.sound_timer(), 0x0);
    }

    #[test]
    fn test_unknown_opcode_is_fatal_by_default() {
        let mut chip8 = Chip8::new();
        load(&mut chip8, &[0x51, 0x21]);
        assert!(matches!(
            chip8.advance_cpu(),
            Err(Chip8Error::UnknownOpcode { opcode: 0x5121 })
        ));
        assert_eq!(chip8.state.pc, 0x200);
    }

    #[test]
    fn test_unknown_opcode_skipped_when_lenient() {
        let mut chip8 = Chip8::new();
        chip8.ignore_unknown_opcodes(true);
        load(&mut chip8, &[0x51, 0x21, 0x61, 0x22]);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.pc, 0x202);
        chip8.advance_cpu().unwrap();
        assert_eq!(chip8.state.v[0x1], 0x22);
    }

    #[test]
    fn test_failed_instruction_applies_nothing() {
        let mut chip8 = Chip8::new();
        // I = 0xFFF, then dump V0..V1 from there
        load(&mut chip8, &[0xAF, 0xFF, 0xF1, 0x55]);
        chip8.advance_cpu().unwrap();
        assert!(chip8.advance_cpu().is_err());
        assert_eq!(chip8.state.pc, 0x202);
        assert_eq!(chip8.state.i, 0xFFF);
    }

    #[test]
    fn test_add_with_carry_program() {
        let mut chip8 = Chip8::new();
        // V0 = 5; V1 = 3; V0 += V1 with carry
        load(&mut chip8, &[0x60, 0x05, 0x61, 0x03, 0x80, 0x14]);
        for _ in 0..3 {
            chip8.advance_cpu().unwrap();
        }
        assert_eq!(chip8.state.v[0x0], 0x8);
        assert_eq!(chip8.state.v[0xF], 0x0);
    }

    #[test]
    fn test_clear_then_draw_matches_sprite() {
        let mut chip8 = Chip8::new();
        chip8.state.frame_buffer[10][10] = 1;
        // I = font base; clear; draw the 0x0 glyph's top row at (0, 0)
        load(&mut chip8, &[0xA0, 0x50, 0x00, 0xE0, 0xD0, 0x11]);
        for _ in 0..3 {
            chip8.advance_cpu().unwrap();
        }
        assert_eq!(chip8.state.frame_buffer[10][10], 0);
        assert_eq!(chip8.state.frame_buffer[0][..8], [1, 1, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_seeded_machines_are_reproducible() {
        let mut first = Chip8::with_seed(0xC0FFEE);
        let mut second = Chip8::with_seed(0xC0FFEE);
        load(&mut first, &[0xC1, 0xFF]);
        load(&mut second, &[0xC1, 0xFF]);
        first.advance_cpu().unwrap();
        second.advance_cpu().unwrap();
        assert_eq!(first.state.v[0x1], second.state.v[0x1]);
    }
}
