/// Horizontal frame buffer resolution
pub const DISPLAY_WIDTH: usize = 64;

/// Vertical frame buffer resolution
pub const DISPLAY_HEIGHT: usize = 32;

/// Total addressable memory
pub const MEMORY_SIZE: usize = 4096;

/// Where ROMs are loaded and where execution starts
pub const PROGRAM_START: usize = 0x200;

/// The largest ROM that fits between PROGRAM_START and the end of memory
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START;

/// Where the sprite sheet is installed; FX29 computes glyph addresses from here
pub const FONT_BASE: u16 = 0x050;

/// Return address slots available to CALL
pub const STACK_DEPTH: usize = 16;

/// Nanoseconds per CPU cycle at the conventional 500Hz clock
pub const CLOCK_SPEED: usize = 2_000_000;

/// Sprites for the hexadecimal digits 0..F
///
/// Each glyph is 5 bytes tall and uses the high nibble of each byte,
/// e.g. 0x2:
/// ```text
/// 0xF0 -> 1111
/// 0x10 -> ___1
/// 0xF0 -> 1111
/// 0x80 -> 1___
/// 0xF0 -> 1111
/// ```
pub const SPRITE_SHEET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
