pub use chip8::Chip8;
pub use constants::CLOCK_SPEED;
pub use error::Chip8Error;

mod chip8;
pub mod constants;
mod error;
mod instruction;
mod opcode;
mod operations;
pub mod state;
