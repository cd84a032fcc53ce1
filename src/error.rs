/// Fatal conditions surfaced to the host
///
/// All of these stop the machine that raised them; none are retried
/// internally. The host decides whether to halt, log, or reset.
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error("ROM is too large ({size} bytes), max size is {max} bytes")]
    RomTooLarge { size: usize, max: usize },

    #[error("memory access out of bounds at address {address:#06X}")]
    MemoryOutOfBounds { address: u16 },

    #[error("call with all stack slots in use")]
    StackOverflow,

    #[error("return with an empty call stack")]
    StackUnderflow,

    #[error("unknown opcode {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("failed to read ROM")]
    Io(#[from] std::io::Error),
}
