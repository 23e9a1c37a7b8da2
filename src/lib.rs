pub mod config;
pub mod consts;
pub mod display;
pub mod interpreter;
pub mod memory;
pub mod parser;
pub mod registers;
pub mod stack;
pub mod state;

pub use config::{Config, Quirks};
pub use interpreter::Interpreter;
pub use parser::{Instruction, Opcode};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("memory access out of range at address {address:#06X}")]
    AddressOutOfRange { address: usize },

    #[error("unknown opcode: {0:#06X}")]
    UnknownOpcode(u16),

    #[error("stack overflow: call depth exceeds {}", consts::STACK_DEPTH)]
    StackOverflow,

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("unimplemented operation {opcode:?} ({word:#06X})")]
    Unimplemented { word: u16, opcode: Opcode },

    #[error("program of {len} words does not fit in memory at base {base:#06X}")]
    ProgramTooLarge { base: u16, len: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
