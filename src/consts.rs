pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

/// Addressable bytes, `0..MEMORY_SIZE`.
pub const MEMORY_SIZE: usize = 0xFFF;

/// Default load address of a program image.
pub const INITIAL_PC: u16 = 0x200;

pub const REGISTER_COUNT: usize = 16;
pub const STACK_DEPTH: usize = 16;

/// VF doubles as carry, borrow, shifted-out bit and collision flag.
pub const FLAG_REGISTER: usize = 0xF;

/// Instruction pointer value the reference driver treats as program exit.
pub const EXIT_ADDRESS: u16 = 0x10;
