use crate::display::Display;
use crate::memory::Memory;
use crate::registers::Registers;
use crate::stack::CallStack;

/// Everything an instruction can observe or change.
#[derive(Debug, Clone)]
pub struct State {
    pub memory: Memory,
    pub registers: Registers,
    pub stack: CallStack,
    pub display: Display,
    pub pc: u16,
    pub index_register: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
    /// Set by a draw in the current cycle, cleared when the next one starts.
    pub drawing: bool,
}

impl State {
    pub fn new(pc: u16) -> Self {
        State {
            memory: Memory::new(),
            registers: Registers::new(),
            stack: CallStack::new(),
            display: Display::new(),
            pc,
            index_register: 0,
            delay_timer: 0,
            sound_timer: 0,
            drawing: false,
        }
    }

    /// Back to power-on values, keeping memory.
    pub fn reset(&mut self, pc: u16) {
        self.registers.reset();
        self.stack.reset();
        self.display.reset();
        self.pc = pc;
        self.index_register = 0;
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.drawing = false;
    }

    pub fn update_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
