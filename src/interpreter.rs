use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::consts::{FLAG_REGISTER, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::display::Display;
use crate::memory::Memory;
use crate::parser::{self, Instruction, Opcode};
use crate::registers::Registers;
use crate::stack::CallStack;
use crate::state::State;
use crate::{Error, Result};

/// Where the instruction pointer goes once an instruction has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
}

pub struct Interpreter {
    state: State,
    config: Config,
    rng: StdRng,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_rng(&mut rand::rng()))
    }

    /// Uses `rng` as the source of CXKK random bytes.
    pub fn with_rng(config: Config, rng: StdRng) -> Self {
        Interpreter {
            state: State::new(config.base_address),
            config,
            rng,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stores pre-decoded words at the configured base address.
    pub fn load_program(&mut self, program: &[Instruction]) -> Result<()> {
        self.state.memory.load(self.config.base_address, program)?;
        tracing::debug!(
            base = format_args!("{:#06X}", self.config.base_address),
            words = program.len(),
            "program loaded"
        );
        Ok(())
    }

    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        self.load_program(&parser::parse_program(rom))
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.load_program(&parser::parse_file(path)?)
    }

    /// Reinitializes everything but memory.
    pub fn reset(&mut self) {
        self.state.reset(self.config.base_address);
        tracing::debug!("machine reset");
    }

    /// Runs `n_cycles` fetch-decode-execute cycles, stopping at the first
    /// fatal condition.
    pub fn step(&mut self, n_cycles: usize) -> Result<()> {
        for _ in 0..n_cycles {
            self.cycle()?;
        }
        Ok(())
    }

    fn cycle(&mut self) -> Result<()> {
        let pc = self.state.pc;
        self.state.drawing = false;
        let instruction = self.state.memory.fetch(pc as usize)?;

        tracing::trace!(
            pc = format_args!("{pc:#06X}"),
            word = format_args!("{:#06X}", instruction.word()),
            opcode = ?instruction.opcode(),
            "execute"
        );

        let flow = match self.execute(instruction) {
            Ok(flow) => flow,
            Err(err) => {
                tracing::warn!(pc = format_args!("{pc:#06X}"), %err, "cycle aborted");
                return Err(err);
            }
        };

        self.state.pc = match flow {
            Flow::Next => pc.wrapping_add(2),
            Flow::Skip => pc.wrapping_add(4),
            Flow::Jump(address) => address,
        };

        self.state.update_timers();
        Ok(())
    }

    fn execute(&mut self, instruction: Instruction) -> Result<Flow> {
        let state = &mut self.state;
        let x = instruction.x();
        let y = instruction.y();
        let kk = instruction.kk();
        let nnn = instruction.nnn();

        let vx = state.registers.get(x) as i32;
        let vy = state.registers.get(y) as i32;

        let flow = match instruction.opcode() {
            Opcode::SysCall => Flow::Next,
            Opcode::ClearScreen => {
                state.display.reset();
                Flow::Next
            }
            Opcode::ReturnFromSubroutine => Flow::Jump(state.stack.pop()?),
            Opcode::Jump => {
                // Odd targets are nudged onto the next word boundary.
                if nnn % 2 != 0 {
                    Flow::Jump(nnn + 1)
                } else {
                    Flow::Jump(nnn)
                }
            }
            Opcode::Call => {
                state.stack.push(state.pc.wrapping_add(2))?;
                Flow::Jump(nnn)
            }
            Opcode::SkipIfEqualByte => skip_if(vx == kk as i32),
            Opcode::SkipIfNotEqualByte => skip_if(vx != kk as i32),
            Opcode::SkipIfRegistersEqual => skip_if(vx == vy),
            Opcode::SkipIfRegistersNotEqual => skip_if(vx != vy),
            Opcode::SetRegisterToValue => {
                state.registers.set(x, kk as i32);
                Flow::Next
            }
            Opcode::AddToRegister => {
                state.registers.set(x, vx + kk as i32);
                Flow::Next
            }
            Opcode::SetRegisterToRegisterValue => {
                state.registers.set(x, vy);
                Flow::Next
            }
            Opcode::RegistersBitwiseOr => {
                state.registers.set(x, vx | vy);
                Flow::Next
            }
            Opcode::RegistersBitwiseAnd => {
                state.registers.set(x, vx & vy);
                Flow::Next
            }
            Opcode::RegistersBitwiseXor => {
                state.registers.set(x, vx ^ vy);
                Flow::Next
            }
            // Arithmetic writes VX first and VF last, so VF holds the flag
            // when X is F.
            Opcode::RegistersSumWithCarry => {
                let sum = vx + vy;
                let carry = if self.config.quirks.legacy_carry {
                    sum % 255 > 0
                } else {
                    sum > 0xFF
                };
                state.registers.set(x, sum);
                state.registers.set(FLAG_REGISTER, carry as i32);
                Flow::Next
            }
            Opcode::SubtractRegisterFromRegisterValue => {
                state.registers.set(x, vx - vy);
                state.registers.set(FLAG_REGISTER, (vx > vy) as i32);
                Flow::Next
            }
            Opcode::SubtractRegisterValueFromRegister => {
                state.registers.set(x, vy - vx);
                state.registers.set(FLAG_REGISTER, (vy > vx) as i32);
                Flow::Next
            }
            Opcode::ShiftRegisterBitsRight => {
                state.registers.set(x, vx >> 1);
                state.registers.set(FLAG_REGISTER, vx & 1);
                Flow::Next
            }
            Opcode::ShiftRegisterBitsLeft => {
                state.registers.set(x, vx << 1);
                state.registers.set(FLAG_REGISTER, vx >> 7);
                Flow::Next
            }
            Opcode::SetIndexRegisterToValue => {
                state.index_register = nnn;
                Flow::Next
            }
            Opcode::JumpByValue => Flow::Jump(nnn + state.registers.get(0) as u16),
            Opcode::SetRegisterToRandAndValue => {
                let n: u8 = self.rng.random();
                state.registers.set(x, (n & kk) as i32);
                Flow::Next
            }
            Opcode::DrawSprite => {
                draw_sprite(state, vx as usize, vy as usize, instruction.n() as usize)?;
                Flow::Next
            }
            Opcode::SetRegisterToDelayTimerValue => {
                state.registers.set(x, state.delay_timer as i32);
                Flow::Next
            }
            Opcode::SetDelayTimerToRegisterValue => {
                state.delay_timer = vx as u8;
                Flow::Next
            }
            Opcode::SetSoundTimerToRegisterValue => {
                state.sound_timer = vx as u8;
                Flow::Next
            }
            Opcode::AddRegisterToIndexRegister => {
                state.index_register = state.index_register.wrapping_add(vx as u16);
                Flow::Next
            }
            Opcode::DumpRegistersToMemoryAtIndexRegister => {
                let base = state.index_register as usize;
                for ri in 0..=x {
                    state
                        .memory
                        .write_byte(base + ri, state.registers.get(ri) as i32)?;
                }
                Flow::Next
            }
            Opcode::LoadMemoryToRegistersAtIndexRegister => {
                let base = state.index_register as usize;
                for ri in 0..=x {
                    let value = state.memory.read_byte(base + ri)?;
                    state.registers.set(ri, value as i32);
                }
                Flow::Next
            }
            opcode @ (Opcode::SkipIfKeyPressed
            | Opcode::SkipIfKeyNotPressed
            | Opcode::WaitForKeyPress
            | Opcode::SetIndexRegisterToSpriteForRegister
            | Opcode::StoreBinaryCodedDecimalAtIndexRegisterValue) => {
                return Err(Error::Unimplemented {
                    word: instruction.word(),
                    opcode,
                });
            }
            Opcode::Unknown(word) => return Err(Error::UnknownOpcode(word)),
        };

        Ok(flow)
    }

    pub fn is_drawing(&self) -> bool {
        self.state.drawing
    }

    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.state.display.get_pixel(x, y)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) {
        self.state.display.set_pixel(x, y, value);
    }

    pub fn display(&self) -> &Display {
        &self.state.display
    }

    pub fn register(&self, index: usize) -> u8 {
        self.state.registers.get(index)
    }

    pub fn registers(&self) -> &Registers {
        &self.state.registers
    }

    pub fn stack(&self) -> &CallStack {
        &self.state.stack
    }

    pub fn pc(&self) -> u16 {
        self.state.pc
    }

    pub fn set_pc(&mut self, address: u16) {
        self.state.pc = address;
    }

    pub fn index_register(&self) -> u16 {
        self.state.index_register
    }

    pub fn delay_timer(&self) -> u8 {
        self.state.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.state.sound_timer
    }

    pub fn memory(&self) -> &Memory {
        &self.state.memory
    }

    pub fn memory_mut(&mut self) -> &mut Memory {
        &mut self.state.memory
    }

    /// The instruction the next cycle will execute.
    pub fn current_instruction(&self) -> Result<Instruction> {
        self.state.memory.fetch(self.state.pc as usize)
    }
}

fn skip_if(condition: bool) -> Flow {
    if condition { Flow::Skip } else { Flow::Next }
}

/// XORs an `rows`-high sprite from memory at I onto the display. VF ends up
/// 1 when any lit pixel was switched off.
fn draw_sprite(state: &mut State, vx: usize, vy: usize, rows: usize) -> Result<()> {
    let sprite = state
        .memory
        .read_range(state.index_register as usize, rows)?;

    let x = vx % SCREEN_WIDTH;
    let y = vy % SCREEN_HEIGHT;

    state.registers.set(FLAG_REGISTER, 0);

    for (yo, data) in sprite.iter().enumerate() {
        for xo in 0..8 {
            if (data >> (7 - xo)) & 1 == 0 {
                continue;
            }

            if state.display.get_pixel(x + xo, y + yo) == 1 {
                state.registers.set(FLAG_REGISTER, 1);
                state.display.set_pixel(x + xo, y + yo, 0);
            } else {
                state.display.set_pixel(x + xo, y + yo, 1);
            }
        }
    }

    state.drawing = true;
    Ok(())
}
