use std::fmt;

use crate::consts::REGISTER_COUNT;

/// General purpose registers V0..VF. Writes wrap modulo 256.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Registers {
    values: [u8; REGISTER_COUNT],
}

impl Registers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics if `index` is not a register.
    pub fn get(&self, index: usize) -> u8 {
        self.values[index]
    }

    pub fn set(&mut self, index: usize, value: i32) {
        self.values[index] = value.rem_euclid(0x100) as u8;
    }

    pub fn reset(&mut self) {
        self.values = [0; REGISTER_COUNT];
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, value) in self.values.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{index:#x} = {value}")?;
        }
        Ok(())
    }
}
