use crate::consts::MEMORY_SIZE;
use crate::parser::Instruction;
use crate::{Error, Result};

/// One addressable slot.
///
/// Program words are stored pre-decoded at their load address; the byte
/// after such a cell is shadowed by the word's low byte until something
/// writes over either half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Byte(u8),
    Word(Instruction),
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Byte(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    cells: Vec<Cell>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            cells: vec![Cell::default(); MEMORY_SIZE],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check(&self, address: usize) -> Result<usize> {
        if address < self.cells.len() {
            Ok(address)
        } else {
            Err(Error::AddressOutOfRange { address })
        }
    }

    /// The raw cell at `address`, without resolving shadowed bytes.
    pub fn get(&self, address: usize) -> Result<Cell> {
        Ok(self.cells[self.check(address)?])
    }

    /// Byte view of memory, valid for any address whether it was filled by
    /// a program load or by data writes.
    pub fn read_byte(&self, address: usize) -> Result<u8> {
        let address = self.check(address)?;

        match self.cells[address] {
            Cell::Word(inst) => Ok(inst.high_byte()),
            Cell::Byte(value) => match address.checked_sub(1).map(|prev| self.cells[prev]) {
                Some(Cell::Word(prev)) => Ok(prev.low_byte()),
                _ => Ok(value),
            },
        }
    }

    pub fn read_range(&self, start: usize, len: usize) -> Result<Vec<u8>> {
        (start..start + len)
            .map(|address| self.read_byte(address))
            .collect()
    }

    /// Big-endian word made of the bytes at `address` and `address + 1`.
    pub fn read_word(&self, address: usize) -> Result<u16> {
        let high = self.read_byte(address)?;
        let low = self.read_byte(address + 1)?;
        Ok(u16::from_be_bytes([high, low]))
    }

    /// Instruction at `address`. Pre-decoded cells are returned as is,
    /// anything else is reassembled from bytes and decoded.
    pub fn fetch(&self, address: usize) -> Result<Instruction> {
        match self.get(address)? {
            Cell::Word(inst) => Ok(inst),
            Cell::Byte(_) => self.read_word(address).map(Instruction::new),
        }
    }

    /// Stores a plain byte, clamping `value` to `0..=255`.
    pub fn write_byte(&mut self, address: usize, value: i32) -> Result<()> {
        let address = self.check(address)?;

        if let Some(prev) = address.checked_sub(1) {
            self.split_word(prev);
        }
        self.split_word(address);

        self.cells[address] = Cell::Byte(value.clamp(0, 0xFF) as u8);
        Ok(())
    }

    /// Replaces a decoded word at `address` with its two plain bytes.
    fn split_word(&mut self, address: usize) {
        if let Cell::Word(inst) = self.cells[address] {
            self.cells[address] = Cell::Byte(inst.high_byte());
            if let Some(Cell::Byte(_)) = self.cells.get(address + 1) {
                self.cells[address + 1] = Cell::Byte(inst.low_byte());
            }
        }
    }

    pub fn store_instruction(&mut self, address: usize, inst: Instruction) -> Result<()> {
        let address = self.check(address)?;
        self.check(address + 1)?;

        // Any word overlapping either half of the new one loses its decode.
        if let Some(prev) = address.checked_sub(1) {
            self.split_word(prev);
        }
        self.split_word(address);
        self.split_word(address + 1);

        self.cells[address] = Cell::Word(inst);
        self.cells[address + 1] = Cell::Byte(inst.low_byte());
        Ok(())
    }

    /// Stores `program` at `base + 2 * index`. Nothing is written unless the
    /// whole image fits.
    pub fn load(&mut self, base: u16, program: &[Instruction]) -> Result<()> {
        let start = base as usize;
        let end = start + 2 * program.len();
        if end > self.cells.len() {
            return Err(Error::ProgramTooLarge {
                base,
                len: program.len(),
            });
        }

        for (index, inst) in program.iter().enumerate() {
            self.store_instruction(start + 2 * index, *inst)?;
        }
        Ok(())
    }
}
