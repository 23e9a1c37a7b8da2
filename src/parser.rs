use std::fmt;
use std::path::Path;

use crate::Result;

/// Operation selected by an instruction word, with operands stripped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// 0NNN - call machine code routine at NNN (ignored)
    SysCall,
    /// 00E0 - clear screen
    ClearScreen,
    /// 00EE - return from subroutine
    ReturnFromSubroutine,
    /// 1NNN - jump to NNN
    Jump,
    /// 2NNN - call subroutine at NNN
    Call,
    /// 3XKK - skip next if VX equals KK
    SkipIfEqualByte,
    /// 4XKK - skip next if VX does not equal KK
    SkipIfNotEqualByte,
    /// 5XY0 - skip next if VX equals VY
    SkipIfRegistersEqual,
    /// 6XKK - set VX to KK
    SetRegisterToValue,
    /// 7XKK - add KK to VX
    AddToRegister,
    /// 8XY0 - set VX to value of VY
    SetRegisterToRegisterValue,
    /// 8XY1 - set VX | VY
    RegistersBitwiseOr,
    /// 8XY2 - set VX & VY
    RegistersBitwiseAnd,
    /// 8XY3 - set VX ^ VY
    RegistersBitwiseXor,
    /// 8XY4 - add VY to VX, VF is the carry
    RegistersSumWithCarry,
    /// 8XY5 - VX = VX - VY, VF is set when no borrow happened
    SubtractRegisterFromRegisterValue,
    /// 8XY6 - VX >>= 1, shifted out bit stored in VF
    ShiftRegisterBitsRight,
    /// 8XY7 - VX = VY - VX, VF is set when no borrow happened
    SubtractRegisterValueFromRegister,
    /// 8XYE - VX <<= 1, shifted out bit stored in VF
    ShiftRegisterBitsLeft,
    /// 9XY0 - skip next if VX does not equal VY
    SkipIfRegistersNotEqual,
    /// ANNN - set I to NNN
    SetIndexRegisterToValue,
    /// BNNN - jump to V0 + NNN
    JumpByValue,
    /// CXKK - set VX to a random byte & KK
    SetRegisterToRandAndValue,
    /// DXYN - draw a sprite
    DrawSprite,
    /// EX9E - skip next if key VX is pressed
    SkipIfKeyPressed,
    /// EXA1 - skip next if key VX is not pressed
    SkipIfKeyNotPressed,
    /// FX07 - set VX to delay timer value
    SetRegisterToDelayTimerValue,
    /// FX0A - wait for a key press, store it in VX
    WaitForKeyPress,
    /// FX15 - set delay timer to VX
    SetDelayTimerToRegisterValue,
    /// FX18 - set sound timer to VX
    SetSoundTimerToRegisterValue,
    /// FX1E - add VX to I
    AddRegisterToIndexRegister,
    /// FX29 - set I to location of sprite for character in VX
    SetIndexRegisterToSpriteForRegister,
    /// FX33 - store binary coded decimal of VX at I, I+1, I+2
    StoreBinaryCodedDecimalAtIndexRegisterValue,
    /// FX55 - dump registers V0 to VX in memory, starting from I
    DumpRegistersToMemoryAtIndexRegister,
    /// FX65 - load memory starting from I into V0 to VX
    LoadMemoryToRegistersAtIndexRegister,
    /// The word matched no branch of the opcode tree.
    Unknown(u16),
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Nibble(u8),
    Any,
}

enum Node {
    Leaf(Opcode),
    Branch(&'static [(Key, Node)]),
}

use Key::{Any, Nibble};
use Node::{Branch, Leaf};

// Walked one nibble per level, most significant first. An exact nibble
// match always wins over `Any` at the same level.
static SYNTAX: Node = Branch(&[
    (
        Nibble(0x0),
        Branch(&[
            (
                Nibble(0x0),
                Branch(&[
                    (
                        Nibble(0xE),
                        Branch(&[
                            (Nibble(0x0), Leaf(Opcode::ClearScreen)),
                            (Nibble(0xE), Leaf(Opcode::ReturnFromSubroutine)),
                        ]),
                    ),
                    (Any, Branch(&[(Any, Leaf(Opcode::SysCall))])),
                ]),
            ),
            (Any, Leaf(Opcode::SysCall)),
        ]),
    ),
    (Nibble(0x1), Leaf(Opcode::Jump)),
    (Nibble(0x2), Leaf(Opcode::Call)),
    (Nibble(0x3), Leaf(Opcode::SkipIfEqualByte)),
    (Nibble(0x4), Leaf(Opcode::SkipIfNotEqualByte)),
    (Nibble(0x5), Leaf(Opcode::SkipIfRegistersEqual)),
    (Nibble(0x6), Leaf(Opcode::SetRegisterToValue)),
    (Nibble(0x7), Leaf(Opcode::AddToRegister)),
    (
        Nibble(0x8),
        Branch(&[(
            Any,
            Branch(&[(
                Any,
                Branch(&[
                    (Nibble(0x0), Leaf(Opcode::SetRegisterToRegisterValue)),
                    (Nibble(0x1), Leaf(Opcode::RegistersBitwiseOr)),
                    (Nibble(0x2), Leaf(Opcode::RegistersBitwiseAnd)),
                    (Nibble(0x3), Leaf(Opcode::RegistersBitwiseXor)),
                    (Nibble(0x4), Leaf(Opcode::RegistersSumWithCarry)),
                    (Nibble(0x5), Leaf(Opcode::SubtractRegisterFromRegisterValue)),
                    (Nibble(0x6), Leaf(Opcode::ShiftRegisterBitsRight)),
                    (Nibble(0x7), Leaf(Opcode::SubtractRegisterValueFromRegister)),
                    (Nibble(0xE), Leaf(Opcode::ShiftRegisterBitsLeft)),
                ]),
            )]),
        )]),
    ),
    (Nibble(0x9), Leaf(Opcode::SkipIfRegistersNotEqual)),
    (Nibble(0xA), Leaf(Opcode::SetIndexRegisterToValue)),
    (Nibble(0xB), Leaf(Opcode::JumpByValue)),
    (Nibble(0xC), Leaf(Opcode::SetRegisterToRandAndValue)),
    (Nibble(0xD), Leaf(Opcode::DrawSprite)),
    (
        Nibble(0xE),
        Branch(&[(
            Any,
            Branch(&[
                (Nibble(0x9), Leaf(Opcode::SkipIfKeyPressed)),
                (Nibble(0xA), Leaf(Opcode::SkipIfKeyNotPressed)),
            ]),
        )]),
    ),
    (
        Nibble(0xF),
        Branch(&[(
            Any,
            Branch(&[
                (
                    Nibble(0x0),
                    Branch(&[
                        (Nibble(0x7), Leaf(Opcode::SetRegisterToDelayTimerValue)),
                        (Nibble(0xA), Leaf(Opcode::WaitForKeyPress)),
                    ]),
                ),
                (
                    Nibble(0x1),
                    Branch(&[
                        (Nibble(0x5), Leaf(Opcode::SetDelayTimerToRegisterValue)),
                        (Nibble(0x8), Leaf(Opcode::SetSoundTimerToRegisterValue)),
                        (Nibble(0xE), Leaf(Opcode::AddRegisterToIndexRegister)),
                    ]),
                ),
                (Nibble(0x2), Leaf(Opcode::SetIndexRegisterToSpriteForRegister)),
                (
                    Nibble(0x3),
                    Leaf(Opcode::StoreBinaryCodedDecimalAtIndexRegisterValue),
                ),
                (Nibble(0x5), Leaf(Opcode::DumpRegistersToMemoryAtIndexRegister)),
                (Nibble(0x6), Leaf(Opcode::LoadMemoryToRegistersAtIndexRegister)),
            ]),
        )]),
    ),
]);

impl Opcode {
    /// Searches the opcode tree for `word`. Returns [`Opcode::Unknown`]
    /// carrying the raw word when no branch matches.
    pub fn decode(word: u16) -> Self {
        let mut node = &SYNTAX;

        for depth in 0..4 {
            let children = match node {
                Leaf(opcode) => return *opcode,
                Branch(children) => children,
            };

            let nibble = ((word >> (12 - 4 * depth)) & 0xF) as u8;
            let next = children
                .iter()
                .find(|(key, _)| *key == Nibble(nibble))
                .or_else(|| children.iter().find(|(key, _)| *key == Any));

            match next {
                Some((_, child)) => node = child,
                None => return Opcode::Unknown(word),
            }
        }

        match node {
            Leaf(opcode) => *opcode,
            Branch(_) => Opcode::Unknown(word),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Opcode::Unknown(_))
    }
}

/// A 16-bit instruction word together with its decoded opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    word: u16,
    opcode: Opcode,
}

impl Instruction {
    pub fn new(word: u16) -> Self {
        Instruction {
            word,
            opcode: Opcode::decode(word),
        }
    }

    pub fn word(&self) -> u16 {
        self.word
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Low 12 bits, an address.
    pub fn nnn(&self) -> u16 {
        self.word & 0x0FFF
    }

    /// Low 4 bits, a count.
    pub fn n(&self) -> u8 {
        (self.word & 0x000F) as u8
    }

    /// Bits 8-11, a register index.
    pub fn x(&self) -> usize {
        ((self.word & 0x0F00) >> 8) as usize
    }

    /// Bits 4-7, a register index.
    pub fn y(&self) -> usize {
        ((self.word & 0x00F0) >> 4) as usize
    }

    /// Low 8 bits, an immediate byte.
    pub fn kk(&self) -> u8 {
        (self.word & 0x00FF) as u8
    }

    pub fn high_byte(&self) -> u8 {
        (self.word >> 8) as u8
    }

    pub fn low_byte(&self) -> u8 {
        self.word as u8
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction::new(word)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Opcode: {:?}, Instruction: {:#06X}, NNN: {:#05X}, N: {:#X}, X: {:#X}, Y: {:#X}, KK: {:#04X}",
            self.opcode,
            self.word,
            self.nnn(),
            self.n(),
            self.x(),
            self.y(),
            self.kk()
        )
    }
}

/// Groups a program image into big-endian words. A trailing odd byte is dropped.
pub fn parse_program(bytes: &[u8]) -> Vec<Instruction> {
    bytes
        .chunks_exact(2)
        .map(|pair| Instruction::new(u16::from_be_bytes([pair[0], pair[1]])))
        .collect()
}

pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Instruction>> {
    let bytes = std::fs::read(path.as_ref())?;
    tracing::debug!(
        path = %path.as_ref().display(),
        bytes = bytes.len(),
        "read program image"
    );
    Ok(parse_program(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_words_decode_to_their_opcodes() {
        let table = [
            (0x0123, Opcode::SysCall),
            (0x00FF, Opcode::SysCall),
            (0x00E0, Opcode::ClearScreen),
            (0x00EE, Opcode::ReturnFromSubroutine),
            (0x1ABC, Opcode::Jump),
            (0x2300, Opcode::Call),
            (0x3A12, Opcode::SkipIfEqualByte),
            (0x4A12, Opcode::SkipIfNotEqualByte),
            (0x5AB0, Opcode::SkipIfRegistersEqual),
            (0x6005, Opcode::SetRegisterToValue),
            (0x7003, Opcode::AddToRegister),
            (0x8AB0, Opcode::SetRegisterToRegisterValue),
            (0x8AB1, Opcode::RegistersBitwiseOr),
            (0x8AB2, Opcode::RegistersBitwiseAnd),
            (0x8AB3, Opcode::RegistersBitwiseXor),
            (0x8AB4, Opcode::RegistersSumWithCarry),
            (0x8AB5, Opcode::SubtractRegisterFromRegisterValue),
            (0x8AB6, Opcode::ShiftRegisterBitsRight),
            (0x8AB7, Opcode::SubtractRegisterValueFromRegister),
            (0x8ABE, Opcode::ShiftRegisterBitsLeft),
            (0x9AB0, Opcode::SkipIfRegistersNotEqual),
            (0xA123, Opcode::SetIndexRegisterToValue),
            (0xB123, Opcode::JumpByValue),
            (0xC1FF, Opcode::SetRegisterToRandAndValue),
            (0xD125, Opcode::DrawSprite),
            (0xE19E, Opcode::SkipIfKeyPressed),
            (0xE1A1, Opcode::SkipIfKeyNotPressed),
            (0xF107, Opcode::SetRegisterToDelayTimerValue),
            (0xF10A, Opcode::WaitForKeyPress),
            (0xF115, Opcode::SetDelayTimerToRegisterValue),
            (0xF118, Opcode::SetSoundTimerToRegisterValue),
            (0xF11E, Opcode::AddRegisterToIndexRegister),
            (0xF129, Opcode::SetIndexRegisterToSpriteForRegister),
            (0xF133, Opcode::StoreBinaryCodedDecimalAtIndexRegisterValue),
            (0xF155, Opcode::DumpRegistersToMemoryAtIndexRegister),
            (0xF165, Opcode::LoadMemoryToRegistersAtIndexRegister),
        ];

        for (word, expected) in table {
            assert_eq!(Opcode::decode(word), expected, "word {word:#06X}");
        }
    }

    #[test]
    fn unmatched_words_return_the_word_as_sentinel() {
        for word in [0x00E1, 0x00E5, 0x8AB8, 0x8ABF, 0xE0FF, 0xF0FF, 0xF019, 0xF100] {
            assert_eq!(Opcode::decode(word), Opcode::Unknown(word));
        }
    }

    #[test]
    fn exact_branch_is_not_backtracked_into_wildcard() {
        // 0x00E? commits to the clear/return branch and never falls back to SysCall.
        assert!(Opcode::decode(0x00E7).is_unknown());
        assert_eq!(Opcode::decode(0x00D7), Opcode::SysCall);
    }

    #[test]
    fn decoding_is_deterministic() {
        for word in [0x0000, 0x1234, 0x8AB4, 0xFFFF, 0xF065] {
            assert_eq!(Opcode::decode(word), Opcode::decode(word));
        }
    }

    #[test]
    fn operand_fields() {
        let inst = Instruction::new(0xD4A7);
        assert_eq!(inst.opcode(), Opcode::DrawSprite);
        assert_eq!(inst.nnn(), 0x4A7);
        assert_eq!(inst.n(), 0x7);
        assert_eq!(inst.x(), 0x4);
        assert_eq!(inst.y(), 0xA);
        assert_eq!(inst.kk(), 0xA7);
        assert_eq!(inst.high_byte(), 0xD4);
        assert_eq!(inst.low_byte(), 0xA7);
    }

    #[test]
    fn parse_program_drops_trailing_odd_byte() {
        let program = parse_program(&[0x60, 0x05, 0x70, 0x03, 0xFF]);
        let words: Vec<u16> = program.iter().map(Instruction::word).collect();
        assert_eq!(words, vec![0x6005, 0x7003]);
    }

    #[test]
    fn display_lists_every_field() {
        let text = Instruction::new(0x8AB4).to_string();
        assert!(text.contains("RegistersSumWithCarry"));
        assert!(text.contains("0x8AB4"));
        assert!(text.contains("X: 0xA"));
        assert!(text.contains("Y: 0xB"));
    }
}
