use chip8vm::display::Display;
use chip8vm::memory::Memory;
use chip8vm::registers::Registers;
use chip8vm::stack::CallStack;
use chip8vm::{Error, Instruction, Opcode};
use proptest::prelude::*;

proptest! {
    #[test]
    fn register_writes_wrap_modulo_256(index in 0usize..16, value in any::<i32>()) {
        let mut registers = Registers::new();
        registers.set(index, value);
        prop_assert_eq!(registers.get(index) as i32, value.rem_euclid(256));
    }

    #[test]
    fn call_stack_is_lifo(addresses in prop::collection::vec(any::<u16>(), 0..=16)) {
        let mut stack = CallStack::new();
        for &address in &addresses {
            stack.push(address).unwrap();
        }
        for &address in addresses.iter().rev() {
            prop_assert_eq!(stack.pop().unwrap(), address);
        }
        prop_assert!(matches!(stack.pop(), Err(Error::StackUnderflow)));
    }

    #[test]
    fn seventeenth_push_overflows(addresses in prop::collection::vec(any::<u16>(), 16)) {
        let mut stack = CallStack::new();
        for &address in &addresses {
            stack.push(address).unwrap();
        }
        prop_assert!(matches!(stack.push(0), Err(Error::StackOverflow)));
    }

    #[test]
    fn on_screen_pixels_round_trip(x in 0usize..64, y in 0usize..32) {
        let mut display = Display::new();
        display.set_pixel(x, y, 1);
        prop_assert_eq!(display.get_pixel(x, y), 1);
    }

    #[test]
    fn off_screen_pixels_read_zero(x in 64usize..10_000, y in any::<u16>()) {
        let mut display = Display::new();
        display.set_pixel(x, y as usize, 1);
        prop_assert_eq!(display.get_pixel(x, y as usize), 0);
        prop_assert!(display.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn loaded_and_written_words_read_the_same(word in any::<u16>(), slot in 0usize..2046) {
        let address = slot * 2;
        let [high, low] = word.to_be_bytes();

        let mut loaded = Memory::new();
        loaded.store_instruction(address, Instruction::new(word)).unwrap();

        let mut written = Memory::new();
        written.write_byte(address, high as i32).unwrap();
        written.write_byte(address + 1, low as i32).unwrap();

        for memory in [&loaded, &written] {
            prop_assert_eq!(memory.read_byte(address).unwrap(), high);
            prop_assert_eq!(memory.read_byte(address + 1).unwrap(), low);
            prop_assert_eq!(memory.fetch(address).unwrap().word(), word);
        }
    }

    #[test]
    fn decoding_is_deterministic(word in any::<u16>()) {
        let opcode = Opcode::decode(word);
        prop_assert_eq!(opcode, Opcode::decode(word));
        if let Opcode::Unknown(raw) = opcode {
            prop_assert_eq!(raw, word);
        }
    }
}
