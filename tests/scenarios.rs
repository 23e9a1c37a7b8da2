use chip8vm::consts::INITIAL_PC;
use chip8vm::{Error, Instruction, Interpreter};

fn load(interpreter: &mut Interpreter, address: u16, words: &[u16]) {
    for (index, word) in words.iter().enumerate() {
        interpreter
            .memory_mut()
            .store_instruction(address as usize + 2 * index, Instruction::new(*word))
            .unwrap();
    }
}

#[test]
fn set_then_add_immediate() {
    let mut interpreter = Interpreter::new();
    interpreter.load_rom(&[0x60, 0x05, 0x70, 0x03]).unwrap();

    interpreter.step(2).unwrap();

    assert_eq!(interpreter.register(0), 8);
    assert_eq!(interpreter.pc(), 0x204);
}

#[test]
fn clear_screen_turns_pixels_off() {
    let mut interpreter = Interpreter::new();
    interpreter.load_rom(&[0x00, 0xE0]).unwrap();
    interpreter.set_pixel(0, 0, 1);

    interpreter.step(1).unwrap();

    assert_eq!(interpreter.pixel(0, 0), 0);
    assert!(!interpreter.is_drawing());
}

#[test]
fn call_then_return() {
    let mut interpreter = Interpreter::new();
    load(&mut interpreter, INITIAL_PC, &[0x2300]);
    load(&mut interpreter, 0x300, &[0x00EE]);

    interpreter.step(2).unwrap();

    assert_eq!(interpreter.pc(), 0x202);
    assert!(interpreter.stack().is_empty());
}

#[test]
fn subroutine_draws_a_sprite_in_a_loop() {
    // 0x200: I = 0x20C, V0 = 0, V1 = 0
    // 0x206: call 0x20E
    // 0x208: V0 += 8, jump 0x206
    // 0x20C: sprite byte 0x80 / filler
    // 0x20E: draw V0,V1 height 1; return
    let mut interpreter = Interpreter::new();
    load(
        &mut interpreter,
        INITIAL_PC,
        &[0xA20C, 0x6000, 0x6100, 0x220E, 0x7008, 0x1206, 0x8000, 0xD011, 0x00EE],
    );

    interpreter.step(5).unwrap();
    assert!(interpreter.is_drawing());
    assert_eq!(interpreter.pixel(0, 0), 1);

    interpreter.step(1).unwrap();
    assert_eq!(interpreter.pc(), 0x208);
    interpreter.step(3).unwrap();
    assert_eq!(interpreter.pc(), 0x20E);
    interpreter.step(2).unwrap();
    assert_eq!(interpreter.pixel(8, 0), 1);
    assert_eq!(interpreter.register(0xF), 0);
}

#[test]
fn failed_cycle_leaves_pointer_and_timers() {
    let mut interpreter = Interpreter::new();
    interpreter
        .load_rom(&[0x60, 0x05, 0xF0, 0x15, 0xF0, 0x33])
        .unwrap();

    interpreter.step(2).unwrap();
    assert_eq!(interpreter.delay_timer(), 4);

    let err = interpreter.step(3).unwrap_err();
    assert!(matches!(err, Error::Unimplemented { word: 0xF033, .. }));
    assert_eq!(interpreter.pc(), 0x204);
    assert_eq!(interpreter.delay_timer(), 4);
}

#[test]
fn fetch_outside_memory_is_out_of_range() {
    let mut interpreter = Interpreter::new();
    interpreter.set_pc(0x0FFE);

    assert!(matches!(
        interpreter.step(1),
        Err(Error::AddressOutOfRange { address: 0x0FFF })
    ));
}

#[test]
fn data_fetched_as_code_is_an_unknown_opcode() {
    let mut interpreter = Interpreter::new();
    interpreter.memory_mut().write_byte(0x200, 0xFF).unwrap();
    interpreter.memory_mut().write_byte(0x201, 0xFF).unwrap();

    assert!(matches!(
        interpreter.step(1),
        Err(Error::UnknownOpcode(0xFFFF))
    ));
}
