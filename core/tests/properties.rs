use emu8_core::Chip8;
use proptest::prelude::*;

fn run(program: &[u8], steps: usize) -> Chip8 {
    let mut chip8 = Chip8::new().with_seed(0x8);
    chip8.load_rom(program).unwrap();
    for _ in 0..steps {
        chip8.step().unwrap();
    }
    chip8
}

proptest! {
    #[test]
    fn add_registers_carries(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V0, vx; LD V1, vy; ADD V0, V1
        let chip8 = run(&[0x60, vx, 0x61, vy, 0x80, 0x14], 3);
        let sum = u16::from(vx) + u16::from(vy);
        prop_assert_eq!(chip8.state().v[0x0], (sum % 256) as u8);
        prop_assert_eq!(chip8.state().v[0xF], u8::from(sum > 255));
    }

    #[test]
    fn sub_registers_borrows(vx in any::<u8>(), vy in any::<u8>()) {
        // LD V0, vx; LD V1, vy; SUB V0, V1
        let chip8 = run(&[0x60, vx, 0x61, vy, 0x80, 0x15], 3);
        prop_assert_eq!(chip8.state().v[0x0], vx.wrapping_sub(vy));
        prop_assert_eq!(chip8.state().v[0xF], u8::from(vx > vy));
    }

    #[test]
    fn drawing_twice_restores_frame(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in proptest::collection::vec(any::<u8>(), 1..=15),
    ) {
        // LD V0, x; LD V1, y; LD I, 0x20C; DRW V0, V1, n; DRW V0, V1, n; JP 0x20A
        let n = sprite.len() as u8;
        let mut program = vec![
            0x60, x, 0x61, y, 0xA2, 0x0C, 0xD0, 0x10 | n, 0xD0, 0x10 | n, 0x12, 0x0A,
        ];
        program.extend_from_slice(&sprite);

        let mut chip8 = run(&program, 4);
        prop_assert_eq!(chip8.state().v[0xF], 0);
        prop_assert!(chip8.take_frame().is_some());

        chip8.step().unwrap();
        prop_assert!(chip8.frame().iter().all(|&pixel| !pixel));
        let drew_anything = sprite.iter().any(|&byte| byte != 0);
        prop_assert_eq!(chip8.state().v[0xF], u8::from(drew_anything));
        prop_assert!(chip8.needs_repaint());
    }

    #[test]
    fn call_then_return(target in 0x104u16..0x800) {
        // CALL target at 0x200, RET at target
        let addr = target * 2;
        let mut program = vec![0u8; usize::from(addr) - 0x200 + 2];
        program[0] = 0x20 | (addr >> 8) as u8;
        program[1] = addr as u8;
        let ret = usize::from(addr) - 0x200;
        program[ret] = 0x00;
        program[ret + 1] = 0xEE;

        let mut chip8 = run(&program, 1);
        prop_assert_eq!(chip8.state().pc, addr);
        prop_assert_eq!(chip8.state().sp, 1);

        chip8.step().unwrap();
        prop_assert_eq!(chip8.state().pc, 0x202);
        prop_assert_eq!(chip8.state().sp, 0);
    }
}
