use libintcode::{console::MemoryConsole, Computer, RunOptions, StopReason, Value, VmError};

fn quiet() -> RunOptions {
    RunOptions::default().logging(false)
}

fn run(program: &[Value], input: &[Value]) -> Vec<Value> {
    let (_, console) = MemoryConsole::new(&[]);
    let mut vm = Computer::new().with_console(Box::new(console));
    vm.run(program, input, quiet()).unwrap()
}

#[test]
fn test_quine() {
    let program = [
        109, 1, 204, -1, 1001, 100, 1, 100, 1008, 100, 16, 101, 1006, 101, 0, 99,
    ];
    assert_eq!(run(&program, &[]), program.to_vec());
}

#[test]
fn test_sixteen_digits() {
    let out = run(&[1102, 34915192, 34915192, 7, 4, 7, 99, 0], &[]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].to_string().len(), 16);
    assert_eq!(out[0], 1219070632396864);
}

#[test]
fn test_large_value() {
    assert_eq!(
        run(&[104, 1125899906842624, 99], &[]),
        vec![1125899906842624]
    );
}

#[test]
fn test_equal_to_eight() {
    let position = [3, 9, 8, 9, 10, 9, 4, 9, 99, -1, 8];
    let immediate = [3, 3, 1108, -1, 8, 3, 4, 3, 99];
    for program in [&position[..], &immediate[..]] {
        assert_eq!(run(program, &[8]), vec![1]);
        assert_eq!(run(program, &[7]), vec![0]);
    }
}

#[test]
fn test_jump_programs() {
    let position = [3, 12, 6, 12, 15, 1, 13, 14, 13, 4, 13, 99, -1, 0, 1, 9];
    let immediate = [3, 3, 1105, -1, 9, 1101, 0, 0, 12, 4, 12, 99, 1];
    for program in [&position[..], &immediate[..]] {
        assert_eq!(run(program, &[0]), vec![0]);
        assert_eq!(run(program, &[3]), vec![1]);
    }
}

#[test]
fn test_compare_with_eight() {
    let program = [
        3, 21, 1008, 21, 8, 20, 1005, 20, 22, 107, 8, 21, 20, 1006, 20, 31, 1106, 0, 36, 98, 0,
        0, 1002, 21, 125, 20, 4, 20, 1105, 1, 46, 104, 999, 1105, 1, 46, 1101, 1000, 1, 20, 4,
        20, 1105, 1, 46, 98, 99,
    ];
    assert_eq!(run(&program, &[7]), vec![999]);
    assert_eq!(run(&program, &[8]), vec![1000]);
    assert_eq!(run(&program, &[9]), vec![1001]);
}

#[test]
fn test_prompted_input() {
    let (written, console) = MemoryConsole::new(&[21]);
    let mut vm = Computer::named("echo").with_console(Box::new(console));
    let out = vm
        .run(&[3, 0, 4, 0, 99], &[], RunOptions::default())
        .unwrap();
    assert_eq!(out, vec![21]);
    assert_eq!(*written.borrow(), vec![21]);
}

#[test]
fn test_starved_in_loop_mode() {
    let (_, console) = MemoryConsole::new(&[]);
    let mut vm = Computer::new().with_console(Box::new(console));
    let out = vm
        .run(&[104, 1, 3, 0, 99], &[], quiet().loop_mode(true))
        .unwrap();
    assert_eq!(out, vec![1]);
    assert!(!vm.halted());
    assert_eq!(vm.pointer, 2);
    assert_eq!(vm.resume().unwrap(), StopReason::AwaitingInput);
}

#[test]
fn test_far_memory() {
    assert_eq!(run(&[4, 1 << 61, 99], &[]), vec![0]);
    assert_eq!(run(&[109, 1 << 50, 203, 0, 204, 0, 99], &[11]), vec![11]);
}

#[test]
fn test_jump_far_away() {
    let (_, console) = MemoryConsole::new(&[]);
    let mut vm = Computer::new().with_console(Box::new(console));
    let err = vm.run(&[1105, 1, 1 << 40], &[], quiet()).unwrap_err();
    assert!(matches!(
        err,
        VmError::Decode {
            pointer: 1099511627776,
            ..
        }
    ));
}
