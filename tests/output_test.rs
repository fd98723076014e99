mod common;
use common::*;
use pscript::interp::{Axis, Host, Interp};

#[test]
fn test_print_mixes_argument_types() {
    assert_eq!(run_ok("void main() { print(\"X\", 42, '!'); }"), "X42!");
}

#[test]
fn test_print_and_println() {
    assert_eq!(
        run_ok("void main() { print(\"abc\"); println(); println(4 + 4); }"),
        "abc\n8\n"
    );
}

#[test]
fn test_puts_and_putch() {
    assert_eq!(
        run_ok("void main() { puts(\"G0 \"); putch('X'); putch(48); }"),
        "G0 X0"
    );
}

#[test]
fn test_puts_rejects_expressions() {
    let out = run_err("void main() { puts(1 + 2); }");
    assert!(out.starts_with("not a string"), "{}", out);
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        run_ok("void main() { print(\"a\\nb\\\"c\"); }"),
        "a\nb\"c"
    );
}

#[test]
fn test_printfp() {
    assert_eq!(
        run_ok("void main() { printfp(1000, 1000); }"),
        "1.000"
    );
    assert_eq!(
        run_ok("void main() { printfp(-500, 1000); }"),
        "-0.500"
    );
    assert_eq!(
        run_ok("int len = 12345; void main() { printfp(len, 100); }"),
        "123.45"
    );
    assert_eq!(
        run_ok("void main() { printfp(7, 1); }"),
        "7"
    );
}

#[test]
fn test_printfp_needs_two_arguments() {
    let out = run_err("void main() { printfp(1000); }");
    assert!(out.starts_with("parameter count mismatch"), "{}", out);
}

#[test]
fn test_abs() {
    assert_eq!(run_ok("void main() { print(abs(-5), abs(5), abs(0)); }"), "550");
}

#[test]
fn test_output_limit() {
    let mut interp = Interp::new();
    interp.load("void main() { while (1) print(\"G1 X0\\n\"); }");
    interp.set_output_limit(64);
    assert!(interp.prescan());
    assert!(!interp.execute());
    assert_eq!(interp.output(), "result doesn't fit");
}

#[test]
fn test_output_exactly_at_limit() {
    let mut interp = Interp::new();
    interp.load("void main() { print(\"abcd\"); }");
    interp.set_output_limit(4);
    assert!(interp.prescan());
    assert!(interp.execute());
    assert_eq!(interp.output(), "abcd");
}

#[test]
fn test_interrupt_flag_stops_execution() {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    let flag = Arc::new(AtomicBool::new(false));
    let mut interp = Interp::new();
    interp.set_interrupt(flag.clone());
    interp.load("void main() { int i = 0; while (1) i = i + 1; }");
    assert!(interp.prescan());
    flag.store(true, Ordering::SeqCst);
    assert!(!interp.execute());
    assert!(interp.output().starts_with("interrupted"));
    // The interpreter consumes the flag when it stops.
    assert!(!flag.load(Ordering::SeqCst));
}

struct TestHost;

impl Host for TestHost {
    fn axis_pos(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => 1500,
            Axis::Y => 200,
            Axis::Z => -50,
        }
    }
    fn lathe_diameter_mode(&self) -> bool {
        true
    }
}

#[test]
fn test_host_queries() {
    let mut interp = Interp::new();
    interp.set_host(Box::new(TestHost));
    interp.load(
        "void main() {
            print(\"X\");
            printfp(GetAxisPosX(), 1000);
            print(\" Y\", GetAxisPosY(), \" Z\", GetAxisPosZ());
            print(\" D\", IsLatheDiameterMode());
        }",
    );
    assert!(interp.prescan());
    assert!(interp.execute());
    assert_eq!(interp.output(), "X1.500 Y200 Z-50 D1");
}

#[test]
fn test_default_host_is_parked() {
    assert_eq!(
        run_ok("void main() { print(GetAxisPosZ(), IsLatheDiameterMode()); }"),
        "00"
    );
}
