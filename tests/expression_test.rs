mod common;
use common::*;

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(run_ok("void main() { print(2 + 3 * 4); }"), "14");
    assert_eq!(run_ok("void main() { print((2 + 3) * 4); }"), "20");
    assert_eq!(run_ok("void main() { print(7 / 2, \" \", 7 % 2); }"), "3 1");
    assert_eq!(run_ok("void main() { print(-3 * -4); }"), "12");
}

#[test]
fn test_division_by_zero() {
    let out = run_err("void main() { print(1 / 0); }");
    assert!(out.starts_with("division by zero in line 1"), "{}", out);
    let out = run_err("void main() { int a = 4; a %= 0; }");
    assert!(out.starts_with("division by zero"), "{}", out);
}

#[test]
fn test_compound_assignment() {
    let out = run_ok(
        "void main() {
            int a = 10;
            a += 5; print(a, \" \");
            a -= 3; print(a, \" \");
            a *= 2; print(a, \" \");
            a /= 6; print(a, \" \");
            a %= 3; print(a);
        }",
    );
    assert_eq!(out, "15 12 24 4 1");
}

#[test]
fn test_assignment_is_an_expression() {
    assert_eq!(
        run_ok("void main() { int a, b; a = b = 7; print(a + b); }"),
        "14"
    );
}

#[test]
fn test_ternary() {
    assert_eq!(run_ok("void main() { print(1 ? 5 : 9); }"), "5");
    assert_eq!(run_ok("void main() { print(0 ? 5 : 9); }"), "9");
    // The untaken branch is skipped structurally, commas included.
    assert_eq!(
        run_ok("void main() { int x = 1; print(x ? 1 : (2, 3, 4)); }"),
        "1"
    );
    assert_eq!(
        run_ok("void main() { int x = 0; print(x ? 1 : (2, 3, 4)); }"),
        "4"
    );
    assert_eq!(
        run_ok("void main() { print(1 ? 0 ? 7 : 8 : 9); }"),
        "8"
    );
}

#[test]
fn test_ternary_skips_parenthesized_ternary() {
    // A ternary wrapped in parentheses inside the discarded branch
    // must not unbalance the scan for the real colon.
    assert_eq!(
        run_ok("void main() { print(0 ? (1 ? 2 : 3) : 7); }"),
        "7"
    );
    assert_eq!(
        run_ok("void main() { print(1 ? 5 : (0 ? 2 : 3)); }"),
        "5"
    );
    assert_eq!(
        run_ok("void main() { print(0 ? (1 ? 2 : 3) : (0 ? 8 : 9)); }"),
        "9"
    );
}

#[test]
fn test_logic_evaluates_both_sides() {
    // No short circuit: the right operand runs even when the left
    // already decides the result.
    let out = run_err("void main() { int x = 0; if (x != 0 && 1 / x) print(1); }");
    assert!(out.starts_with("division by zero"), "{}", out);
    assert_eq!(run_ok("void main() { print(2 && 0, 0 || 3); }"), "01");
}

#[test]
fn test_relationals_do_not_chain() {
    assert_eq!(run_ok("void main() { print(3 < 2 < 1); }"), "1");
    assert_eq!(run_ok("void main() { print(1 <= 1, 2 != 2, 3 >= 4); }"), "100");
}

#[test]
fn test_increment_is_always_pre() {
    // Both positions apply immediately and yield the updated value.
    assert_eq!(
        run_ok("void main() { int a = 1; int b = a++; print(a, b); }"),
        "22"
    );
    assert_eq!(
        run_ok("void main() { int a = 5; print(--a, \" \", a); }"),
        "4 4"
    );
}

#[test]
fn test_increment_needs_a_variable() {
    let out = run_err("void main() { ++3; }");
    assert!(out.starts_with("not a variable"), "{}", out);
}

#[test]
fn test_unary_and_not() {
    assert_eq!(run_ok("void main() { print(!0, !7, - -4); }"), "104");
}

#[test]
fn test_comma_yields_last() {
    assert_eq!(run_ok("void main() { print((1, 2, 3)); }"), "3");
}

#[test]
fn test_undefined_names() {
    let out = run_err("void main() { print(zz); }");
    assert!(out.starts_with("undefined variable"), "{}", out);
    let out = run_err("void main() { zz(1); }");
    assert!(out.starts_with("undefined function"), "{}", out);
}

#[test]
fn test_char_arithmetic_keeps_left_type() {
    // Left operand's type survives arithmetic, so add from the left
    // with an int to see the number.
    assert_eq!(
        run_ok("void main() { char c; c = 200; print(0 + c); }"),
        "-56"
    );
    assert_eq!(run_ok("void main() { char c = 'A'; print(c + 1); }"), "B");
}
