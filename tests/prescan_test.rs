use pscript::interp::{comment_field, comment_field_int, Interp};

const SCRIPT: &str = "\
int len = 10000;  // Length;mm;1000;0;50000
int feed = 200;   // Feed;mm/min;1;1;1000
char rapid;

void main()
{
    print(\"G1 F\", feed, \"\\n\");
}
";

#[test]
fn test_globals_are_listed_in_order() {
    let mut interp = Interp::new();
    interp.load(SCRIPT);
    assert!(interp.prescan());
    assert_eq!(interp.global_count(), 3);
    assert_eq!(interp.global_name(0), Some("len"));
    assert_eq!(interp.global_name(1), Some("feed"));
    assert_eq!(interp.global_name(2), Some("rapid"));
    assert_eq!(interp.global_name(3), None);
    assert_eq!(interp.global_value(0), Some(10000));
    assert_eq!(interp.global_value(2), Some(0));
}

#[test]
fn test_metadata_comments() {
    let mut interp = Interp::new();
    interp.load(SCRIPT);
    assert!(interp.prescan());
    let c = interp.global_comment(0).unwrap();
    assert_eq!(comment_field(c, 0), Some("Length"));
    assert_eq!(comment_field(c, 1), Some("mm"));
    assert_eq!(comment_field_int(c, 2), Some(1000));
    assert_eq!(comment_field_int(c, 4), Some(50000));
    assert_eq!(interp.global_comment(2), None);
}

#[test]
fn test_set_survives_execution() {
    let mut interp = Interp::new();
    interp.load(SCRIPT);
    assert!(interp.prescan());
    assert!(interp.set_global_value(1, 450));
    assert!(interp.execute());
    assert_eq!(interp.output(), "G1 F450\n");
    assert_eq!(interp.global_value(1), Some(450));
}

#[test]
fn test_reset_reevaluates_initializer() {
    let mut interp = Interp::new();
    interp.load("int depth = 2 * 3 + 1;\nvoid main() {}");
    assert!(interp.prescan());
    interp.set_global_value(0, 99);
    assert!(interp.reset_global_value(0));
    assert_eq!(interp.global_value(0), Some(7));
}

#[test]
fn test_initializer_may_reference_earlier_globals() {
    let mut interp = Interp::new();
    interp.load("int a = 5;\nint b = a * 2;\nvoid main() {}");
    assert!(interp.prescan());
    assert_eq!(interp.global_value(1), Some(10));
}

#[test]
fn test_prescan_is_repeatable() {
    let mut interp = Interp::new();
    interp.load(SCRIPT);
    assert!(interp.prescan());
    interp.set_global_value(1, 450);
    assert!(interp.prescan());
    assert_eq!(interp.global_count(), 3);
    // A fresh prescan rebuilds the table from the source.
    assert_eq!(interp.global_value(1), Some(200));
    assert!(interp.execute());
    assert_eq!(interp.output(), "G1 F200\n");
}

#[test]
fn test_declaration_list_shares_comment() {
    let mut interp = Interp::new();
    interp.load("int a, b = 4; // Pair;;1\nvoid main() {}");
    assert!(interp.prescan());
    assert_eq!(interp.global_value(0), Some(0));
    assert_eq!(interp.global_value(1), Some(4));
    assert_eq!(interp.global_comment(0), interp.global_comment(1));
    assert!(interp.global_comment(0).is_some());
}

#[test]
fn test_duplicate_global() {
    let mut interp = Interp::new();
    interp.load("int a;\nint a;\nvoid main() {}");
    assert!(!interp.prescan());
    assert!(interp.output().starts_with("duplicate global variable in line 2"));
}

#[test]
fn test_duplicate_function() {
    let mut interp = Interp::new();
    interp.load("void f() {}\nint f() { return 1; }\nvoid main() {}");
    assert!(!interp.prescan());
    assert!(interp.output().starts_with("duplicate function in line 2"));
}

#[test]
fn test_global_limit() {
    let mut src = String::new();
    for n in 0..33 {
        src.push_str(&format!("int g{};\n", n));
    }
    src.push_str("void main() {}\n");
    let mut interp = Interp::new();
    interp.load(&src);
    assert!(!interp.prescan());
    assert!(interp.output().starts_with("too many global variables"));
}

#[test]
fn test_untyped_function_returns_void() {
    let mut interp = Interp::new();
    interp.load("emit(int n) { print(n); return n; }\nmain() { print(emit(3)); }");
    assert!(interp.prescan());
    assert!(interp.execute());
    // The void return discards emit's value.
    assert_eq!(interp.output(), "30");
}

#[test]
fn test_untyped_variable_is_rejected() {
    let mut interp = Interp::new();
    interp.load("x;\nvoid main() {}");
    assert!(!interp.prescan());
    assert!(interp.output().starts_with("type specifier expected"));
}
