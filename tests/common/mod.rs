use pscript::interp::Interp;

pub fn run_ok(src: &str) -> String {
    let mut interp = Interp::new();
    interp.load(src);
    assert!(interp.prescan(), "prescan failed: {}", interp.output());
    assert!(interp.execute(), "execute failed: {}", interp.output());
    interp.output().to_string()
}

pub fn run_err(src: &str) -> String {
    let mut interp = Interp::new();
    interp.load(src);
    if interp.prescan() {
        assert!(
            !interp.execute(),
            "expected failure, got: {}",
            interp.output()
        );
    }
    interp.output().to_string()
}
