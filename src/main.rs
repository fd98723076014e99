//! # pscript
//!
//! Shell for developing pendant scripts on a desktop.

fn main() {
    pscript::term::main();
}
