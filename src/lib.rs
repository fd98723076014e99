//! # Pendant Script
//!
//! A Little-C script interpreter for CNC pendants. Scripts are small
//! C-like programs that print G-code; the host edits a script's global
//! variables through an index-based API, runs `main`, and collects the
//! generated program from a capacity-limited output buffer.
//!
//! ```text
//! int len = 10000;  // Length;mm;1000;0;50000
//! int feed = 200;   // Feed;mm/min;1;1;1000
//!
//! void main()
//! {
//!     print("G1 F", feed, "\n");
//!     print("G1 X");
//!     printfp(len, 1000);
//!     print("\n");
//! }
//! ```
//!
//! The language is a C subset: `void`/`char`/`int`, all control-flow
//! statements, six levels of expression precedence, `//` and `/* */`
//! comments. Two deliberate simplifications are kept from the pendant
//! firmware: `&&` and `||` evaluate both operands, and relationals do
//! not chain (`a < b < c` is `(a < b) < c`).

pub mod interp;
pub mod lang;
pub mod term;
