//! CLI command handlers for `malla`.
//!
//! Each command family is implemented in its own submodule.

pub mod config;
pub mod progress;
pub mod render;
pub mod shell;

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on `output` and read the answer from `input`
///
/// Only `y` or `yes` (any case) confirm. End of input or a read error counts as no.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, mut input: R, output: &mut W) -> bool {
    write!(output, "{prompt} (y/n): ").ok();
    output.flush().ok();

    let mut response = String::new();
    if input.read_line(&mut response).is_err() {
        return false;
    }
    let response = response.trim();
    response.eq_ignore_ascii_case("y") || response.eq_ignore_ascii_case("yes")
}

/// [`confirm`] on stdin/stdout
pub fn confirm_on_terminal(prompt: &str) -> bool {
    confirm(prompt, io::stdin().lock(), &mut io::stdout())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_accepts_y_and_yes() {
        for answer in ["y\n", "Y\n", "yes\n", "  YES  \n"] {
            let mut out = Vec::new();
            assert!(confirm("Go?", Cursor::new(answer), &mut out), "{answer:?}");
            assert_eq!(String::from_utf8(out).unwrap(), "Go? (y/n): ");
        }
    }

    #[test]
    fn test_confirm_rejects_anything_else() {
        for answer in ["n\n", "\n", "yep\n", ""] {
            let mut out = Vec::new();
            assert!(!confirm("Go?", Cursor::new(answer), &mut out), "{answer:?}");
        }
    }
}
