//! console: the interactive numbered menus of both programs.
//!
//! Menus are generic over their input and output so they run the same against
//! a terminal and against scripted input in tests.

pub mod bank;
pub mod prompt;
pub mod restaurant;

pub use prompt::{Flow, Prompter};

use std::io::{self, BufReader, Stdin, Stdout};

/// Prompter over the process' stdin/stdout.
pub fn stdio() -> Prompter<BufReader<Stdin>, Stdout> {
    Prompter::new(BufReader::new(io::stdin()), io::stdout())
}
