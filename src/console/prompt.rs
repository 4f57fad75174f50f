//! Line-oriented prompting over any `BufRead`/`Write` pair.
//!
//! Every read returns `Ok(None)` at end of input so menus can unwind and exit
//! cleanly. Typed reads re-prompt until the line parses.

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

/// What a menu action wants the loop to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Prompter<R, W> {
    input: R,
    out: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self { input, out }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.out)
    }

    /// Print `prompt` and read one line without its line terminator.
    /// Lines that are not valid UTF-8 are rejected and the prompt repeats.
    pub fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            write!(self.out, "{}", prompt)?;
            self.out.flush()?;
            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                writeln!(self.out)?;
                return Ok(None);
            }
            while matches!(raw.last(), Some(b'\n' | b'\r')) {
                raw.pop();
            }
            match String::from_utf8(raw) {
                Ok(s) => return Ok(Some(s)),
                Err(e) => {
                    log::debug!("rejected non-UTF-8 input: {}", e);
                    writeln!(self.out, "Invalid input: line is not valid UTF-8")?;
                }
            }
        }
    }

    /// Read a value that parses via `FromStr`, re-prompting on bad input.
    pub fn parse<T>(&mut self, prompt: &str) -> io::Result<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.parse_with(prompt, |s| s.parse::<T>().map_err(|e| e.to_string()))
    }

    /// Read a line and run it through `check` until it yields a value.
    pub fn parse_with<T, F>(&mut self, prompt: &str, mut check: F) -> io::Result<Option<T>>
    where
        F: FnMut(&str) -> Result<T, String>,
    {
        loop {
            let Some(line) = self.line(prompt)? else {
                return Ok(None);
            };
            match check(line.trim()) {
                Ok(v) => return Ok(Some(v)),
                Err(msg) => {
                    log::debug!("rejected input {:?}: {}", line, msg);
                    writeln!(self.out, "Invalid input: {}", msg)?;
                }
            }
        }
    }

    /// Print a failed operation and hand control back to the menu.
    pub fn report(&mut self, err: &anyhow::Error) -> io::Result<()> {
        log::debug!("operation failed: {:#}", err);
        writeln!(self.out, "Error: {:#}", err)
    }
}

/// Unwrap an input or leave the current action with `Flow::Quit` at end of input.
macro_rules! or_quit {
    ($e:expr) => {
        match $e? {
            Some(v) => v,
            None => return Ok($crate::console::Flow::Quit),
        }
    };
}

/// Unwrap a store result or print the error and go back to the menu.
macro_rules! or_report {
    ($p:expr, $e:expr) => {
        match $e {
            Ok(v) => v,
            Err(err) => {
                $p.report(&err)?;
                return Ok($crate::console::Flow::Continue);
            }
        }
    };
}

pub(crate) use or_quit;
pub(crate) use or_report;
