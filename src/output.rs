// src/output.rs
use crate::types::{Outcome, SourceResult};
use std::io::{self, Write};

/// Prints results as `<source> <value>` lines. Failures are printed as
/// `<source> <error>` only when `show_failures` is set.
pub struct OutputManager {
    show_failures: bool,
}

impl OutputManager {
    pub fn new(show_failures: bool) -> Self {
        Self { show_failures }
    }

    /// Returns whether a line was written.
    pub fn write_result<W: Write>(&self, writer: &mut W, result: &SourceResult) -> io::Result<bool> {
        match result.outcome() {
            Outcome::Success(value) => writeln!(writer, "{} {}", result.source(), value)?,
            Outcome::Failure(error) if self.show_failures => {
                writeln!(writer, "{} {}", result.source(), error)?
            }
            Outcome::Failure(_) => return Ok(false),
        }
        Ok(true)
    }

    pub fn write_to_stdout(&self, result: &SourceResult) -> io::Result<bool> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.write_result(&mut handle, result)
    }
}
