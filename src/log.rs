use std::io::{self, Write};

/// Append-only, line-oriented sink for scenario progress output.
///
/// This is domain output (the human-readable trace each scenario step
/// emits), not diagnostics; diagnostics go through `tracing`.
pub trait LogSink {
    fn append_line(&mut self, line: &str) -> io::Result<()>;
}

/// Captures lines in memory. The form tests use.
impl LogSink for Vec<String> {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes each line, newline-terminated, to any `io::Write`.
pub struct WriterSink<W: Write>(pub W);

impl<W: Write> LogSink for WriterSink<W> {
    fn append_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.0, "{line}")
    }
}
