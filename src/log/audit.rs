//! Audit sinks: verbatim archive of every in-game line.

use std::io::Write;

/// Receives every line observed while a game is in progress.
pub trait AuditSink {
    /// Archive one line (without its trailing newline).
    fn archive(&mut self, line: &str) -> std::io::Result<()>;
}

impl AuditSink for Vec<String> {
    fn archive(&mut self, line: &str) -> std::io::Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

impl<T: AuditSink + ?Sized> AuditSink for Box<T> {
    fn archive(&mut self, line: &str) -> std::io::Result<()> {
        (**self).archive(line)
    }
}

/// Discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl AuditSink for NullSink {
    fn archive(&mut self, _line: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Writes lines to any `Write`, one per line.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> std::io::Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> AuditSink for WriterSink<W> {
    fn archive(&mut self, line: &str) -> std::io::Result<()> {
        writeln!(self.writer, "{line}")
    }
}
