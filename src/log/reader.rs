//! Byte-offset cursor over an append-only log.
//!
//! The cursor only ever advances past a newline it has handed out. A
//! trailing line the client has not finished writing stays unconsumed until
//! a later read sees its newline.

use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

/// Read position into a log source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogCursor {
    offset: u64,
}

impl LogCursor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a known offset.
    #[must_use]
    pub fn at(offset: u64) -> Self {
        Self { offset }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Read every complete line past the cursor.
    ///
    /// Lines are returned without their terminator (`\n` or `\r\n`).
    /// Invalid UTF-8 is replaced rather than failing the pass. A source
    /// shorter than the cursor was truncated or recreated; reading restarts
    /// from the beginning.
    pub fn read_new_lines<R: Read + Seek>(&mut self, source: &mut R) -> std::io::Result<Vec<String>> {
        let Some(chunk) = self.complete_chunk(source)? else {
            return Ok(Vec::new());
        };

        let lines = chunk
            .split(|&b| b == b'\n')
            .map(|raw| {
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                String::from_utf8_lossy(raw).into_owned()
            })
            .collect::<Vec<_>>();

        self.offset += chunk.len() as u64 + 1;
        debug!(lines = lines.len(), offset = self.offset, "read log chunk");
        Ok(lines)
    }

    /// Advance past all complete lines without returning them.
    pub fn skip_to_end<R: Read + Seek>(&mut self, source: &mut R) -> std::io::Result<u64> {
        let skipped = match self.complete_chunk(source)? {
            Some(chunk) => chunk.len() as u64 + 1,
            None => 0,
        };
        self.offset += skipped;
        info!(skipped, offset = self.offset, "skipped log history");
        Ok(skipped)
    }

    /// Bytes from the cursor up to (not including) the last newline.
    fn complete_chunk<R: Read + Seek>(&mut self, source: &mut R) -> std::io::Result<Option<Vec<u8>>> {
        let len = source.seek(SeekFrom::End(0))?;
        if len < self.offset {
            info!(len, offset = self.offset, "log shrank; rewinding");
            self.offset = 0;
        }

        source.seek(SeekFrom::Start(self.offset))?;
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;

        let Some(last_newline) = buf.iter().rposition(|&b| b == b'\n') else {
            return Ok(None);
        };
        buf.truncate(last_newline);
        Ok(Some(buf))
    }
}

/// A cursor bound to a file path, reopened on every poll.
///
/// Reopening picks up a log the client deleted and recreated.
#[derive(Clone, Debug)]
pub struct LogTail {
    path: PathBuf,
    cursor: LogCursor,
}

impl LogTail {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cursor: LogCursor::new(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn cursor(&self) -> LogCursor {
        self.cursor
    }

    /// New complete lines. A missing file yields nothing.
    pub fn poll(&mut self) -> std::io::Result<Vec<String>> {
        match std::fs::File::open(&self.path) {
            Ok(mut file) => self.cursor.read_new_lines(&mut file),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// Skip whatever the file already holds.
    pub fn skip_to_end(&mut self) -> std::io::Result<u64> {
        match std::fs::File::open(&self.path) {
            Ok(mut file) => self.cursor.skip_to_end(&mut file),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(0),
            Err(err) => Err(err),
        }
    }
}

/// Anything that yields newly completed log lines.
pub trait LineSource {
    fn poll(&mut self) -> std::io::Result<Vec<String>>;
}

impl LineSource for LogTail {
    fn poll(&mut self) -> std::io::Result<Vec<String>> {
        LogTail::poll(self)
    }
}

/// An in-memory log that can be appended to. Used for replays and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryLog {
    buffer: Cursor<Vec<u8>>,
    cursor: LogCursor,
}

impl MemoryLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text; it need not end in a newline.
    pub fn append(&mut self, text: &str) {
        self.buffer.get_mut().extend_from_slice(text.as_bytes());
    }

    /// Append one full line.
    pub fn push_line(&mut self, line: &str) {
        self.append(line);
        self.append("\n");
    }
}

impl LineSource for MemoryLog {
    fn poll(&mut self) -> std::io::Result<Vec<String>> {
        self.cursor.read_new_lines(&mut self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_partial_line_deferred() {
        let mut source = Cursor::new(b"first\nsecond\nthi".to_vec());
        let mut cursor = LogCursor::new();

        let lines = cursor.read_new_lines(&mut source).unwrap();
        assert_eq!(lines, vec!["first", "second"]);
        assert_eq!(cursor.offset(), 13);

        assert!(cursor.read_new_lines(&mut source).unwrap().is_empty());
        assert_eq!(cursor.offset(), 13);

        source.get_mut().extend_from_slice(b"rd\n");
        assert_eq!(cursor.read_new_lines(&mut source).unwrap(), vec!["third"]);
        assert_eq!(cursor.offset(), 19);
    }

    #[test]
    fn test_crlf_and_empty_lines() {
        let mut source = Cursor::new(b"a\r\n\nb\n".to_vec());
        let mut cursor = LogCursor::new();
        assert_eq!(cursor.read_new_lines(&mut source).unwrap(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        let mut source = Cursor::new(b"ok\n\xff\xfebad\n".to_vec());
        let mut cursor = LogCursor::new();

        let lines = cursor.read_new_lines(&mut source).unwrap();
        assert_eq!(lines[0], "ok");
        assert!(lines[1].ends_with("bad"));
        assert!(lines[1].contains('\u{FFFD}'));
    }

    #[test]
    fn test_truncated_source_rewinds() {
        let mut cursor = LogCursor::at(500);
        let mut source = Cursor::new(b"fresh\n".to_vec());

        assert_eq!(cursor.read_new_lines(&mut source).unwrap(), vec!["fresh"]);
        assert_eq!(cursor.offset(), 6);
    }

    #[test]
    fn test_skip_to_end_keeps_partial() {
        let mut source = Cursor::new(b"old\nhistory\npart".to_vec());
        let mut cursor = LogCursor::new();

        assert_eq!(cursor.skip_to_end(&mut source).unwrap(), 12);
        source.get_mut().extend_from_slice(b"ial\n");
        assert_eq!(cursor.read_new_lines(&mut source).unwrap(), vec!["partial"]);
    }

    #[test]
    fn test_memory_log() {
        let mut log = MemoryLog::new();
        log.push_line("one");
        log.append("tw");
        assert_eq!(log.poll().unwrap(), vec!["one"]);
        log.append("o\n");
        assert_eq!(log.poll().unwrap(), vec!["two"]);
        assert!(log.poll().unwrap().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let mut tail = LogTail::new("/nonexistent/hearth/Player.log");
        assert!(tail.poll().unwrap().is_empty());
        assert_eq!(tail.skip_to_end().unwrap(), 0);
    }
}
