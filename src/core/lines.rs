//! Line sources and sinks.
//!
//! Lines never carry their terminator. Reading strips `\n` / `\r\n`; writing
//! appends `\n` after every line, including the last.

use crate::error::{Error, Result};
use std::io::{BufRead, BufWriter, Write};

/// Destination for rewritten lines.
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Called once after the last line of a successful run.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Sink over any `io::Write`, buffered.
pub struct WriterSink<W: Write> {
    writer: BufWriter<W>,
    context: String,
}

impl<W: Write> WriterSink<W> {
    /// `context` names the destination in I/O errors (usually a path).
    pub fn new(writer: W, context: impl Into<String>) -> Self {
        Self {
            writer: BufWriter::new(writer),
            context: context.into(),
        }
    }

    /// Flush and hand back the inner writer.
    pub fn into_inner(self) -> Result<W> {
        let context = self.context;
        self.writer
            .into_inner()
            .map_err(|e| Error::internal_io(e.error().to_string(), Some(format!("flush {}", context))))
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.writer, "{}", line).map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("write {}", self.context)))
        })
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush().map_err(|e| {
            Error::internal_io(e.to_string(), Some(format!("flush {}", self.context)))
        })
    }
}

/// Lazily read lines from `reader`, mapping I/O failures to `internal.io_error`.
pub fn read_lines<R: BufRead>(
    reader: R,
    context: impl Into<String>,
) -> impl Iterator<Item = Result<String>> {
    let context = context.into();
    reader.lines().map(move |line| {
        line.map_err(|e| Error::internal_io(e.to_string(), Some(format!("read {}", context))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use std::io::Cursor;

    #[test]
    fn read_lines_strips_terminators() {
        let lines: Vec<String> = read_lines(Cursor::new("one\ntwo\r\n\nthree"), "mem")
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn read_lines_reports_invalid_utf8() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let results: Vec<Result<String>> = read_lines(Cursor::new(bytes), "bad.txt").collect();
        assert!(results[0].is_ok());
        let err = results[1].as_ref().unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
        assert_eq!(err.details["context"], "read bad.txt");
    }

    #[test]
    fn writer_sink_terminates_every_line() {
        let mut sink = WriterSink::new(Vec::new(), "mem");
        sink.write_line("a").unwrap();
        sink.write_line("").unwrap();
        sink.write_line("b").unwrap();
        sink.finish().unwrap();

        let bytes = sink.into_inner().unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a\n\nb\n");
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<String> = Vec::new();
        sink.write_line("x").unwrap();
        sink.finish().unwrap();
        assert_eq!(sink, vec!["x"]);
    }
}
