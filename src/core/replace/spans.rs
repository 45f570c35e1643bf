use super::occurrence::Occurrence;
use super::strategy::{IdentifierSource, ReplacementMap, ReplacementStrategy};
use crate::error::{Error, Result};

/// Discovers whole `open…close` spans (e.g. `<<<<name>>>>`) as identifiers.
///
/// Spans are collected left to right, each distinct span once. An opener with
/// no closer after it ends discovery for the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimitedSpans {
    open: String,
    close: String,
}

impl DelimitedSpans {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Result<Self> {
        let open = open.into();
        let close = close.into();

        if open.is_empty() {
            return Err(Error::validation_invalid_argument(
                "open",
                "Opening delimiter cannot be empty",
            ));
        }
        if close.is_empty() {
            return Err(Error::validation_invalid_argument(
                "close",
                "Closing delimiter cannot be empty",
            ));
        }

        Ok(Self { open, close })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// All distinct spans in `line`, delimiters included.
    pub fn find_spans(&self, line: &str) -> Vec<String> {
        let mut spans: Vec<String> = Vec::new();
        let mut cursor = 0;

        while let Some(found) = line[cursor..].find(&self.open) {
            let start = cursor + found;
            let body = start + self.open.len();
            let Some(close_at) = line[body..].find(&self.close) else {
                break;
            };
            let end = body + close_at + self.close.len();

            let span = &line[start..end];
            if !spans.iter().any(|seen| seen == span) {
                spans.push(span.to_string());
            }
            cursor = end;
        }

        spans
    }

    /// The text between the delimiters of a span produced by this source.
    pub fn inner<'a>(&self, span: &'a str) -> Option<&'a str> {
        span.strip_prefix(self.open.as_str())?
            .strip_suffix(self.close.as_str())
    }
}

impl IdentifierSource for DelimitedSpans {
    fn identifiers(&mut self, line: &str) -> Result<Vec<String>> {
        Ok(self.find_spans(line))
    }
}

/// Replaces each span with the map entry keyed by its inner text, so
/// `<<<<hello>>>>` looks up `hello`.
#[derive(Debug, Clone)]
pub struct SpanReplacements {
    spans: DelimitedSpans,
    map: ReplacementMap,
}

impl SpanReplacements {
    pub fn new(spans: DelimitedSpans, map: ReplacementMap) -> Self {
        Self { spans, map }
    }
}

impl ReplacementStrategy for SpanReplacements {
    fn replacement(&mut self, occurrence: &Occurrence) -> Result<String> {
        let identifier = occurrence.identifier();
        self.map
            .resolve(self.spans.inner(identifier).unwrap_or(identifier))
    }
}
