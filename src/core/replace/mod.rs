//! Line substitution: find identifiers in each line and swap them for
//! caller-computed text.
//!
//! An identifier source decides which literal strings to look for in a line,
//! a replacement strategy decides what each occurrence becomes, and the engine
//! drives both over every line of a source, writing every line (changed or
//! not) to a sink in order.

mod engine;
mod occurrence;
mod spans;
mod strategy;

pub use engine::{
    substitute, substitute_line, substitute_lines, IdentifierCount, SubstitutionOptions,
    SubstitutionReport,
};
pub use occurrence::Occurrence;
pub use spans::{DelimitedSpans, SpanReplacements};
pub use strategy::{
    Constant, DynamicIdentifiers, FixedIdentifiers, IdentifierSource, PerIdentifier,
    ReplacementMap, ReplacementStrategy,
};
