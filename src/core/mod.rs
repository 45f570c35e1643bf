// Public modules
pub mod config;
pub mod error;
pub mod files;
pub mod lines;
pub mod replace;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
pub use replace::{
    substitute, substitute_lines, DelimitedSpans, Occurrence, ReplacementMap,
    SubstitutionOptions, SubstitutionReport,
};
