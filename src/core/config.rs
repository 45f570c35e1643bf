//! Replacement map configuration.
//!
//! A map is a JSON object:
//!
//! ```json
//! {
//!   "replacements": { "NAME": "linesub", "VERSION": "0.1.0" },
//!   "fallback": "missing replacement",
//!   "spans": { "open": "<<<<", "close": ">>>>" }
//! }
//! ```
//!
//! `replacements` keeps the order it was written in. With `spans`, keys are
//! matched against the text between the delimiters.

use crate::error::{Error, Result};
use crate::replace::{
    DelimitedSpans, IdentifierSource, ReplacementMap, ReplacementStrategy, SpanReplacements,
};
use crate::utils::io;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Read;

// ============================================================================
// JSON Parsing Utilities (internal)
// ============================================================================

/// Parse JSON string into typed value.
pub(crate) fn from_str<T: DeserializeOwned>(s: &str, origin: &str) -> Result<T> {
    serde_json::from_str(s).map_err(|e| Error::config_invalid_json(origin, e))
}

/// Read a JSON spec from an inline string, a file (`@path`), or stdin (`-`).
pub fn read_json_spec_to_string(spec: &str) -> Result<String> {
    use std::io::IsTerminal;

    if spec.trim() == "-" {
        let mut buf = String::new();
        let mut stdin = std::io::stdin();
        if stdin.is_terminal() {
            return Err(Error::validation_invalid_argument(
                "map",
                "Cannot read JSON from stdin when stdin is a TTY",
            ));
        }
        stdin
            .read_to_string(&mut buf)
            .map_err(|e| Error::internal_io(e.to_string(), Some("read stdin".to_string())))?;
        return Ok(buf);
    }

    if let Some(path) = spec.strip_prefix('@') {
        if path.trim().is_empty() {
            return Err(Error::validation_invalid_argument(
                "map",
                "Invalid JSON spec '@' (missing file path)",
            ));
        }

        let path = io::expand_path(path);
        return io::read_file(&path, &format!("read {}", path.display()));
    }

    Ok(spec.to_string())
}

/// Describe where a spec came from, for error details.
fn spec_origin(spec: &str) -> String {
    match spec.trim() {
        "-" => "<stdin>".to_string(),
        trimmed => match trimmed.strip_prefix('@') {
            Some(path) => path.to_string(),
            None => "<inline>".to_string(),
        },
    }
}

// ============================================================================
// Map configuration
// ============================================================================

/// Identifier source and replacement strategy a map describes.
pub type MapSubstitution = (Box<dyn IdentifierSource>, Box<dyn ReplacementStrategy>);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanConfig {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapConfig {
    #[serde(default)]
    pub replacements: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spans: Option<SpanConfig>,
}

impl MapConfig {
    /// Load from an inline JSON string, `@path`, or `-`.
    pub fn load(spec: &str) -> Result<Self> {
        let raw = read_json_spec_to_string(spec)?;
        from_str(&raw, &spec_origin(spec))
    }

    /// Build the lookup table. Every replacement value must be a string.
    pub fn replacement_map(&self) -> Result<ReplacementMap> {
        let mut map = ReplacementMap::new();

        for (identifier, value) in &self.replacements {
            if identifier.is_empty() {
                return Err(Error::validation_invalid_argument(
                    "replacements",
                    "Identifiers cannot be empty",
                ));
            }
            let Some(replacement) = value.as_str() else {
                return Err(Error::validation_invalid_argument(
                    format!("replacements.{}", identifier),
                    format!("Replacement must be a string, got {}", value),
                ));
            };
            map.insert(identifier.as_str(), replacement);
        }

        Ok(match &self.fallback {
            Some(fallback) => map.with_fallback(fallback.as_str()),
            None => map,
        })
    }

    /// Span discovery, when the map declares delimiters.
    pub fn span_source(&self) -> Result<Option<DelimitedSpans>> {
        self.spans
            .as_ref()
            .map(|spans| DelimitedSpans::new(spans.open.as_str(), spans.close.as_str()))
            .transpose()
    }

    /// What a run over this map searches for and replaces with.
    ///
    /// With spans, every span is an identifier and its inner text is the map
    /// key. Without spans, the map keys themselves are the identifiers, in
    /// written order, and the map must not be empty.
    pub fn substitution(&self) -> Result<MapSubstitution> {
        let map = self.replacement_map()?;

        let identifiers: Box<dyn IdentifierSource>;
        let replacements: Box<dyn ReplacementStrategy>;

        match self.span_source()? {
            Some(spans) => {
                identifiers = Box::new(spans.clone());
                replacements = Box::new(SpanReplacements::new(spans, map));
            }
            None if map.is_empty() => {
                return Err(Error::validation_missing_argument(vec![
                    "replacements".to_string(),
                    "spans".to_string(),
                ])
                .with_hint("A map needs at least one replacement, or spans to discover"));
            }
            None => {
                identifiers = Box::new(map.identifiers());
                replacements = Box::new(map);
            }
        }

        Ok((identifiers, replacements))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::replace::substitute_lines;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_inline_map_in_written_order() {
        let config =
            MapConfig::load(r#"{"replacements": {"ZED": "z", "ALPHA": "a"}, "fallback": "?"}"#)
                .unwrap();
        let map = config.replacement_map().unwrap();

        assert_eq!(map.identifiers().as_slice(), ["ZED", "ALPHA"]);
        assert_eq!(map.get("ALPHA"), Some("a"));
        assert_eq!(map.fallback(), Some("?"));
        assert!(config.span_source().unwrap().is_none());
    }

    #[test]
    fn loads_map_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.json");
        fs::write(
            &path,
            r#"{"replacements": {"hello": "hi"}, "spans": {"open": "<<<<", "close": ">>>>"}}"#,
        )
        .unwrap();

        let config = MapConfig::load(&format!("@{}", path.display())).unwrap();
        let spans = config.span_source().unwrap().unwrap();

        assert_eq!(spans.open(), "<<<<");
        assert_eq!(config.replacement_map().unwrap().get("hello"), Some("hi"));
    }

    #[test]
    fn invalid_json_is_config_error() {
        let err = MapConfig::load("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidJson);
        assert_eq!(err.details["path"], "<inline>");
    }

    #[test]
    fn non_string_replacement_rejected() {
        let config = MapConfig::load(r#"{"replacements": {"N": 5}}"#).unwrap();
        let err = config.replacement_map().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
        assert_eq!(err.details["field"], "replacements.N");
    }

    #[test]
    fn empty_span_delimiter_rejected() {
        let config = MapConfig::load(r#"{"spans": {"open": "", "close": "]"}}"#).unwrap();
        assert!(config.span_source().is_err());
    }

    #[test]
    fn span_substitution_looks_up_inner_text() {
        let config = MapConfig::load(
            r#"{"replacements": {"name": "world"}, "fallback": "?", "spans": {"open": "{{", "close": "}}"}}"#,
        )
        .unwrap();
        let (mut identifiers, mut replacements) = config.substitution().unwrap();

        let (lines, report) = substitute_lines(
            &["Hello {{name}}, {{other}}"],
            identifiers.as_mut(),
            replacements.as_mut(),
        )
        .unwrap();

        assert_eq!(lines, vec!["Hello world, ?"]);
        assert_eq!(report.replacements, 2);
        assert!(identifiers.fixed().is_none());
    }

    #[test]
    fn plain_substitution_uses_keys_in_order() {
        let config =
            MapConfig::load(r#"{"replacements": {"B": "A", "A": "done"}}"#).unwrap();
        let (mut identifiers, mut replacements) = config.substitution().unwrap();

        assert_eq!(
            identifiers.fixed().map(<[String]>::to_vec),
            Some(vec!["B".to_string(), "A".to_string()])
        );
        let (lines, _) =
            substitute_lines(&["B"], identifiers.as_mut(), replacements.as_mut()).unwrap();
        // B becomes A, which is then replaced on its own turn
        assert_eq!(lines, vec!["done"]);
    }

    #[test]
    fn empty_map_without_spans_rejected() {
        let config = MapConfig::load(r#"{"replacements": {}}"#).unwrap();
        let err = config.substitution().err().unwrap();
        assert_eq!(err.code, ErrorCode::ValidationMissingArgument);
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn missing_map_file_is_io_error() {
        let err = MapConfig::load("@/nonexistent/map.json").unwrap_err();
        assert_eq!(err.code, ErrorCode::InternalIoError);
    }
}
