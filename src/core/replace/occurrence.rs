use serde::Serialize;

/// One located identifier within a line.
///
/// Positions are measured against the line as it stood at the moment of
/// discovery, which includes any replacements already applied earlier on the
/// same line. `source_line` is the untouched original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    identifier: String,
    offset: usize,
    byte_offset: usize,
    source_line: String,
    line_index: usize,
}

impl Occurrence {
    pub fn new(
        identifier: impl Into<String>,
        offset: usize,
        byte_offset: usize,
        source_line: impl Into<String>,
        line_index: usize,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            offset,
            byte_offset,
            source_line: source_line.into(),
            line_index,
        }
    }

    /// The literal text that was matched.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Character index of the match in the current line text.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte index of the match in the current line text.
    pub fn byte_offset(&self) -> usize {
        self.byte_offset
    }

    /// The line before any replacement was applied to it.
    pub fn source_line(&self) -> &str {
        &self.source_line
    }

    /// Number of lines changed earlier in the run. Not a line number.
    pub fn line_index(&self) -> usize {
        self.line_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_return_constructed_values() {
        let occ = Occurrence::new("NAME", 3, 4, "hé NAME", 2);
        assert_eq!(occ.identifier(), "NAME");
        assert_eq!(occ.offset(), 3);
        assert_eq!(occ.byte_offset(), 4);
        assert_eq!(occ.source_line(), "hé NAME");
        assert_eq!(occ.line_index(), 2);
    }

    #[test]
    fn equality_is_positional() {
        let a = Occurrence::new("X", 1, 1, "aX", 0);
        let b = Occurrence::new("X", 1, 1, "aX", 0);
        let c = Occurrence::new("X", 2, 2, "aaX", 0);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn serializes_camel_case() {
        let occ = Occurrence::new("X", 0, 0, "X", 0);
        let json = serde_json::to_value(&occ).unwrap();
        assert_eq!(json["sourceLine"], "X");
        assert_eq!(json["lineIndex"], 0);
    }
}
