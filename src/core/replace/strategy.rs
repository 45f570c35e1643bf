//! The two seams a caller plugs into the engine.
//!
//! `IdentifierSource` answers "what should be searched for in this line",
//! `ReplacementStrategy` answers "what does this occurrence become". Both are
//! fallible so a caller's own failure travels back out of the run unchanged.

use super::occurrence::Occurrence;
use crate::error::{Error, Result};

/// Yields, per line, the literal identifiers to search for.
pub trait IdentifierSource {
    fn identifiers(&mut self, line: &str) -> Result<Vec<String>>;

    /// The identifiers this source always yields, when they are known up front.
    fn fixed(&self) -> Option<&[String]> {
        None
    }
}

/// Computes the replacement text for one occurrence.
pub trait ReplacementStrategy {
    fn replacement(&mut self, occurrence: &Occurrence) -> Result<String>;
}

impl<F> ReplacementStrategy for F
where
    F: FnMut(&Occurrence) -> Result<String>,
{
    fn replacement(&mut self, occurrence: &Occurrence) -> Result<String> {
        self(occurrence)
    }
}

// ============================================================================
// Identifier sources
// ============================================================================

/// The same identifiers for every line, in the order given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedIdentifiers {
    identifiers: Vec<String>,
}

impl FixedIdentifiers {
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(identifier: impl Into<String>) -> Self {
        Self {
            identifiers: vec![identifier.into()],
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.identifiers
    }
}

impl IdentifierSource for FixedIdentifiers {
    fn identifiers(&mut self, _line: &str) -> Result<Vec<String>> {
        Ok(self.identifiers.clone())
    }

    fn fixed(&self) -> Option<&[String]> {
        Some(&self.identifiers)
    }
}

/// Identifiers computed from each line's text by a caller function.
pub struct DynamicIdentifiers<F> {
    discover: F,
}

impl<F> DynamicIdentifiers<F>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    pub fn new(discover: F) -> Self {
        Self { discover }
    }
}

impl<F> IdentifierSource for DynamicIdentifiers<F>
where
    F: FnMut(&str) -> Result<Vec<String>>,
{
    fn identifiers(&mut self, line: &str) -> Result<Vec<String>> {
        (self.discover)(line)
    }
}

// ============================================================================
// Replacement strategies
// ============================================================================

/// The same text for every occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant(String);

impl Constant {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }
}

impl ReplacementStrategy for Constant {
    fn replacement(&mut self, _occurrence: &Occurrence) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Replacement that only looks at the matched identifier text.
pub struct PerIdentifier<F> {
    compute: F,
}

impl<F> PerIdentifier<F>
where
    F: FnMut(&str) -> String,
{
    pub fn new(compute: F) -> Self {
        Self { compute }
    }
}

impl<F> ReplacementStrategy for PerIdentifier<F>
where
    F: FnMut(&str) -> String,
{
    fn replacement(&mut self, occurrence: &Occurrence) -> Result<String> {
        Ok((self.compute)(occurrence.identifier()))
    }
}

/// Lookup table from identifier to replacement text, in insertion order.
///
/// Identifiers with no entry get the fallback. Without a fallback an unknown
/// identifier is an error, since handing the identifier back unchanged would
/// be rescanned at the same position forever.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementMap {
    entries: Vec<(String, String)>,
    fallback: Option<String>,
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or overwrite an entry. An existing identifier keeps its position.
    pub fn insert(&mut self, identifier: impl Into<String>, replacement: impl Into<String>) {
        let identifier = identifier.into();
        let replacement = replacement.into();
        match self.entries.iter_mut().find(|(id, _)| *id == identifier) {
            Some(entry) => entry.1 = replacement,
            None => self.entries.push((identifier, replacement)),
        }
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(id, _)| id == identifier)
            .map(|(_, replacement)| replacement.as_str())
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a lookup key (which may differ from the matched identifier,
    /// e.g. the inner text of a delimited span).
    pub fn resolve(&self, key: &str) -> Result<String> {
        self.get(key)
            .or(self.fallback.as_deref())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::strategy_failed(
                    "replacement map",
                    format!("No replacement for '{}' and no fallback configured", key),
                )
            })
    }

    /// Every mapped identifier as a fixed source, in insertion order.
    pub fn identifiers(&self) -> FixedIdentifiers {
        FixedIdentifiers::new(self.entries.iter().map(|(id, _)| id.clone()))
    }
}

impl<K, V> FromIterator<(K, V)> for ReplacementMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut map = ReplacementMap::new();
        for (identifier, replacement) in iter {
            map.insert(identifier, replacement);
        }
        map
    }
}

impl ReplacementStrategy for ReplacementMap {
    fn replacement(&mut self, occurrence: &Occurrence) -> Result<String> {
        self.resolve(occurrence.identifier())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn occurrence(identifier: &str) -> Occurrence {
        Occurrence::new(identifier, 0, 0, identifier, 0)
    }

    #[test]
    fn fixed_identifiers_ignore_line() {
        let mut source = FixedIdentifiers::new(["A", "B", "A"]);
        assert_eq!(source.identifiers("anything").unwrap(), vec!["A", "B", "A"]);
        assert_eq!(source.identifiers("").unwrap(), vec!["A", "B", "A"]);
        assert_eq!(source.fixed().map(<[String]>::len), Some(3));
    }

    #[test]
    fn dynamic_identifiers_see_each_line() {
        let mut source = DynamicIdentifiers::new(|line: &str| {
            Ok(line
                .split_whitespace()
                .filter(|word| word.starts_with('$'))
                .map(str::to_string)
                .collect::<Vec<_>>())
        });
        assert_eq!(source.identifiers("a $x b $y").unwrap(), vec!["$x", "$y"]);
        assert!(source.identifiers("none here").unwrap().is_empty());
        assert!(source.fixed().is_none());
    }

    #[test]
    fn dynamic_identifiers_propagate_failure() {
        let mut source = DynamicIdentifiers::new(|_: &str| -> Result<Vec<String>> {
            Err(Error::strategy_failed("test", "boom"))
        });
        let err = source.identifiers("x").unwrap_err();
        assert_eq!(err.code, ErrorCode::StrategyFailed);
    }

    #[test]
    fn closures_are_replacement_strategies() {
        let mut strategy =
            |occ: &Occurrence| -> Result<String> { Ok(format!("<{}>", occ.identifier())) };
        assert_eq!(strategy.replacement(&occurrence("X")).unwrap(), "<X>");
    }

    #[test]
    fn per_identifier_sees_identifier_only() {
        let mut strategy = PerIdentifier::new(|id: &str| id.to_lowercase());
        assert_eq!(strategy.replacement(&occurrence("ABC")).unwrap(), "abc");
    }

    #[test]
    fn constant_always_same() {
        let mut strategy = Constant::new("Z");
        assert_eq!(strategy.replacement(&occurrence("A")).unwrap(), "Z");
        assert_eq!(strategy.replacement(&occurrence("B")).unwrap(), "Z");
    }

    #[test]
    fn replacement_map_uses_fallback() {
        let mut map: ReplacementMap = [("A", "1"), ("B", "2")].into_iter().collect();
        map = map.with_fallback("?");
        assert_eq!(map.replacement(&occurrence("A")).unwrap(), "1");
        assert_eq!(map.replacement(&occurrence("C")).unwrap(), "?");
    }

    #[test]
    fn replacement_map_without_fallback_rejects_unknown() {
        let mut map: ReplacementMap = [("A", "1")].into_iter().collect();
        let err = map.replacement(&occurrence("C")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StrategyFailed);
    }

    #[test]
    fn replacement_map_insert_keeps_order() {
        let mut map = ReplacementMap::new();
        map.insert("B", "2");
        map.insert("A", "1");
        map.insert("B", "two");
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("B"), Some("two"));
        assert_eq!(map.identifiers().as_slice(), ["B", "A"]);
    }
}
