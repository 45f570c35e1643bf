//! Substitution engine: scan and rewrite every line of a source.
//!
//! For each line:
//! 1. Ask the identifier source what to look for (empty → line passes through)
//! 2. For each identifier in the order yielded, repeatedly find it in the
//!    line's current text, hand the occurrence to the replacement strategy and
//!    splice the result in at the match position
//! 3. Write the line to the sink, changed or not
//!
//! The search for an identifier resumes at the start of the previous match,
//! not after the inserted replacement. Replacement text is therefore scanned
//! again. A replacement that reintroduces its own identifier at or after that
//! position never terminates; avoiding that is up to the caller.

use super::occurrence::Occurrence;
use super::strategy::{IdentifierSource, ReplacementStrategy};
use crate::error::{Error, Result};
use crate::lines::LineSink;
use serde::Serialize;

// ============================================================================
// Types
// ============================================================================

/// Run-level switches for the file entry points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionOptions {
    /// Fail with `replace.identifier_not_found` when a fixed identifier was
    /// never replaced anywhere in the source.
    pub require_match: bool,
}

/// Replacement count for one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierCount {
    pub identifier: String,
    pub replacements: usize,
}

/// What a run did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubstitutionReport {
    /// Lines read from the source (and written to the sink).
    pub lines_read: usize,
    /// Lines with at least one replacement.
    pub lines_changed: usize,
    /// Total replacements across all lines.
    pub replacements: usize,
    /// Per-identifier counts, in the order identifiers were first replaced.
    pub identifiers: Vec<IdentifierCount>,
}

impl SubstitutionReport {
    fn record(&mut self, identifier: &str) {
        self.replacements += 1;
        match self
            .identifiers
            .iter_mut()
            .find(|count| count.identifier == identifier)
        {
            Some(count) => count.replacements += 1,
            None => self.identifiers.push(IdentifierCount {
                identifier: identifier.to_string(),
                replacements: 1,
            }),
        }
    }

    /// Replacements made for `identifier` (0 if it never matched).
    pub fn count_for(&self, identifier: &str) -> usize {
        self.identifiers
            .iter()
            .find(|count| count.identifier == identifier)
            .map(|count| count.replacements)
            .unwrap_or(0)
    }

    pub fn is_unchanged(&self) -> bool {
        self.replacements == 0
    }

    /// Identifiers from `expected` that were never replaced.
    pub fn unmatched<'a>(&self, expected: &'a [String]) -> Vec<&'a str> {
        expected
            .iter()
            .filter(|id| !id.is_empty() && self.count_for(id) == 0)
            .map(String::as_str)
            .collect()
    }

    /// Strict-mode check: the first expected identifier that never matched
    /// becomes an `identifier_not_found` error against `file`.
    pub fn require_matches(&self, expected: &[String], file: &str) -> Result<()> {
        match self.unmatched(expected).first() {
            Some(identifier) => Err(Error::identifier_not_found(file, *identifier, None)),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Line rewriting
// ============================================================================

/// Rewrite one line. Returns the new text and how many replacements were made.
fn rewrite_line<S, R>(
    line: &str,
    line_index: usize,
    identifiers: &mut S,
    replacements: &mut R,
    report: &mut SubstitutionReport,
) -> Result<(String, usize)>
where
    S: IdentifierSource + ?Sized,
    R: ReplacementStrategy + ?Sized,
{
    let targets = identifiers.identifiers(line)?;
    if targets.is_empty() {
        return Ok((line.to_string(), 0));
    }

    let mut text = line.to_string();
    let mut replaced = 0;

    for identifier in &targets {
        // An empty identifier matches at every cursor and would never finish
        if identifier.is_empty() {
            continue;
        }

        let mut cursor = 0;
        while let Some(found) = text[cursor..].find(identifier.as_str()) {
            let start = cursor + found;
            let end = start + identifier.len();

            let occurrence = Occurrence::new(
                identifier.as_str(),
                text[..start].chars().count(),
                start,
                line,
                line_index,
            );
            let replacement = replacements.replacement(&occurrence)?;
            text.replace_range(start..end, &replacement);

            replaced += 1;
            report.record(identifier);

            // Rescan from the match start, replacement included
            cursor = start;
        }
    }

    Ok((text, replaced))
}

/// Rewrite a single line outside of a run.
///
/// `line_index` is passed through to every `Occurrence` unchanged.
pub fn substitute_line<S, R>(
    line: &str,
    line_index: usize,
    identifiers: &mut S,
    replacements: &mut R,
) -> Result<String>
where
    S: IdentifierSource + ?Sized,
    R: ReplacementStrategy + ?Sized,
{
    let mut report = SubstitutionReport::default();
    let (text, _) = rewrite_line(line, line_index, identifiers, replacements, &mut report)?;
    Ok(text)
}

// ============================================================================
// Runs
// ============================================================================

/// Substitute every line from `lines` into `sink`.
///
/// Each line is fully processed and written before the next one is pulled.
/// A read error, a strategy error or a sink error ends the run immediately;
/// whatever reached the sink before that stays there.
///
/// `Occurrence::line_index` is the number of lines changed before the
/// current one. It is bumped once a line finishes with at least one
/// replacement, so it trails a true line number whenever unchanged lines are
/// interleaved.
pub fn substitute<L, S, R, K>(
    lines: L,
    identifiers: &mut S,
    replacements: &mut R,
    sink: &mut K,
) -> Result<SubstitutionReport>
where
    L: IntoIterator<Item = Result<String>>,
    S: IdentifierSource + ?Sized,
    R: ReplacementStrategy + ?Sized,
    K: LineSink + ?Sized,
{
    let mut report = SubstitutionReport::default();

    for line in lines {
        let line = line?;
        report.lines_read += 1;

        let line_index = report.lines_changed;
        let (text, replaced) =
            rewrite_line(&line, line_index, identifiers, replacements, &mut report)?;
        if replaced > 0 {
            report.lines_changed += 1;
        }

        sink.write_line(&text)?;
    }

    sink.finish()?;
    Ok(report)
}

/// In-memory convenience over [`substitute`].
pub fn substitute_lines<T, S, R>(
    lines: &[T],
    identifiers: &mut S,
    replacements: &mut R,
) -> Result<(Vec<String>, SubstitutionReport)>
where
    T: AsRef<str>,
    S: IdentifierSource + ?Sized,
    R: ReplacementStrategy + ?Sized,
{
    let mut output: Vec<String> = Vec::with_capacity(lines.len());
    let report = substitute(
        lines.iter().map(|line| Ok(line.as_ref().to_string())),
        identifiers,
        replacements,
        &mut output,
    )?;
    Ok((output, report))
}

// ============================================================================
// Tests
// ============================================================================
