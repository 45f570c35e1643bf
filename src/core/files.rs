//! File entry points for line substitution.
//!
//! Every function reads `source` line by line and writes the rewritten lines
//! to `destination`, or back over `source` when no destination is given.
//!
//! - Distinct destination: created if absent (truncated otherwise) and
//!   streamed into directly. A failed run can leave it partially written.
//! - In place: lines are streamed to a temp file next to the target and the
//!   temp file replaces the target only after the whole run succeeded.
//!   Symlinks are followed to the real file, whose permissions are kept. A
//!   destination that is another link to the source counts as in place.

use crate::error::Result;
use crate::lines::{read_lines, WriterSink};
use crate::replace::{
    substitute, Constant, DynamicIdentifiers, FixedIdentifiers, IdentifierSource, Occurrence,
    PerIdentifier, ReplacementStrategy, SubstitutionOptions, SubstitutionReport,
};
use crate::utils::io;
use std::path::Path;

/// Replace every `identifier` with the fixed `replacement`.
pub fn replace_fixed(
    source: &Path,
    identifier: &str,
    replacement: &str,
    destination: Option<&Path>,
) -> Result<SubstitutionReport> {
    replace_with_options(
        source,
        destination,
        &mut FixedIdentifiers::single(identifier),
        &mut Constant::new(replacement),
        SubstitutionOptions::default(),
    )
}

/// Replace every `identifier` with `replacement(identifier)`.
pub fn replace_fixed_with<F>(
    source: &Path,
    identifier: &str,
    replacement: F,
    destination: Option<&Path>,
) -> Result<SubstitutionReport>
where
    F: FnMut(&str) -> String,
{
    replace_with_options(
        source,
        destination,
        &mut FixedIdentifiers::single(identifier),
        &mut PerIdentifier::new(replacement),
        SubstitutionOptions::default(),
    )
}

/// Replace each of `identifiers`, in order, with `replacement(occurrence)`.
pub fn replace_identifiers<I, S, F>(
    source: &Path,
    identifiers: I,
    mut replacement: F,
    destination: Option<&Path>,
) -> Result<SubstitutionReport>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    F: FnMut(&Occurrence) -> String,
{
    replace_with_options(
        source,
        destination,
        &mut FixedIdentifiers::new(identifiers),
        &mut |occurrence: &Occurrence| -> Result<String> { Ok(replacement(occurrence)) },
        SubstitutionOptions::default(),
    )
}

/// Replace whatever `discover(line)` yields for each line with
/// `replacement(occurrence)`.
pub fn replace_dynamic<D, I, F>(
    source: &Path,
    mut discover: D,
    mut replacement: F,
    destination: Option<&Path>,
) -> Result<SubstitutionReport>
where
    D: FnMut(&str) -> I,
    I: IntoIterator<Item = String>,
    F: FnMut(&Occurrence) -> String,
{
    replace_with_options(
        source,
        destination,
        &mut DynamicIdentifiers::new(|line: &str| -> Result<Vec<String>> {
            Ok(discover(line).into_iter().collect())
        }),
        &mut |occurrence: &Occurrence| -> Result<String> { Ok(replacement(occurrence)) },
        SubstitutionOptions::default(),
    )
}

/// General form behind every other entry point.
///
/// With `options.require_match`, a source that names its identifiers up front
/// (`IdentifierSource::fixed`) must see each of them replaced at least once,
/// otherwise `replace.identifier_not_found` is returned after the output has
/// been written. Sources that discover identifiers per line are not checked.
pub fn replace_with_options<S, R>(
    source: &Path,
    destination: Option<&Path>,
    identifiers: &mut S,
    replacements: &mut R,
    options: SubstitutionOptions,
) -> Result<SubstitutionReport>
where
    S: IdentifierSource + ?Sized,
    R: ReplacementStrategy + ?Sized,
{
    let reader = io::open_source(source)?;
    let source_label = source.display().to_string();
    let lines = read_lines(reader, source_label.clone());

    let distinct = destination.filter(|dest| !io::same_file(source, dest));

    let report = match distinct {
        Some(dest) => {
            let file = io::create_destination(dest)?;
            let mut sink = WriterSink::new(file, dest.display().to_string());
            let report = substitute(lines, identifiers, replacements, &mut sink)?;
            log_status!(
                "replace",
                "{} -> {}: {} replacements on {} of {} lines",
                source_label,
                dest.display(),
                report.replacements,
                report.lines_changed,
                report.lines_read
            );
            report
        }
        None => {
            let target = io::resolve_target(source)?;
            let temp = io::temp_beside(&target)?;
            let mut sink = WriterSink::new(temp, source_label.clone());
            let report = substitute(lines, identifiers, replacements, &mut sink)?;
            io::persist(sink.into_inner()?, &target)?;
            log_status!(
                "replace",
                "{} (in place): {} replacements on {} of {} lines",
                source_label,
                report.replacements,
                report.lines_changed,
                report.lines_read
            );
            report
        }
    };

    if options.require_match {
        if let Some(expected) = identifiers.fixed() {
            report.require_matches(expected, &source_label)?;
        }
    }

    Ok(report)
}
