use clap::{Args, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

use linesub::config::MapConfig;
use linesub::files;
use linesub::io::expand_path;
use linesub::replace::{Constant, FixedIdentifiers, SubstitutionOptions, SubstitutionReport};
use linesub::validation;

use crate::commands::CmdResult;

#[derive(Args)]
pub struct ReplaceArgs {
    #[command(subcommand)]
    command: ReplaceCommand,
}

#[derive(Subcommand)]
enum ReplaceCommand {
    /// Replace fixed identifiers with one piece of text
    Fixed {
        /// File to read (rewritten in place unless --out is given)
        file: String,
        /// Identifier to replace (repeatable, processed in the order given)
        #[arg(short, long = "identifier", required = true)]
        identifiers: Vec<String>,
        /// Replacement text
        #[arg(long = "with")]
        replacement: String,
        /// Write to this file instead of overwriting the source
        #[arg(short, long)]
        out: Option<String>,
        /// Fail when an identifier never appears in the file
        #[arg(long)]
        require_match: bool,
    },
    /// Replace identifiers using a JSON replacement map
    Map {
        /// File to read (rewritten in place unless --out is given)
        file: String,
        /// Replacement map: inline JSON, @path, or - for stdin
        #[arg(short, long)]
        map: String,
        /// Write to this file instead of overwriting the source
        #[arg(short, long)]
        out: Option<String>,
        /// Fail when a mapped identifier never appears in the file
        #[arg(long)]
        require_match: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutput {
    pub command: &'static str,
    pub source: String,
    pub destination: String,
    pub in_place: bool,
    #[serde(flatten)]
    pub report: SubstitutionReport,
}

pub fn run(args: ReplaceArgs, _global: &crate::commands::GlobalArgs) -> CmdResult<ReplaceOutput> {
    match args.command {
        ReplaceCommand::Fixed {
            file,
            identifiers,
            replacement,
            out,
            require_match,
        } => run_fixed(&file, identifiers, &replacement, out.as_deref(), require_match),
        ReplaceCommand::Map {
            file,
            map,
            out,
            require_match,
        } => run_map(&file, &map, out.as_deref(), require_match),
    }
}

fn run_fixed(
    file: &str,
    identifiers: Vec<String>,
    replacement: &str,
    out: Option<&str>,
    require_match: bool,
) -> CmdResult<ReplaceOutput> {
    for identifier in &identifiers {
        validation::require_non_empty(identifier, "identifier", "Identifier cannot be empty")?;
    }

    let source = expand_path(file);
    let destination = out.map(expand_path);

    let report = files::replace_with_options(
        &source,
        destination.as_deref(),
        &mut FixedIdentifiers::new(identifiers),
        &mut Constant::new(replacement),
        SubstitutionOptions { require_match },
    )?;

    Ok(finish("replace.fixed", &source, destination, report))
}

fn run_map(
    file: &str,
    map_spec: &str,
    out: Option<&str>,
    require_match: bool,
) -> CmdResult<ReplaceOutput> {
    let (mut identifiers, mut replacements) = MapConfig::load(map_spec)?.substitution()?;

    let source = expand_path(file);
    let destination = out.map(expand_path);

    let report = files::replace_with_options(
        &source,
        destination.as_deref(),
        identifiers.as_mut(),
        replacements.as_mut(),
        SubstitutionOptions { require_match },
    )?;

    Ok(finish("replace.map", &source, destination, report))
}

fn finish(
    command: &'static str,
    source: &Path,
    destination: Option<PathBuf>,
    report: SubstitutionReport,
) -> (ReplaceOutput, i32) {
    let in_place = destination.is_none();
    let destination = destination.unwrap_or_else(|| source.to_path_buf());

    // Nothing replaced is reported like a search with no hits
    let exit_code = if report.is_unchanged() { 1 } else { 0 };

    (
        ReplaceOutput {
            command,
            source: source.display().to_string(),
            destination: destination.display().to_string(),
            in_place,
            report,
        },
        exit_code,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesub::ErrorCode;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finish_exit_code_follows_replacements() {
        let source = Path::new("in.txt");

        let (output, code) = finish("replace.fixed", source, None, SubstitutionReport::default());
        assert_eq!(code, 1);
        assert!(output.in_place);
        assert_eq!(output.destination, "in.txt");

        let report = SubstitutionReport {
            lines_read: 1,
            lines_changed: 1,
            replacements: 1,
            ..Default::default()
        };
        let (output, code) = finish(
            "replace.fixed",
            source,
            Some(PathBuf::from("out.txt")),
            report,
        );
        assert_eq!(code, 0);
        assert!(!output.in_place);
        assert_eq!(output.destination, "out.txt");
    }

    #[test]
    fn map_with_spans_rewrites_by_inner_text() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("template.txt");
        fs::write(&source, "Hello <<<<name>>>>, v<<<<version>>>>\n").unwrap();

        let map = r#"{"replacements": {"name": "world", "version": "1.2"}, "spans": {"open": "<<<<", "close": ">>>>"}}"#;
        let (output, code) = run_map(&source.display().to_string(), map, None, false).unwrap();

        assert_eq!(code, 0);
        assert_eq!(output.report.replacements, 2);
        assert_eq!(fs::read_to_string(&source).unwrap(), "Hello world, v1.2\n");
    }

    #[test]
    fn map_without_entries_or_spans_is_rejected() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.txt");
        fs::write(&source, "text\n").unwrap();

        let err = run_map(
            &source.display().to_string(),
            r#"{"replacements": {}}"#,
            None,
            false,
        )
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationMissingArgument);
        assert_eq!(fs::read_to_string(&source).unwrap(), "text\n");
    }

    #[test]
    fn fixed_without_hits_exits_one() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("in.txt");
        let out = dir.path().join("out.txt");
        fs::write(&source, "plain\n").unwrap();

        let (output, code) = run_fixed(
            &source.display().to_string(),
            vec!["ABSENT".to_string()],
            "x",
            Some(&out.display().to_string()),
            false,
        )
        .unwrap();

        assert_eq!(code, 1);
        assert!(output.report.is_unchanged());
        assert_eq!(fs::read_to_string(&out).unwrap(), "plain\n");
    }

    #[test]
    fn fixed_rejects_empty_identifier() {
        let err = run_fixed("in.txt", vec![String::new()], "x", None, false).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationInvalidArgument);
    }
}
