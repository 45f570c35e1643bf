use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigInvalidJson,

    ValidationMissingArgument,
    ValidationInvalidArgument,

    SourceNotFound,
    IdentifierNotFound,

    StrategyFailed,

    InternalIoError,
    InternalJsonError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalidJson => "config.invalid_json",

            ErrorCode::ValidationMissingArgument => "validation.missing_argument",
            ErrorCode::ValidationInvalidArgument => "validation.invalid_argument",

            ErrorCode::SourceNotFound => "source.not_found",
            ErrorCode::IdentifierNotFound => "replace.identifier_not_found",

            ErrorCode::StrategyFailed => "strategy.failed",

            ErrorCode::InternalIoError => "internal.io_error",
            ErrorCode::InternalJsonError => "internal.json_error",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    pub details: Value,
    pub hints: Vec<Hint>,
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigInvalidJsonDetails {
    pub path: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingArgumentDetails {
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidArgumentDetails {
    pub field: String,
    pub problem: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceNotFoundDetails {
    pub path: String,
}

/// Context for a strict run that expected an identifier and never saw it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierNotFoundDetails {
    pub file: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyFailedDetails {
    pub strategy: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalIoErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternalJsonErrorDetails {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

fn to_details<T: Serialize>(details: T) -> Value {
    serde_json::to_value(details).unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

impl Error {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Value) -> Self {
        Self {
            code,
            message: message.into(),
            details,
            hints: Vec::new(),
        }
    }

    pub fn validation_missing_argument(args: Vec<String>) -> Self {
        Self::new(
            ErrorCode::ValidationMissingArgument,
            "Missing required argument",
            to_details(MissingArgumentDetails { args }),
        )
    }

    pub fn validation_invalid_argument(
        field: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::new(
            ErrorCode::ValidationInvalidArgument,
            "Invalid argument",
            to_details(InvalidArgumentDetails {
                field: field.into(),
                problem: problem.into(),
            }),
        )
    }

    pub fn config_invalid_json(path: impl Into<String>, err: serde_json::Error) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidJson,
            "Invalid JSON in replacement map",
            to_details(ConfigInvalidJsonDetails {
                path: path.into(),
                error: err.to_string(),
            }),
        )
        .with_hint("Expected an object like {\"replacements\": {\"NAME\": \"value\"}}")
    }

    pub fn source_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(
            ErrorCode::SourceNotFound,
            format!("Source file '{}' does not exist", path),
            to_details(SourceNotFoundDetails { path }),
        )
    }

    pub fn identifier_not_found(
        file: impl Into<String>,
        identifier: impl Into<String>,
        line: Option<String>,
    ) -> Self {
        let identifier = identifier.into();
        Self::new(
            ErrorCode::IdentifierNotFound,
            format!("Identifier '{}' was not found", identifier),
            to_details(IdentifierNotFoundDetails {
                file: file.into(),
                identifier,
                line,
            }),
        )
        .with_hint("Drop --require-match to treat missing identifiers as a no-op")
    }

    /// Wrap a caller-side failure raised from inside an identifier source or
    /// replacement strategy.
    pub fn strategy_failed(strategy: impl Into<String>, error: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::StrategyFailed,
            "Substitution strategy failed",
            to_details(StrategyFailedDetails {
                strategy: strategy.into(),
                error: error.into(),
            }),
        )
    }

    pub fn internal_io(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalIoError,
            "IO error",
            to_details(InternalIoErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn internal_json(error: impl Into<String>, context: Option<String>) -> Self {
        Self::new(
            ErrorCode::InternalJsonError,
            "JSON error",
            to_details(InternalJsonErrorDetails {
                error: error.into(),
                context,
            }),
        )
    }

    pub fn with_hint(mut self, message: impl Into<String>) -> Self {
        self.hints.push(Hint {
            message: message.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_dotted() {
        assert_eq!(ErrorCode::SourceNotFound.as_str(), "source.not_found");
        assert_eq!(
            ErrorCode::IdentifierNotFound.as_str(),
            "replace.identifier_not_found"
        );
    }

    #[test]
    fn identifier_not_found_carries_context() {
        let err = Error::identifier_not_found("notes.txt", "TOKEN", None);
        assert_eq!(err.code, ErrorCode::IdentifierNotFound);
        assert_eq!(err.details["file"], "notes.txt");
        assert_eq!(err.details["identifier"], "TOKEN");
        assert!(err.details.get("line").is_none());
        assert_eq!(err.hints.len(), 1);
    }

    #[test]
    fn display_uses_message() {
        let err = Error::source_not_found("/tmp/missing.txt");
        assert_eq!(err.to_string(), "Source file '/tmp/missing.txt' does not exist");
    }
}
