//! Input validation primitives.
//!
//! Replaces verbose if-empty + Error::validation_invalid_argument chains.

use crate::error::{Error, Result};

/// Require a string to be non-empty. Identifiers are literal, so surrounding
/// whitespace is kept.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::validation_invalid_argument(field, message))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_non_empty_keeps_whitespace() {
        assert_eq!(require_non_empty(" x ", "identifier", "empty").unwrap(), " x ");
    }

    #[test]
    fn require_non_empty_rejects_empty() {
        let err = require_non_empty("", "identifier", "Identifier cannot be empty").unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_argument");
        assert_eq!(err.details["field"], "identifier");
    }
}
