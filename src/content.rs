//! Letter content resolution.
//!
//! The page may hand us the letter as a single string field on a global object.
//! Three outcomes matter and are kept apart on purpose:
//! - field missing -> the built-in default message,
//! - field present but blank after trimming -> no lines at all (the book stays hidden),
//! - field unreadable or not a string -> default message plus a warning.

use thiserror::Error;

use crate::DEFAULT_MESSAGE;

/// What a content source found where the letter field should be.
#[derive(Clone, Debug, PartialEq)]
pub enum LetterField {
    Missing,
    Text(String),
    /// Field exists but holds something else; carries a short type description.
    NotText(String),
}

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("letter content access failed: {0}")]
    Access(String),
}

/// Anything that can be asked for the letter field.
pub trait ContentSource {
    fn letter_field(&self) -> Result<LetterField, ContentError>;
}

/// A fixed field value, handy for tests and for embedding the letter directly.
impl ContentSource for LetterField {
    fn letter_field(&self) -> Result<LetterField, ContentError> {
        Ok(self.clone())
    }
}

#[cfg(feature = "serde_json")]
impl ContentSource for serde_json::Value {
    fn letter_field(&self) -> Result<LetterField, ContentError> {
        Ok(match self.get("letterContent") {
            None => LetterField::Missing,
            Some(serde_json::Value::String(s)) => LetterField::Text(s.clone()),
            Some(other) => LetterField::NotText(json_kind(other).to_string()),
        })
    }
}

#[cfg(feature = "serde_json")]
fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

pub fn default_lines() -> Vec<String> {
    DEFAULT_MESSAGE.iter().map(|s| s.to_string()).collect()
}

/// Trimmed, non-blank lines of `raw`. Accepts `\n` and `\r\n` endings.
pub fn split_letter(raw: &str) -> Vec<String> {
    raw.trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Lines to type for this source. Never fails; an empty result means "show nothing".
pub fn resolve_lines(source: &dyn ContentSource) -> Vec<String> {
    match source.letter_field() {
        Ok(LetterField::Missing) => default_lines(),
        Ok(LetterField::Text(raw)) => split_letter(&raw),
        Ok(LetterField::NotText(kind)) => {
            log::warn!("letter content is a {kind}, not a string; using default message");
            default_lines()
        }
        Err(e) => {
            log::warn!("{e}; using default message");
            default_lines()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Throwing;

    impl ContentSource for Throwing {
        fn letter_field(&self) -> Result<LetterField, ContentError> {
            Err(ContentError::Access("getter threw".into()))
        }
    }

    #[test]
    fn test_missing_field_uses_default() {
        assert_eq!(resolve_lines(&LetterField::Missing), default_lines());
        assert_eq!(default_lines().len(), 2);
    }

    #[test]
    fn test_blank_field_suppresses() {
        assert!(resolve_lines(&LetterField::Text(String::new())).is_empty());
        assert!(resolve_lines(&LetterField::Text(" \r\n \n\t".into())).is_empty());
    }

    #[test]
    fn test_lines_are_trimmed_and_blank_lines_dropped() {
        let lines = resolve_lines(&LetterField::Text("  a \n\nb  \n".into()));
        assert_eq!(lines, vec!["a", "b"]);
        let crlf = resolve_lines(&LetterField::Text("one\r\n  two\r\n".into()));
        assert_eq!(crlf, vec!["one", "two"]);
    }

    #[test]
    fn test_wrong_type_and_access_failure_use_default() {
        assert_eq!(resolve_lines(&LetterField::NotText("number".into())), default_lines());
        assert_eq!(resolve_lines(&Throwing), default_lines());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn test_json_source() {
        let missing = serde_json::json!({ "other": 1 });
        assert_eq!(resolve_lines(&missing), default_lines());
        let wrong = serde_json::json!({ "letterContent": 42 });
        assert_eq!(resolve_lines(&wrong), default_lines());
        let text = serde_json::json!({ "letterContent": "hi\nthere" });
        assert_eq!(resolve_lines(&text), vec!["hi", "there"]);
    }
}
