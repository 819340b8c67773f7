//! Error types for config loading and validation

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for loader operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or validating a config document
#[derive(Error, Debug)]
pub enum Error {
    /// The document could not be read from disk
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed document syntax, or a script that threw / exported nothing
    #[error("Parse error in {origin}: {message}")]
    ParseError { origin: String, message: String },

    /// A required field is missing or a field has the wrong shape
    #[error("Schema error in {origin}: `{field}` {message}")]
    SchemaError {
        origin: String,
        field: String,
        message: String,
    },

    /// Two screenshot entries share an id
    #[error(
        "Duplicate screenshot id in {origin}: `{id}` is used by screenshots[{first}] and screenshots[{second}]"
    )]
    DuplicateIdError {
        origin: String,
        id: String,
        first: usize,
        second: usize,
    },

    /// A referenced image does not exist
    #[error("Reference error in {origin}: `{field}` points to missing file {}", target.display())]
    ReferenceError {
        origin: String,
        field: String,
        target: PathBuf,
    },

    /// Two documents meant to run together write into the same directory
    #[error("Output directory {} is shared by {first} and {second}", dir.display())]
    OutputCollision {
        dir: PathBuf,
        first: String,
        second: String,
    },

    /// Every violation found in one document
    #[error("{} problem(s) in {origin}:\n{}", errors.len(), ErrorList(errors))]
    Invalid { origin: String, errors: Vec<Error> },
}

impl Error {
    pub(crate) fn schema(origin: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::SchemaError {
            origin: origin.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }

    /// Dotted path of the offending field, when the error names one
    pub fn field(&self) -> Option<&str> {
        match self {
            Error::SchemaError { field, .. } | Error::ReferenceError { field, .. } => Some(field),
            Error::DuplicateIdError { .. } => Some("screenshots"),
            _ => None,
        }
    }

    /// Flattens `Invalid` into its member errors
    pub fn into_errors(self) -> Vec<Error> {
        match self {
            Error::Invalid { errors, .. } => errors,
            other => vec![other],
        }
    }
}

struct ErrorList<'a>(&'a [Error]);

impl fmt::Display for ErrorList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}", e)?;
        }
        Ok(())
    }
}

/// A non-fatal finding, e.g. an unknown key seen by a strict loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub origin: String,
    pub field: String,
    pub message: String,
}

impl Warning {
    pub(crate) fn new(origin: &str, field: impl Into<String>, message: impl Into<String>) -> Self {
        Warning {
            origin: origin.to_string(),
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: `{}` {}", self.origin, self.field, self.message)
    }
}

/// Outcome of a validation pass: every error plus every warning
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub origin: String,
    pub errors: Vec<Error>,
    pub warnings: Vec<Warning>,
}

impl ValidationReport {
    pub fn new(origin: impl Into<String>) -> Self {
        ValidationReport {
            origin: origin.into(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors naming the given field
    pub fn errors_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a Error> + 'a {
        self.errors.iter().filter(move |e| e.field() == Some(field))
    }

    /// Converts the report into warnings on success, or `Error::Invalid`
    pub fn into_result(self) -> Result<Vec<Warning>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(Error::Invalid {
                origin: self.origin,
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_lists_every_member() {
        let err = Error::Invalid {
            origin: "a.js".into(),
            errors: vec![
                Error::schema("a.js", "template", "is required"),
                Error::schema("a.js", "output.format", "is required"),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 problem(s) in a.js"));
        assert!(text.contains("`template` is required"));
        assert!(text.contains("`output.format` is required"));
    }

    #[test]
    fn report_into_result() {
        let mut r = ValidationReport::new("x");
        r.warnings.push(Warning::new("x", "extra", "is not a known key"));
        assert_eq!(r.into_result().unwrap().len(), 1);

        let mut r = ValidationReport::new("x");
        r.errors.push(Error::schema("x", "template", "is required"));
        let errs = r.into_result().unwrap_err().into_errors();
        assert_eq!(errs[0].field(), Some("template"));
    }
}
