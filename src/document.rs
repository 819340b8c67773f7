//! Raw documents: parsed text that has not been checked against the schema yet.

use std::path::{Path, PathBuf};

use serde_json::{Number, Value};

use crate::{Error, Result};

/// Limits applied to every evaluation context
#[derive(Debug, Clone, Copy)]
pub struct ScriptLimits {
    /// Maximum loop iterations before Boa throws (0 => disabled)
    pub loop_iteration_limit: u64,
    /// Maximum recursion depth before Boa throws (usize::MAX => disabled)
    pub recursion_limit: usize,
}

impl Default for ScriptLimits {
    fn default() -> Self {
        Self {
            loop_iteration_limit: 1_000_000,
            recursion_limit: 512,
        }
    }
}

/// Syntax a document is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Plain JSON object
    Json,
    /// JS module with `export default` or `module.exports`
    Script,
}

impl DocumentFormat {
    /// Pick a format from the file extension, sniffing the text when the
    /// extension says nothing.
    pub fn detect(path: &Path, text: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => DocumentFormat::Json,
            Some("js") | Some("mjs") | Some("cjs") => DocumentFormat::Script,
            _ if text.trim_start().starts_with('{') => DocumentFormat::Json,
            _ => DocumentFormat::Script,
        }
    }
}

/// A parsed config document
#[derive(Debug, Clone)]
pub struct Document {
    /// Path or label used in error messages
    pub origin: String,
    /// Directory that relative `source`, `logo` and `output.dir` paths resolve against
    pub base_dir: Option<PathBuf>,
    pub root: Value,
}

impl Document {
    pub fn parse(
        text: &str,
        origin: impl Into<String>,
        format: DocumentFormat,
        limits: ScriptLimits,
    ) -> Result<Self> {
        let origin = origin.into();
        let mut root = match format {
            DocumentFormat::Json => serde_json::from_str(text).map_err(|e| Error::ParseError {
                origin: origin.clone(),
                message: e.to_string(),
            })?,
            DocumentFormat::Script => evaluate_script(text, &origin, limits)?,
        };
        normalize_numbers(&mut root);
        Ok(Document {
            origin,
            base_dir: None,
            root,
        })
    }

    /// Attach the directory relative paths resolve against
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }
}

// Largest magnitude at which every integer is exact in an f64
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Rewrite whole-number floats (`1.0`) as integers.
///
/// JS has one number type and prints `1.0` as `1`, so a JSON document and the
/// module written from it only compare equal once both use the integer form.
pub(crate) fn normalize_numbers(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            let Some(f) = n.as_f64() else { return };
            if f.fract() != 0.0 || f.abs() > MAX_SAFE_INTEGER {
                return;
            }
            *n = if f < 0.0 {
                Number::from(f as i64)
            } else {
                Number::from(f as u64)
            };
        }
        Value::Array(items) => items.iter_mut().for_each(normalize_numbers),
        Value::Object(map) => map.values_mut().for_each(normalize_numbers),
        _ => {}
    }
}

#[cfg(feature = "js")]
fn evaluate_script(text: &str, origin: &str, limits: ScriptLimits) -> Result<Value> {
    crate::script::evaluate_module(text, origin, limits)
}

#[cfg(not(feature = "js"))]
fn evaluate_script(_text: &str, origin: &str, _limits: ScriptLimits) -> Result<Value> {
    Err(Error::ParseError {
        origin: origin.to_string(),
        message: "JS documents need the `js` feature; use a .json document instead".to_string(),
    })
}
