//! Schema and invariant checks over a loaded document.
//!
//! Validation walks the raw JSON value rather than the typed config so that a
//! missing or mistyped field is reported against its dotted path instead of
//! surfacing as a single deserialization failure. Every violation is collected;
//! nothing stops at the first problem.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde_json::{Map, Value};

use crate::config::{OutputFormat, StatusBarStyle};
use crate::document::Document;
use crate::{devices, paths, Error, ValidationReport, Warning};

const TOP_LEVEL_KEYS: &[&str] = &[
    "template",
    "output",
    "devices",
    "theme",
    "screenshots",
    "locales",
    "statusBar",
];
const OUTPUT_KEYS: &[&str] = &["dir", "format"];
const SCREENSHOT_KEYS: &[&str] = &["id", "source", "headline", "subheadline", "theme", "layout", "logo"];
const OVERRIDE_KEYS: &[&str] = &["headline", "subheadline"];
const STATUS_BAR_KEYS: &[&str] = &["enabled", "time", "battery", "showBatteryPercent", "style"];

/// How unknown keys are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Unknown keys are ignored
    #[default]
    Lenient,
    /// Unknown keys are reported as warnings
    Strict,
}

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub strictness: Strictness,
    /// Check that `source` and `logo` files exist (read-only metadata lookups)
    pub check_references: bool,
    /// Templates that render a single image and need no device list
    pub device_exempt_templates: Vec<String>,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            strictness: Strictness::Lenient,
            check_references: false,
            device_exempt_templates: vec!["feature-graphic".to_string()],
        }
    }
}

impl ValidateOptions {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
            ..Default::default()
        }
    }

    pub fn requires_devices(&self, template: &str) -> bool {
        !self.device_exempt_templates.iter().any(|t| t == template)
    }
}

/// Validate a parsed document, returning every error and warning found
pub fn validate(doc: &Document, options: &ValidateOptions) -> ValidationReport {
    validate_value(&doc.root, &doc.origin, doc.base_dir.as_deref(), options)
}

pub(crate) fn validate_value(
    root: &Value,
    origin: &str,
    base_dir: Option<&Path>,
    options: &ValidateOptions,
) -> ValidationReport {
    let mut checker = Checker {
        origin,
        base_dir,
        options,
        report: ValidationReport::new(origin),
    };
    checker.check_root(root);
    checker.report
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

struct Checker<'a> {
    origin: &'a str,
    base_dir: Option<&'a Path>,
    options: &'a ValidateOptions,
    report: ValidationReport,
}

impl<'a> Checker<'a> {
    fn error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.report.errors.push(Error::schema(self.origin, field, message));
    }

    fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.report.warnings.push(Warning::new(self.origin, field, message));
    }

    fn unknown_keys(&mut self, obj: &Map<String, Value>, known: &[&str], prefix: &str) {
        for key in obj.keys().filter(|k| !known.contains(&k.as_str())) {
            let field = join(prefix, key);
            match self.options.strictness {
                Strictness::Lenient => log::debug!("{}: ignoring unknown key `{}`", self.origin, field),
                Strictness::Strict => self.warn(field, "is not a known key and will be ignored"),
            }
        }
    }

    /// A required, non-empty string field
    fn required_str<'v>(&mut self, obj: &'v Map<String, Value>, key: &str, field: &str) -> Option<&'v str> {
        match obj.get(key) {
            None | Some(Value::Null) => {
                self.error(field, "is required");
                None
            }
            Some(v) => self.non_empty_str(v, field),
        }
    }

    /// An optional string field; `non_empty` rejects blank values
    fn optional_str<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
        field: &str,
        non_empty: bool,
    ) -> Option<&'v str> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(v) if non_empty => self.non_empty_str(v, field),
            Some(Value::String(s)) => Some(s),
            Some(v) => {
                self.error(field, format!("must be a string, found {}", kind(v)));
                None
            }
        }
    }

    fn non_empty_str<'v>(&mut self, v: &'v Value, field: &str) -> Option<&'v str> {
        match v {
            Value::String(s) if s.trim().is_empty() => {
                self.error(field, "must not be empty");
                None
            }
            Value::String(s) => Some(s),
            other => {
                self.error(field, format!("must be a string, found {}", kind(other)));
                None
            }
        }
    }

    fn optional_bool(&mut self, obj: &Map<String, Value>, key: &str, field: &str) {
        match obj.get(key) {
            None | Some(Value::Null) | Some(Value::Bool(_)) => {}
            Some(v) => self.error(field, format!("must be a boolean, found {}", kind(v))),
        }
    }

    fn check_reference(&mut self, field: &str, target: &str) {
        if !self.options.check_references {
            return;
        }
        let resolved = paths::resolve(self.base_dir, Path::new(target));
        if !resolved.is_file() {
            self.report.errors.push(Error::ReferenceError {
                origin: self.origin.to_string(),
                field: field.to_string(),
                target: resolved,
            });
        }
    }

    fn check_root(&mut self, root: &Value) {
        let Some(obj) = root.as_object() else {
            self.error("<root>", format!("must be an object, found {}", kind(root)));
            return;
        };

        self.unknown_keys(obj, TOP_LEVEL_KEYS, "");

        let template = self.required_str(obj, "template", "template");
        self.check_output(obj.get("output"));
        self.check_devices(obj.get("devices"), template);

        match obj.get("theme") {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(v) => self.error("theme", format!("must be an object, found {}", kind(v))),
        }

        let ids = self.check_screenshots(obj.get("screenshots"));
        if let Some(locales) = obj.get("locales") {
            self.check_locales(locales, &ids);
        }
        if let Some(status_bar) = obj.get("statusBar") {
            self.check_status_bar(status_bar);
        }
    }

    fn check_output(&mut self, output: Option<&Value>) {
        let obj = match output {
            None | Some(Value::Null) => {
                self.error("output", "is required");
                return;
            }
            Some(Value::Object(obj)) => obj,
            Some(v) => {
                self.error("output", format!("must be an object, found {}", kind(v)));
                return;
            }
        };

        self.unknown_keys(obj, OUTPUT_KEYS, "output");
        self.required_str(obj, "dir", "output.dir");
        if let Some(format) = self.required_str(obj, "format", "output.format") {
            if OutputFormat::parse(format).is_none() {
                let known: Vec<_> = OutputFormat::ALL.iter().map(|f| f.as_str()).collect();
                self.error(
                    "output.format",
                    format!("has unknown value `{}` (expected one of {})", format, known.join(", ")),
                );
            }
        }
    }

    fn check_devices(&mut self, devices: Option<&Value>, template: Option<&str>) {
        let list = match devices {
            None | Some(Value::Null) => &[] as &[Value],
            Some(Value::Array(list)) => list.as_slice(),
            Some(v) => {
                self.error("devices", format!("must be a list, found {}", kind(v)));
                return;
            }
        };

        let mut seen = HashSet::new();
        for (i, item) in list.iter().enumerate() {
            let field = format!("devices[{}]", i);
            let Some(id) = self.non_empty_str(item, &field) else {
                continue;
            };
            if !seen.insert(id) {
                self.warn(field, format!("repeats device `{}`", id));
            } else if devices::lookup(id).is_none() {
                self.warn(field, format!("`{}` is not a known device class", id));
            }
        }

        if let Some(template) = template {
            if list.is_empty() && self.options.requires_devices(template) {
                self.error(
                    "devices",
                    format!("must list at least one device class for template `{}`", template),
                );
            }
        }
    }

    /// Returns the valid ids, used to check locale overrides
    fn check_screenshots(&mut self, screenshots: Option<&Value>) -> HashSet<String> {
        let mut ids = HashSet::new();
        let list = match screenshots {
            None | Some(Value::Null) => {
                self.error("screenshots", "is required");
                return ids;
            }
            Some(Value::Array(list)) => list,
            Some(v) => {
                self.error("screenshots", format!("must be a list, found {}", kind(v)));
                return ids;
            }
        };

        if list.is_empty() {
            self.warn("screenshots", "is empty; nothing will be rendered");
        }

        let mut first_seen: HashMap<&str, usize> = HashMap::new();
        for (i, entry) in list.iter().enumerate() {
            let prefix = format!("screenshots[{}]", i);
            let Some(obj) = entry.as_object() else {
                self.error(prefix, format!("must be an object, found {}", kind(entry)));
                continue;
            };

            self.unknown_keys(obj, SCREENSHOT_KEYS, &prefix);

            if let Some(id) = self.required_str(obj, "id", &join(&prefix, "id")) {
                match first_seen.get(id).copied() {
                    Some(first) => self.report.errors.push(Error::DuplicateIdError {
                        origin: self.origin.to_string(),
                        id: id.to_string(),
                        first,
                        second: i,
                    }),
                    None => {
                        first_seen.insert(id, i);
                        ids.insert(id.to_string());
                    }
                }
            }

            let source_field = join(&prefix, "source");
            if let Some(source) = self.required_str(obj, "source", &source_field) {
                self.check_reference(&source_field, source);
            }
            self.optional_str(obj, "headline", &join(&prefix, "headline"), false);
            self.optional_str(obj, "subheadline", &join(&prefix, "subheadline"), false);
            self.optional_str(obj, "theme", &join(&prefix, "theme"), true);
            self.optional_str(obj, "layout", &join(&prefix, "layout"), true);
            let logo_field = join(&prefix, "logo");
            if let Some(logo) = self.optional_str(obj, "logo", &logo_field, true) {
                self.check_reference(&logo_field, logo);
            }
        }
        ids
    }

    fn check_locales(&mut self, locales: &Value, ids: &HashSet<String>) {
        let obj = match locales {
            Value::Null => return,
            Value::Object(obj) => obj,
            v => {
                self.error("locales", format!("must be an object, found {}", kind(v)));
                return;
            }
        };

        for (locale, overrides) in obj {
            let locale_field = join("locales", locale);
            if locale.trim().is_empty() {
                self.error(locale_field.clone(), "locale code must not be empty");
            }
            let Some(overrides) = overrides.as_object() else {
                self.error(locale_field, format!("must be an object, found {}", kind(overrides)));
                continue;
            };
            for (id, text) in overrides {
                let field = join(&locale_field, id);
                if !ids.contains(id) {
                    self.error(field.clone(), "does not match any screenshot id");
                }
                let Some(text) = text.as_object() else {
                    self.error(field, format!("must be an object, found {}", kind(text)));
                    continue;
                };
                self.unknown_keys(text, OVERRIDE_KEYS, &field);
                self.optional_str(text, "headline", &join(&field, "headline"), false);
                self.optional_str(text, "subheadline", &join(&field, "subheadline"), false);
            }
        }
    }

    fn check_status_bar(&mut self, status_bar: &Value) {
        let obj = match status_bar {
            Value::Null => return,
            Value::Object(obj) => obj,
            v => {
                self.error("statusBar", format!("must be an object, found {}", kind(v)));
                return;
            }
        };

        self.unknown_keys(obj, STATUS_BAR_KEYS, "statusBar");
        self.optional_bool(obj, "enabled", "statusBar.enabled");
        self.optional_bool(obj, "showBatteryPercent", "statusBar.showBatteryPercent");
        self.optional_str(obj, "time", "statusBar.time", true);

        match obj.get("battery") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_u64() {
                Some(level) if level <= 100 => {}
                _ => self.error("statusBar.battery", "must be an integer between 0 and 100"),
            },
        }

        if let Some(style) = self.optional_str(obj, "style", "statusBar.style", true) {
            if serde_json::from_value::<StatusBarStyle>(Value::String(style.to_string())).is_err() {
                self.error(
                    "statusBar.style",
                    format!("has unknown value `{}` (expected one of auto, light, dark)", style),
                );
            }
        }
    }
}
