//! Typed generation config
//!
//! These are the values handed to the screenshot renderer once a document has
//! passed validation. Field names follow the host tool's camelCase keys so a
//! config can be serialized back into a document the tool accepts.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::validate::ValidateOptions;
use crate::ValidationReport;

/// Theme variables injected verbatim into the template (usually as CSS variables)
pub type Theme = BTreeMap<String, serde_json::Value>;

/// locale code -> screenshot id -> text override
pub type LocaleOverrides = BTreeMap<String, BTreeMap<String, TextOverride>>;

/// One generation job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Template name known to the renderer
    pub template: String,
    pub output: OutputSettings,
    /// Device classes to render, in order
    #[serde(default)]
    pub devices: Vec<String>,
    #[serde(default)]
    pub theme: Theme,
    pub screenshots: Vec<ScreenshotEntry>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub locales: LocaleOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_bar: Option<StatusBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Output directory, relative to the document's directory unless absolute
    pub dir: PathBuf,
    pub format: OutputFormat,
}

/// Encoding of the rendered images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Webp];

    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Webp => "webp",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single screenshot to render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotEntry {
    /// Unique within one config; also names the output files
    pub id: String,
    /// Input image, relative to the document's directory unless absolute
    pub source: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
    /// Visual variant such as "dark" or "light"; the template picks a default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Text placement hint such as "top" or "bottom"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<PathBuf>,
}

/// Per-locale replacement for a screenshot's display text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheadline: Option<String>,
}

/// Simulated status bar painted over the source screenshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBar {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Battery level in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_battery_percent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StatusBarStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarStyle {
    Auto,
    Light,
    Dark,
}

impl GenerationConfig {
    /// Look up a screenshot by id
    pub fn screenshot(&self, id: &str) -> Option<&ScreenshotEntry> {
        self.screenshots.iter().find(|s| s.id == id)
    }

    /// Text override for `id` in `locale`, if the document declares one
    pub fn locale_override(&self, locale: &str, id: &str) -> Option<&TextOverride> {
        self.locales.get(locale).and_then(|m| m.get(id))
    }

    /// Check this config against the same rules a loaded document goes through
    pub fn validate(&self, options: &ValidateOptions) -> ValidationReport {
        match serde_json::to_value(self) {
            Ok(value) => crate::validate::validate_value(&value, "<config>", None, options),
            Err(e) => {
                let mut report = ValidationReport::new("<config>");
                report.errors.push(serialize_error(e));
                report
            }
        }
    }

    /// Canonical JSON form (object keys sorted)
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        serde_json::to_string_pretty(self).map_err(serialize_error)
    }

    /// Document text in the host tool's module format
    pub fn to_module_source(&self) -> crate::Result<String> {
        Ok(format!("export default {};\n", self.to_json_pretty()?))
    }

    /// Hex SHA-256 of the compact canonical JSON form.
    ///
    /// Two configs with equal contents share a fingerprint regardless of the
    /// document format or key order they were loaded from. Whole-number theme
    /// values hash the same whether written `1` or `1.0`.
    pub fn fingerprint(&self) -> crate::Result<String> {
        let mut value = serde_json::to_value(self).map_err(serialize_error)?;
        crate::document::normalize_numbers(&mut value);
        let bytes = serde_json::to_vec(&value).map_err(serialize_error)?;
        Ok(hex::encode(Sha256::digest(&bytes)))
    }
}

// Only non UTF-8 paths can fail here
fn serialize_error(e: serde_json::Error) -> crate::Error {
    crate::Error::schema("<config>", "<root>", format!("cannot be serialized: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> GenerationConfig {
        GenerationConfig {
            template: "default".into(),
            output: OutputSettings {
                dir: "./output".into(),
                format: OutputFormat::Png,
            },
            devices: vec!["iphone-6.5".into()],
            theme: Theme::from([("primary".to_string(), serde_json::json!("#014226"))]),
            screenshots: vec![ScreenshotEntry {
                id: "01_home".into(),
                source: "./shots/home.png".into(),
                headline: Some("Home".into()),
                subheadline: None,
                theme: Some("dark".into()),
                layout: Some("top".into()),
                logo: None,
            }],
            locales: LocaleOverrides::new(),
            status_bar: None,
        }
    }

    #[test]
    fn output_format_names() {
        assert_eq!(OutputFormat::parse("png"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::parse("jpeg"), Some(OutputFormat::Jpeg));
        assert_eq!(OutputFormat::parse("gif"), None);
        assert_eq!(OutputFormat::Webp.to_string(), "webp");
    }

    #[test]
    fn serializes_camel_case_and_skips_empty_optionals() {
        let mut cfg = sample();
        cfg.status_bar = Some(StatusBar {
            enabled: true,
            time: Some("9:41".into()),
            battery: Some(100),
            show_battery_percent: Some(true),
            style: Some(StatusBarStyle::Auto),
        });
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["statusBar"]["showBatteryPercent"], true);
        assert_eq!(v["statusBar"]["style"], "auto");
        assert!(v.get("locales").is_none());
        assert!(v["screenshots"][0].get("subheadline").is_none());
    }

    #[test]
    fn module_source_has_default_export() {
        let src = sample().to_module_source().unwrap();
        assert!(src.starts_with("export default {"));
        assert!(src.trim_end().ends_with("};"));
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        b.screenshots[0].headline = Some("Changed".into());
        assert_ne!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
        assert_eq!(a.fingerprint().unwrap().len(), 64);
    }

    #[test]
    fn fingerprint_ignores_float_spelling() {
        let mut a = sample();
        let mut b = sample();
        a.theme.insert("opacity".into(), serde_json::json!(1.0));
        b.theme.insert("opacity".into(), serde_json::json!(1));
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn typed_config_validates() {
        let report = sample().validate(&ValidateOptions::default());
        assert!(report.is_ok(), "{:?}", report.errors);
    }
}
