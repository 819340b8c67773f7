//! storepix config loader
//!
//! Typed loading and validation for the configuration documents consumed by
//! the storepix screenshot generator. A document describes one generation job:
//! the template, where and how to write output, which device classes to
//! render, theme variables, and the ordered list of screenshots (with optional
//! per-locale text overrides).
//!
//! Loading is a pure function from document text to a validated
//! [`GenerationConfig`] or a list of structured errors. Nothing here renders
//! images, writes files or runs external commands.
//!
//! # Example
//!
//! ```no_run
//! use storepix_config::{LoadOptions, Loader};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let loader = Loader::new(LoadOptions::default());
//! let loaded = loader.load("storepix/storepix.config.js".as_ref())?;
//! println!("{} screenshots -> {}", loaded.config.screenshots.len(), loaded.output_dir().display());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod devices;
pub mod document;
pub mod error;
pub mod loader;
pub mod paths;
pub mod validate;

// JS module documents, evaluated with Boa
#[cfg(feature = "js")]
pub mod script;

pub use config::{
    GenerationConfig, LocaleOverrides, OutputFormat, OutputSettings, ScreenshotEntry, StatusBar,
    StatusBarStyle, TextOverride, Theme,
};
pub use document::{Document, DocumentFormat, ScriptLimits};
pub use error::{Error, Result, ValidationReport, Warning};
pub use loader::{check_output_collisions, load, LoadOptions, LoadedConfig, Loader};
pub use validate::{validate, Strictness, ValidateOptions};
