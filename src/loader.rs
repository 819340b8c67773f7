//! Loading: read a document, validate it, and produce a typed config.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::config::GenerationConfig;
use crate::document::{Document, DocumentFormat, ScriptLimits};
use crate::validate::{self, ValidateOptions};
use crate::{paths, Error, Result, Warning};

/// Options for a `Loader`
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    pub validate: ValidateOptions,
    pub limits: ScriptLimits,
}

/// A validated config together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: GenerationConfig,
    pub origin: String,
    /// Directory relative paths resolve against; `None` for inline documents
    pub base_dir: Option<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl LoadedConfig {
    /// Resolve a path from the document against the document's directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        paths::resolve(self.base_dir.as_deref(), path)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.resolve(&self.config.output.dir)
    }
}

/// Reads and validates config documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    options: LoadOptions,
}

impl Loader {
    pub fn new(options: LoadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Read and parse a document without validating it
    pub fn read(&self, path: &Path) -> Result<Document> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let format = DocumentFormat::detect(path, &text);
        log::debug!("read {} as {:?}", path.display(), format);

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        // Always absolute; `..` is left for `paths::resolve` to fold
        let base_dir = std::path::absolute(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
        Ok(Document::parse(&text, path.display().to_string(), format, self.options.limits)?
            .with_base_dir(base_dir))
    }

    /// Read, parse and validate a document from disk
    pub fn load(&self, path: &Path) -> Result<LoadedConfig> {
        let doc = self.read(path)?;
        self.finish(doc)
    }

    /// Parse and validate an in-memory document
    pub fn load_str(&self, text: &str, origin: &str, format: DocumentFormat) -> Result<LoadedConfig> {
        let doc = Document::parse(text, origin, format, self.options.limits)?;
        self.finish(doc)
    }

    /// Validate a parsed document and convert it into a typed config
    pub fn finish(&self, doc: Document) -> Result<LoadedConfig> {
        let warnings = validate::validate(&doc, &self.options.validate).into_result()?;
        for w in &warnings {
            log::debug!("{}", w);
        }

        let Document {
            origin,
            base_dir,
            mut root,
        } = doc;
        drop_nulls(&mut root);
        let config: GenerationConfig =
            serde_json::from_value(root).map_err(|e| Error::schema(&origin, "<root>", e.to_string()))?;

        Ok(LoadedConfig {
            config,
            origin,
            base_dir,
            warnings,
        })
    }
}

/// Treat explicit `null` as an absent key, except inside the opaque theme map.
fn drop_nulls(value: &mut Value) {
    fn walk(value: &mut Value, top_level: bool) {
        match value {
            Value::Object(map) => {
                map.retain(|_, v| !v.is_null());
                for (key, v) in map.iter_mut() {
                    if top_level && key == "theme" {
                        continue;
                    }
                    walk(v, false);
                }
            }
            Value::Array(items) => items.iter_mut().for_each(|v| walk(v, false)),
            _ => {}
        }
    }
    walk(value, true);
}

/// Load a document with default options
pub fn load(path: impl AsRef<Path>) -> Result<GenerationConfig> {
    Loader::default().load(path.as_ref()).map(|l| l.config)
}

/// Report every pair of documents whose resolved `output.dir` is the same.
pub fn check_output_collisions(configs: &[LoadedConfig]) -> Vec<Error> {
    let mut seen: HashMap<PathBuf, &str> = HashMap::new();
    let mut errors = Vec::new();
    for loaded in configs {
        let dir = loaded.output_dir();
        match seen.get(&dir) {
            Some(first) => errors.push(Error::OutputCollision {
                dir,
                first: first.to_string(),
                second: loaded.origin.clone(),
            }),
            None => {
                seen.insert(dir, &loaded.origin);
            }
        }
    }
    errors
}
