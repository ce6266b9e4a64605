//! Catalog document model.
//!
//! The catalog is a YAML document with a top-level `models` sequence plus
//! arbitrary sibling content. The whole document is held as a
//! [`serde_yaml::Mapping`] so entry order and non-model keys pass through a
//! resolution run untouched; only `required` and `label` are rewritten.

use crate::error::{ModelcatError, Result};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// Declared model type of a catalog entry.
///
/// Unrecognized type strings are kept verbatim so they round-trip; no
/// classification heuristic exists for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelType {
    Stt,
    Tts,
    Vad,
    Vision,
    Unknown(String),
}

impl ModelType {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "stt" => Self::Stt,
            "tts" => Self::Tts,
            "vad" => Self::Vad,
            "vision" => Self::Vision,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Stt => "stt",
            Self::Tts => "tts",
            Self::Vad => "vad",
            Self::Vision => "vision",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed read-only view of one catalog entry.
///
/// Derived fields (`required`, the regenerated `label`) are written back
/// through [`Catalog::set_resolution`], never through this view.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub key: String,
    pub model_type: ModelType,
    pub kind: String,
    pub url: String,
    pub folder: String,
    pub label: String,
}

/// Raw fields of a catalog entry, each held as YAML so one mis-typed
/// value cannot invalidate the others. Everything else passes through
/// untouched in the underlying mapping.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    key: Option<Value>,
    #[serde(rename = "type")]
    model_type: Option<Value>,
    kind: Option<Value>,
    url: Option<Value>,
    folder: Option<Value>,
    label: Option<Value>,
}

/// Scalar field as a string; numbers and booleans coerce (`key: 2023`
/// reads as `"2023"`), sequences and mappings do not.
fn scalar_string(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// The catalog document, loaded once per run.
#[derive(Debug, Clone)]
pub struct Catalog {
    doc: Mapping,
}

impl Catalog {
    /// Load the catalog from disk. A missing or unparsable file is fatal
    /// for the whole run.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModelcatError::CatalogNotFound {
                path: path.display().to_string(),
            });
        }
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let doc: Mapping = serde_yaml::from_str(text)?;
        Ok(Self { doc })
    }

    /// Number of entries under the `models` key.
    pub fn model_count(&self) -> usize {
        match self.doc.get("models") {
            Some(Value::Sequence(models)) => models.len(),
            _ => 0,
        }
    }

    /// Typed views of all catalog entries, in document order.
    ///
    /// Fields degrade individually: entries without a usable `key` get a
    /// positional fallback (`model_1`, ...), a missing `type` reads as
    /// `unknown`, and a mis-typed field never discards its siblings.
    pub fn descriptors(&self) -> Vec<Descriptor> {
        let Some(Value::Sequence(models)) = self.doc.get("models") else {
            return Vec::new();
        };

        models
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let raw: RawEntry =
                    serde_yaml::from_value(entry.clone()).unwrap_or_default();
                let key = scalar_string(&raw.key)
                    .filter(|key| !key.is_empty())
                    .unwrap_or_else(|| format!("model_{}", index + 1));
                let raw_type =
                    scalar_string(&raw.model_type).unwrap_or_else(|| "unknown".to_string());
                Descriptor {
                    key,
                    model_type: ModelType::parse(&raw_type),
                    kind: scalar_string(&raw.kind).unwrap_or_default(),
                    url: scalar_string(&raw.url).unwrap_or_default(),
                    folder: scalar_string(&raw.folder).unwrap_or_default(),
                    label: scalar_string(&raw.label).unwrap_or_default(),
                }
            })
            .collect()
    }

    /// Overwrite the derived fields of the entry at `index`.
    ///
    /// Existing keys keep their document position; keys not present yet are
    /// appended at the end of the entry.
    pub fn set_resolution(&mut self, index: usize, required: &[String], label: &str) {
        let Some(Value::Mapping(entry)) = self
            .doc
            .get_mut("models")
            .and_then(|models| match models {
                Value::Sequence(models) => models.get_mut(index),
                _ => None,
            })
        else {
            return;
        };

        let required_value = Value::Sequence(
            required
                .iter()
                .map(|file| Value::String(file.clone()))
                .collect(),
        );
        entry.insert(Value::String("required".to_string()), required_value);
        entry.insert(
            Value::String("label".to_string()),
            Value::String(label.to_string()),
        );
    }

    /// Serialize the catalog with blank lines between model entries.
    pub fn to_yaml_string(&self) -> Result<String> {
        let raw = serde_yaml::to_string(&self.doc)?;
        Ok(insert_entry_separators(&raw))
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_yaml_string()?)?;
        Ok(())
    }
}

/// Insert a blank line before every model entry after the first.
///
/// Purely textual: inside the `models:` block, an entry starts at a line
/// whose trimmed text begins with `- ` at the indent of the first list
/// item. Deeper-indented list items (e.g. the `required` file list) are
/// left alone, as is every other top-level block.
pub fn insert_entry_separators(yaml: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_models = false;
    let mut entry_indent: Option<usize> = None;
    let mut seen_entry = false;

    for line in yaml.lines() {
        let trimmed = line.trim_start();
        let indent = line.len() - trimmed.len();

        // A non-indented, non-item line starts a new top-level block.
        if indent == 0 && !trimmed.is_empty() && !trimmed.starts_with("- ") {
            in_models = trimmed.starts_with("models:");
            entry_indent = None;
            seen_entry = false;
        }

        if in_models && trimmed.starts_with("- ") {
            let is_entry = match entry_indent {
                None => {
                    entry_indent = Some(indent);
                    true
                }
                Some(expected) => indent == expected,
            };
            if is_entry {
                if seen_entry && out.last().is_some_and(|prev| !prev.trim().is_empty()) {
                    out.push("");
                }
                seen_entry = true;
            }
        }

        out.push(line);
    }

    let mut result = out.join("\n");
    if yaml.ends_with('\n') {
        result.push('\n');
    }
    result
}
