//! Label generation from descriptor metadata.
//!
//! Pure string composition, no I/O and no failure modes: when nothing can
//! be inferred the label degrades to the bare key.

use crate::catalog::{Descriptor, ModelType};
use std::collections::BTreeSet;

/// Compose the standardized label for a descriptor.
///
/// Shape: `"<key> [<Tier>] (<task>, <languages>, ~<size>)"`, with every
/// segment whose inputs are empty dropped. The `base` tier is the default
/// and is never rendered; `size` is `None` when the size is unknown.
pub fn generate_label(descriptor: &Descriptor, size: Option<&str>) -> String {
    let mut parts = vec![descriptor.key.clone()];

    if let Some(tier) = quality_tier(&descriptor.key, &descriptor.label) {
        if tier != "base" {
            parts.push(format!("[{}]", capitalize(tier)));
        }
    }

    let languages = languages(&descriptor.key, &descriptor.label);
    let mut clauses: Vec<String> = Vec::new();

    if let Some(task) = task(&descriptor.model_type, &descriptor.kind) {
        clauses.push(task.to_string());
        if !languages.is_empty() {
            clauses.push(languages.join(", "));
        }
        if let Some(size) = size {
            clauses.push(format!("~{size}"));
        }
    } else if !languages.is_empty() {
        clauses.push(languages.join(", "));
        if let Some(size) = size {
            clauses.push(format!("~{size}"));
        }
    } else if let Some(size) = size {
        clauses.push(format!("~{size}"));
    }

    if !clauses.is_empty() {
        parts.push(format!("({})", clauses.join(", ")));
    }

    parts.join(" ")
}

/// First tier marker found in the key (tiny through large), else the
/// low/high markers from the previous label.
fn quality_tier(key: &str, label: &str) -> Option<&'static str> {
    let key = key.to_lowercase();
    for tier in ["tiny", "small", "base", "medium", "large"] {
        if key.contains(tier) {
            return Some(tier);
        }
    }
    let label = label.to_lowercase();
    for tier in ["low", "high"] {
        if label.contains(tier) {
            return Some(tier);
        }
    }
    None
}

/// Union of language markers found in the key and previous label, sorted.
fn languages(key: &str, label: &str) -> Vec<&'static str> {
    let key_lower = key.to_lowercase();
    let label_lower = label.to_lowercase();
    let mut found = BTreeSet::new();

    if key.contains("en_US")
        || key.contains("en_GB")
        || key_lower.contains("whisper")
        || label_lower.contains("english")
    {
        found.insert("English");
    }
    if key.contains("zh") || key_lower.contains("bilingual") {
        found.insert("Chinese");
    }
    if key_lower.contains("bilingual") {
        found.insert("Multilingual");
    }

    found.into_iter().collect()
}

/// Task tag for the declared type; vision models are sub-classified by
/// their `kind`.
fn task(model_type: &ModelType, kind: &str) -> Option<&'static str> {
    let kind = kind.to_lowercase();
    match model_type {
        ModelType::Stt => Some("STT"),
        ModelType::Tts => Some("TTS"),
        ModelType::Vad => Some("VAD"),
        ModelType::Vision => Some(if kind.contains("detection") {
            "Object Detection"
        } else if kind.contains("classification") {
            "Image Classification"
        } else if kind.contains("segmentation") {
            "Image Segmentation"
        } else {
            "Vision"
        }),
        ModelType::Unknown(_) => None,
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
