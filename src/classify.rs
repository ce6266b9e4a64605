//! File inventory and required-file classification.
//!
//! Selection is a best-effort heuristic, not a verified manifest: each model
//! type maps to a pure filename predicate, so refining a rule or adding a
//! type never touches the pipeline's control flow.

use crate::catalog::ModelType;
use std::path::Path;
use walkdir::WalkDir;

/// Recursively inventory the files under `root` as relative paths.
///
/// Directories themselves are not listed and unreadable entries are
/// skipped. Order carries no meaning.
pub fn inventory(root: &Path) -> Vec<String> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_string_lossy().into_owned());
        }
    }
    files
}

type Predicate = fn(&str) -> bool;

/// Model weights plus tokenizer/vocabulary resources. Over-inclusive for
/// text-bearing auxiliary files on purpose; documentation and licenses
/// never match.
fn weights_and_tokens(file: &str) -> bool {
    let lower = file.to_lowercase();
    file.ends_with(".onnx") || lower.contains("token") || lower.contains("vocab")
}

fn weights_only(file: &str) -> bool {
    file.ends_with(".onnx")
}

fn strategy_for(model_type: &ModelType) -> Option<Predicate> {
    match model_type {
        ModelType::Stt | ModelType::Tts => Some(weights_and_tokens),
        ModelType::Vad | ModelType::Vision => Some(weights_only),
        ModelType::Unknown(_) => None,
    }
}

/// Select the files judged required at inference time for `model_type`.
///
/// The result is lexicographically sorted, deduplicated, and always a
/// subset of the inventory. An empty inventory or an unrecognized type
/// yields an empty list, never an error.
pub fn required_files(files: &[String], model_type: &ModelType) -> Vec<String> {
    let Some(predicate) = strategy_for(model_type) else {
        return Vec::new();
    };

    let mut required: Vec<String> = files
        .iter()
        .filter(|file| predicate(file))
        .cloned()
        .collect();
    required.sort();
    required.dedup();
    required
}
