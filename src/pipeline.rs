//! Per-descriptor resolution pipeline.
//!
//! Descriptors are processed strictly sequentially; one bad URL or
//! malformed archive is reported and skipped without touching that entry's
//! previous `required`/`label` values or aborting the rest of the run.

use crate::catalog::{Catalog, Descriptor};
use crate::classify::{inventory, required_files};
use crate::error::{ModelcatError, Result};
use crate::extract::{extract_archive, resolve_model_root};
use crate::fetch::{ModelCache, fetch_archive};
use crate::label::generate_label;
use crate::probe::{format_size, probe_size};
use owo_colors::OwoColorize;
use reqwest::Client;
use std::fs;
use tempfile::TempDir;

/// Derived fields for one successfully resolved descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub required: Vec<String>,
    pub label: String,
}

/// One resolution run: HTTP client, archive cache, and the run-scoped
/// extraction workspace. Dropping the resolver deletes the workspace
/// unconditionally, however many descriptors failed mid-run.
pub struct Resolver {
    client: Client,
    cache: ModelCache,
    workspace: TempDir,
    quiet: bool,
}

impl Resolver {
    pub fn new(cache: ModelCache, quiet: bool) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            cache,
            workspace: TempDir::new()?,
            quiet,
        })
    }

    /// Process every catalog entry, writing derived fields back into the
    /// catalog as each one succeeds.
    pub async fn run(&self, catalog: &mut Catalog) {
        let descriptors = catalog.descriptors();
        let total = descriptors.len();

        for (index, descriptor) in descriptors.iter().enumerate() {
            self.report(&format!(
                "[{}/{}] Processing: {} ({})",
                index + 1,
                total,
                descriptor.key,
                descriptor.model_type
            ));

            if descriptor.url.is_empty() {
                warn("No URL provided, skipping");
                continue;
            }

            match self.resolve(descriptor).await {
                Ok(resolution) => {
                    catalog.set_resolution(index, &resolution.required, &resolution.label);
                }
                Err(ModelcatError::EmptyInventory { .. }) => {
                    warn(&format!(
                        "No files found in extracted model '{}'",
                        descriptor.key
                    ));
                }
                Err(e) => error(&descriptor.key, &e),
            }
        }
    }

    /// Resolve the required files and label for one descriptor.
    ///
    /// # Errors
    ///
    /// Any fetch, extraction, or inventory failure; all of them are
    /// per-descriptor and recoverable for the run as a whole.
    pub async fn resolve(&self, descriptor: &Descriptor) -> Result<Resolution> {
        self.report("  Checking file size...");
        let mut size = probe_size(&self.client, &descriptor.url).await;
        self.report(&format!("  File size: {}", format_size(size)));

        let preliminary = generate_label(descriptor, size_fragment(size).as_deref());
        self.report(&format!("  Generated label: {preliminary}"));

        self.report(&format!("  Downloading: {}", descriptor.url));
        let archive =
            fetch_archive(&self.client, &self.cache, &descriptor.url, !self.quiet).await?;

        let dest = self
            .workspace
            .path()
            .join("extracted")
            .join(&descriptor.folder);
        extract_archive(&archive, &dest)?;
        let root = resolve_model_root(&dest, &descriptor.folder)?;

        let files = inventory(&root);
        if files.is_empty() {
            return Err(ModelcatError::EmptyInventory {
                key: descriptor.key.clone(),
            });
        }

        self.report(&format!("  Found {} files in model", files.len()));
        let mut listing = files.clone();
        listing.sort();
        for file in listing.iter().take(10) {
            self.report(&format!("    - {file}"));
        }
        if listing.len() > 10 {
            self.report(&format!("    ... and {} more files", listing.len() - 10));
        }

        let required = required_files(&files, &descriptor.model_type);
        self.report(&format!("  Determined {} required files", required.len()));

        // Probe came up empty: recover the size from the file on disk.
        if size == 0 {
            if let Ok(metadata) = fs::metadata(&archive) {
                size = metadata.len();
                self.report(&format!(
                    "  Updated file size from disk: {}",
                    format_size(size)
                ));
            }
        }

        let label = generate_label(descriptor, size_fragment(size).as_deref());

        Ok(Resolution { required, label })
    }

    fn report(&self, line: &str) {
        if !self.quiet {
            eprintln!("{line}");
        }
    }
}

/// Size string for label composition; unknown sizes drop the segment.
fn size_fragment(size: u64) -> Option<String> {
    (size > 0).then(|| format_size(size))
}

fn warn(message: &str) {
    eprintln!("  {} {}", "WARNING:".yellow(), message);
}

fn error(key: &str, err: &ModelcatError) {
    eprintln!("  {} {}: {}", "ERROR:".red(), key, err);
}
