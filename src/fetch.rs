//! Archive fetching with an on-disk cache.
//!
//! Downloads are keyed by the final path segment of the URL and reused
//! across runs without integrity verification. Bodies stream into a `.part`
//! file and are renamed on success, so the cache never holds a truncated
//! file under its final name.

use crate::error::{ModelcatError, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Handle to the directory of previously downloaded archives.
///
/// An explicit resource rather than a process-wide singleton, so tests and
/// callers can inject an isolated cache. Not locked: concurrent runs against
/// the same directory may race on a filename.
#[derive(Debug)]
pub struct ModelCache {
    root: PathBuf,
    _ephemeral: Option<TempDir>,
}

impl ModelCache {
    /// Open (creating if needed) a persistent cache at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            _ephemeral: None,
        })
    }

    /// Cache backed by a temp directory that is deleted on drop, forcing a
    /// re-download on every run.
    pub fn ephemeral() -> Result<Self> {
        let dir = TempDir::new()?;
        Ok(Self {
            root: dir.path().to_path_buf(),
            _ephemeral: Some(dir),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache path for a URL, derived from its final path segment.
    pub fn path_for(&self, url: &str) -> PathBuf {
        self.root.join(cache_filename(url))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.path_for(url).exists()
    }
}

/// Filename a URL caches under: everything after the last `/`.
pub fn cache_filename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Resolve a URL or `file://` path to local archive bytes.
///
/// `file://` inputs are returned as-is after an existence check and are
/// never copied into (or deleted from) the cache. Remote inputs reuse the
/// cached file when present, otherwise download it.
///
/// # Errors
///
/// Returns [`ModelcatError::LocalFileNotFound`] for a missing `file://`
/// path and [`ModelcatError::Download`] on any transport or HTTP failure.
pub async fn fetch_archive(
    client: &Client,
    cache: &ModelCache,
    url: &str,
    progress: bool,
) -> Result<PathBuf> {
    if let Some(local) = url.strip_prefix("file://") {
        let path = PathBuf::from(local);
        if !path.exists() {
            return Err(ModelcatError::LocalFileNotFound {
                path: local.to_string(),
            });
        }
        return Ok(path);
    }

    let target = cache.path_for(url);
    if target.exists() {
        if progress {
            eprintln!("  Using cached file: {}", target.display());
        }
        return Ok(target);
    }

    download_to_cache(client, url, &target, progress).await?;
    Ok(target)
}

async fn download_to_cache(
    client: &Client,
    url: &str,
    target: &Path,
    progress: bool,
) -> Result<()> {
    let response = client.get(url).send().await.map_err(|e| {
        ModelcatError::Download {
            url: url.to_string(),
            message: format!("failed to start download: {e}"),
        }
    })?;

    if !response.status().is_success() {
        return Err(ModelcatError::Download {
            url: url.to_string(),
            message: format!("status {}", response.status()),
        });
    }

    let total_size = response.content_length().unwrap_or(0);

    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string — always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let file_name = target
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("download");
    let part = target.with_file_name(format!("{file_name}.part"));

    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(&part)?;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                drop(file);
                if let Err(e) = fs::remove_file(&part) {
                    eprintln!("modelcat: failed to remove partial download: {e}");
                }
                return Err(ModelcatError::Download {
                    url: url.to_string(),
                    message: format!("failed to read download chunk: {e}"),
                });
            }
        };

        file.write_all(&chunk)?;

        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    file.flush()?;
    drop(file);
    fs::rename(&part, target)?;

    if progress {
        eprintln!("  Downloaded to cache: {}", target.display());
    }

    Ok(())
}
