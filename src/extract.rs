//! Archive extraction and model root resolution.
//!
//! Dispatch is purely on the filename suffix: compressed tarballs, zip
//! archives, and bare `.onnx` files (copied, not extracted). Anything else
//! is a typed unsupported-format error, never a silent no-op.

use crate::error::{ModelcatError, Result};
use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use zip::read::ZipArchive;

/// Unpack `archive_path` into `dest`, creating it if needed.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    let name = archive_path.to_string_lossy();

    if name.ends_with(".tar.gz") {
        extract_tar(GzDecoder::new(File::open(archive_path)?), dest)
    } else if name.ends_with(".tar.bz2") {
        extract_tar(BzDecoder::new(File::open(archive_path)?), dest)
    } else if name.ends_with(".zip") {
        extract_zip(File::open(archive_path)?, dest)
    } else if name.ends_with(".onnx") {
        copy_single_file(archive_path, dest)
    } else {
        Err(ModelcatError::UnsupportedArchive {
            path: name.into_owned(),
        })
    }
}

fn extract_tar<R: Read>(reader: R, dest: &Path) -> Result<()> {
    let mut archive = Archive::new(reader);
    archive.unpack(dest).map_err(|e| ModelcatError::Extract {
        message: format!("tar extraction failed: {e}"),
    })
}

fn extract_zip(file: File, dest: &Path) -> Result<()> {
    let mut archive = ZipArchive::new(file).map_err(|e| ModelcatError::Extract {
        message: format!("failed to open zip archive: {e}"),
    })?;
    archive.extract(dest).map_err(|e| ModelcatError::Extract {
        message: format!("zip extraction failed: {e}"),
    })
}

/// A bare model file is its own "archive": place it in the destination.
fn copy_single_file(archive_path: &Path, dest: &Path) -> Result<()> {
    let file_name = archive_path
        .file_name()
        .ok_or_else(|| ModelcatError::Extract {
            message: format!("no filename in {}", archive_path.display()),
        })?;
    fs::copy(archive_path, dest.join(file_name))?;
    Ok(())
}

/// Locate the directory that directly contains the model's files.
///
/// Archives often wrap their contents in a nested folder: a single
/// subdirectory is descended into whether or not its name matches the
/// declared folder. With multiple subdirectories the declared folder name
/// decides; failing that, files at the top level make the destination
/// itself the root, and a directory-only tree is ambiguous.
pub fn resolve_model_root(dest: &Path, folder: &str) -> Result<PathBuf> {
    let mut subdirs = Vec::new();
    let mut has_files = false;

    for entry in fs::read_dir(dest)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            subdirs.push(entry.path());
        } else {
            has_files = true;
        }
    }

    match subdirs.len() {
        0 => Ok(dest.to_path_buf()),
        1 => Ok(subdirs.remove(0)),
        count => {
            if let Some(matching) = subdirs
                .iter()
                .find(|p| p.file_name().is_some_and(|n| n == folder))
            {
                return Ok(matching.clone());
            }
            if has_files {
                return Ok(dest.to_path_buf());
            }
            Err(ModelcatError::AmbiguousModelRoot {
                folder: folder.to_string(),
                count,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;

    /// Build a small .tar.gz fixture from (path, contents) pairs.
    fn make_tar_gz(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::fast());
        let mut builder = tar::Builder::new(encoder);
        for (name, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
    }

    #[test]
    fn test_unsupported_suffix_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("model.rar");
        fs::write(&archive, b"not really an archive").unwrap();

        let result = extract_archive(&archive, &dir.path().join("out"));
        match result {
            Err(ModelcatError::UnsupportedArchive { path }) => {
                assert!(path.ends_with("model.rar"));
            }
            other => panic!("expected UnsupportedArchive, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_corrupt_tar_gz_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("model.tar.gz");
        fs::write(&archive, b"these are not gzip bytes").unwrap();

        let result = extract_archive(&archive, &dir.path().join("out"));
        assert!(matches!(result, Err(ModelcatError::Extract { .. })));
    }

    #[test]
    fn test_tar_gz_extracts_nested_structure() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("model.tar.gz");
        make_tar_gz(
            &archive,
            &[
                ("whisper-tiny/model.onnx", "weights"),
                ("whisper-tiny/tokens.txt", "tokens"),
            ],
        );

        let dest = dir.path().join("out");
        extract_archive(&archive, &dest).unwrap();
        assert!(dest.join("whisper-tiny").join("model.onnx").is_file());
        assert!(dest.join("whisper-tiny").join("tokens.txt").is_file());
    }

    #[test]
    fn test_bare_onnx_is_copied() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("silero_vad.onnx");
        fs::write(&archive, b"onnx bytes").unwrap();

        let dest = dir.path().join("out");
        extract_archive(&archive, &dest).unwrap();
        assert!(dest.join("silero_vad.onnx").is_file());
    }

    #[test]
    fn test_root_of_flat_extraction_is_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.onnx"), b"weights").unwrap();

        let root = resolve_model_root(dir.path(), "whisper-tiny").unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_single_subdir_is_descended_even_without_name_match() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("some-other-name");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("model.onnx"), b"weights").unwrap();

        let root = resolve_model_root(dir.path(), "whisper-tiny").unwrap();
        assert_eq!(root, nested);
    }

    #[test]
    fn test_matching_folder_wins_among_multiple_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("whisper-tiny")).unwrap();
        fs::create_dir(dir.path().join("__MACOSX")).unwrap();

        let root = resolve_model_root(dir.path(), "whisper-tiny").unwrap();
        assert_eq!(root, dir.path().join("whisper-tiny"));
    }

    #[test]
    fn test_multiple_subdirs_with_top_level_files_keeps_destination() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::write(dir.path().join("model.onnx"), b"weights").unwrap();

        let root = resolve_model_root(dir.path(), "whisper-tiny").unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn test_multiple_unmatched_subdirs_without_files_is_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();

        let result = resolve_model_root(dir.path(), "whisper-tiny");
        assert!(matches!(
            result,
            Err(ModelcatError::AmbiguousModelRoot { count: 2, .. })
        ));
    }
}
