//! Error types for modelcat.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelcatError {
    // Catalog errors (fatal for the whole run)
    #[error("Catalog file not found at {path}")]
    CatalogNotFound { path: String },

    #[error("Failed to parse catalog: {0}")]
    CatalogParse(#[from] serde_yaml::Error),

    // Fetch errors (recoverable per descriptor)
    #[error("Local model file not found: {path}")]
    LocalFileNotFound { path: String },

    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    // Extraction errors (recoverable per descriptor)
    #[error("Unsupported archive format: {path}")]
    UnsupportedArchive { path: String },

    #[error("Extraction failed: {message}")]
    Extract { message: String },

    #[error("Ambiguous model root: {count} subdirectories, none named '{folder}'")]
    AmbiguousModelRoot { folder: String, count: usize },

    // Classification warning (recoverable per descriptor)
    #[error("No files found in extracted model '{key}'")]
    EmptyInventory { key: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, ModelcatError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_catalog_not_found_display() {
        let error = ModelcatError::CatalogNotFound {
            path: "/path/to/models.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Catalog file not found at /path/to/models.yaml"
        );
    }

    #[test]
    fn test_local_file_not_found_display() {
        let error = ModelcatError::LocalFileNotFound {
            path: "/does/not/exist".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Local model file not found: /does/not/exist"
        );
    }

    #[test]
    fn test_download_display() {
        let error = ModelcatError::Download {
            url: "https://example.com/model.tar.bz2".to_string(),
            message: "connection refused".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Download failed for https://example.com/model.tar.bz2: connection refused"
        );
    }

    #[test]
    fn test_unsupported_archive_display() {
        let error = ModelcatError::UnsupportedArchive {
            path: "model.rar".to_string(),
        };
        assert_eq!(error.to_string(), "Unsupported archive format: model.rar");
    }

    #[test]
    fn test_ambiguous_model_root_display() {
        let error = ModelcatError::AmbiguousModelRoot {
            folder: "vits-piper-en_US".to_string(),
            count: 3,
        };
        assert_eq!(
            error.to_string(),
            "Ambiguous model root: 3 subdirectories, none named 'vits-piper-en_US'"
        );
    }

    #[test]
    fn test_empty_inventory_display() {
        let error = ModelcatError::EmptyInventory {
            key: "whisper-tiny-en".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "No files found in extracted model 'whisper-tiny-en'"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: ModelcatError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("key: [unclosed").unwrap_err();
        let error: ModelcatError = yaml_error.into();
        assert!(error.to_string().contains("Failed to parse catalog"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<ModelcatError>();
        assert_sync::<ModelcatError>();
    }
}
