//! modelcat - required-file resolution for a model download catalog.
//!
//! Walks a YAML catalog of downloadable model bundles, fetches or reuses
//! each archive, and rewrites the catalog with the files each model needs
//! at inference time plus a regenerated descriptive label. Everything else
//! in the document passes through unchanged.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod catalog;
pub mod classify;
pub mod cli;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod label;
pub mod pipeline;
pub mod probe;

// Catalog document
pub use catalog::{Catalog, Descriptor, ModelType, insert_entry_separators};

// Pipeline
pub use pipeline::{Resolution, Resolver};

// Fetching
pub use fetch::ModelCache;

// Error handling
pub use error::{ModelcatError, Result};

// Size helpers
pub use probe::format_size;
