use anyhow::{Context, Result};
use clap::Parser;
use modelcat::catalog::Catalog;
use modelcat::cli::Cli;
use modelcat::fetch::ModelCache;
use modelcat::pipeline::Resolver;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let input = cli
        .input
        .clone()
        .unwrap_or_else(|| base_dir().join("../src/config/models.yaml"));

    eprintln!("Loading models from: {}", input.display());
    let mut catalog = Catalog::load(&input)
        .with_context(|| format!("failed to load catalog from {}", input.display()))?;

    eprintln!("\nProcessing {} models...\n", catalog.model_count());

    let cache = if cli.no_cache {
        ModelCache::ephemeral()?
    } else {
        let root = cli
            .cache_dir
            .clone()
            .unwrap_or_else(|| base_dir().join(".model_cache"));
        eprintln!("Using cache directory: {}\n", root.display());
        ModelCache::new(root)?
    };

    let resolver = Resolver::new(cache, cli.quiet)?;
    resolver.run(&mut catalog).await;

    eprintln!("\nGenerating output YAML...\n");
    match &cli.output {
        Some(path) => {
            catalog.write_to(path)?;
            eprintln!("Saved to: {}", path.display());
        }
        None => print!("{}", catalog.to_yaml_string()?),
    }

    Ok(())
}

/// Directory the executable lives in; defaults and the cache are resolved
/// relative to it, not the working directory.
fn base_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
