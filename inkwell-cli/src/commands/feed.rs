//! Atom feed output.

use crate::site::Site;
use anyhow::{Context, Result};
use inkwell_core::FeedGenerator;
use std::fs;
use std::path::Path;

/// Generate the feed of published articles to `output` or stdout
pub fn write_feed(config_path: &Path, output: Option<&Path>) -> Result<()> {
    let site = Site::open(config_path)?;
    let index = site.index()?;

    let xml = FeedGenerator::new(site.config.site.clone())
        .generate(index.published())
        .context("Failed to generate feed")?;

    match output {
        Some(path) => {
            fs::write(path, xml).with_context(|| format!("Failed to write {:?}", path))?;
            tracing::info!("Wrote feed to {:?}", path);
        }
        None => print!("{}", xml),
    }

    Ok(())
}
