//! Build command implementation.

use crate::site::Site;
use anyhow::{bail, Context, Result};
use inkwell_core::FeedGenerator;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Write each published article at its permalink, plus the feed
pub fn build_site(config_path: &Path) -> Result<()> {
    let site = Site::open(config_path)?;
    let index = site.index()?;

    let output_dir = site.config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let mut written = 0;
    for article in index.published() {
        let html = article
            .content()
            .with_context(|| format!("Failed to render {}", article.permalink()))?;

        let target = output_path(&output_dir, article.permalink())?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, html).with_context(|| format!("Failed to write {:?}", target))?;
        tracing::debug!("Wrote {:?}", target);
        written += 1;
    }

    if let Some(draft) = index.draft() {
        tracing::info!("Skipping drafts (first: {})", draft.permalink());
    }

    let feed_path = output_path(&output_dir, &site.config.site.feed_path)?;
    if let Some(parent) = feed_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let xml = FeedGenerator::new(site.config.site.clone())
        .generate(index.published())
        .context("Failed to generate feed")?;
    fs::write(&feed_path, xml).with_context(|| format!("Failed to write {:?}", feed_path))?;

    tracing::info!(
        "Built {} articles and {:?} into {:?}",
        written,
        feed_path.file_name().unwrap_or_default(),
        output_dir
    );
    Ok(())
}

/// Resolve a site-relative URL path under `output_dir`, refusing anything
/// that would land outside it
fn output_path(output_dir: &Path, url_path: &str) -> Result<PathBuf> {
    let relative = Path::new(url_path.trim_start_matches('/'));

    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("Refusing to write {} outside the output directory", url_path)
            }
        }
    }

    let target = output_dir.join(relative);
    if !target.starts_with(output_dir) || target == output_dir {
        bail!("Refusing to write {} outside the output directory", url_path);
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_under_output_dir() {
        let out = Path::new("public");
        assert_eq!(
            output_path(out, "/2012/10/post.html").unwrap(),
            PathBuf::from("public/2012/10/post.html")
        );
        assert_eq!(
            output_path(out, "index.atom").unwrap(),
            PathBuf::from("public/index.atom")
        );
    }

    #[test]
    fn test_output_path_rejects_escapes() {
        let out = Path::new("public");
        for bad in ["/../x.html", "/a/../../x.html", "..", "/", ""] {
            let err = output_path(out, bad).unwrap_err();
            assert!(err.to_string().contains(bad), "{}", err);
        }
    }
}
