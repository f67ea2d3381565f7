//! Print one article's rendered body.

use crate::site::Site;
use anyhow::{Context, Result};
use std::path::Path;

pub fn show_article(config_path: &Path, permalink: &str) -> Result<()> {
    let site = Site::open(config_path)?;
    let index = site.index()?;

    let key = normalize_permalink(permalink);
    let article = index
        .find_by_permalink(&key)
        .with_context(|| format!("Article not found: {}", key))?;

    let html = article
        .content()
        .with_context(|| format!("Failed to render {}", key))?;
    println!("{}", html);

    Ok(())
}

/// Permalinks are stored with a leading slash; accept either form
fn normalize_permalink(permalink: &str) -> String {
    let trimmed = permalink.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_permalink() {
        assert_eq!(normalize_permalink("2012/11/title.html"), "/2012/11/title.html");
        assert_eq!(normalize_permalink("/about.html"), "/about.html");
        assert_eq!(normalize_permalink(" /x "), "/x");
    }
}
