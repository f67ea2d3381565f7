//! Configuration parsing and management.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// Main configuration struct matching the inkwell.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

/// Site-level settings consumed by the feed generator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    pub url: String,

    #[serde(default = "default_feed_path")]
    pub feed_path: String,

    #[serde(default = "default_language")]
    pub language: String,
}

fn default_feed_path() -> String {
    String::from("index.atom")
}

fn default_language() -> String {
    String::from("en-US")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    #[serde(default = "default_articles")]
    pub articles: PathBuf,

    #[serde(default = "default_output")]
    pub output: PathBuf,
}

fn default_catalog() -> PathBuf {
    PathBuf::from(crate::catalog::DEFAULT_INDEX_FILE)
}

fn default_articles() -> PathBuf {
    PathBuf::from(crate::article::DEFAULT_FILE_DIRECTORY)
}

fn default_output() -> PathBuf {
    PathBuf::from("public")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            articles: default_articles(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Build a configuration in memory, with default paths
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site,
            paths: PathsConfig::default(),
            config_path: None,
        }
    }

    /// Catalog file, resolved relative to the config file
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_path(&self.paths.catalog)
    }

    /// Directory holding article bodies, resolved relative to the config file
    pub fn articles_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.articles)
    }

    /// Output directory for `build`, resolved relative to the config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_deref().and_then(Path::parent) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl SiteConfig {
    /// Site URL without a trailing slash; permalinks are appended to it
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Absolute URL of the Atom feed
    pub fn feed_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url(),
            self.feed_path.trim_start_matches('/')
        )
    }

    /// Absolute URL for a permalink
    pub fn article_url(&self, permalink: &str) -> String {
        format!("{}{}", self.base_url(), permalink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn site() -> SiteConfig {
        SiteConfig {
            title: "Test".into(),
            author: "Author".into(),
            url: "https://example.com/".into(),
            feed_path: default_feed_path(),
            language: default_language(),
        }
    }

    #[test]
    fn test_default_values() {
        let config = Config::new(site());

        assert_eq!(config.paths.catalog, PathBuf::from("articles/index.yaml"));
        assert_eq!(config.paths.articles, PathBuf::from("articles"));
        assert_eq!(config.site.feed_path, "index.atom");
        assert_eq!(config.site.language, "en-US");
    }

    #[test]
    fn test_site_urls() {
        let site = site();
        assert_eq!(site.base_url(), "https://example.com");
        assert_eq!(site.feed_url(), "https://example.com/index.atom");
        assert_eq!(
            site.article_url("/2012/11/title.html"),
            "https://example.com/2012/11/title.html"
        );
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inkwell.yml");
        std::fs::write(
            &path,
            "site:\n  title: T\n  author: A\n  url: https://example.com\npaths:\n  articles: posts\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.articles_dir(), dir.path().join("posts"));
        assert_eq!(config.catalog_path(), dir.path().join("articles/index.yaml"));
        assert_eq!(config.output_dir(), dir.path().join("public"));
    }

    #[test]
    fn test_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "site: [unclosed").unwrap();

        let result = Config::from_file(file.path());
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
