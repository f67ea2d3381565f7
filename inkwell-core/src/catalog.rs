//! Catalog reading: the YAML index file listing every article.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default catalog location, relative to the working directory
pub const DEFAULT_INDEX_FILE: &str = "articles/index.yaml";

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// One raw catalog entry, as written in the index file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub file_name: Option<String>,

    /// Explicit permalink, overrides the date/title derived one
    #[serde(default)]
    pub permalink: Option<String>,

    #[serde(default)]
    pub draft: bool,
}

/// Anything able to produce the ordered list of catalog records
pub trait CatalogSource: Send + Sync {
    fn read(&self) -> Result<Vec<ArticleRecord>, CatalogError>;
}

/// Catalog backed by a YAML file on disk
#[derive(Debug, Clone)]
pub struct IndexFile {
    path: PathBuf,
}

impl IndexFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for IndexFile {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_FILE)
    }
}

impl CatalogSource for IndexFile {
    fn read(&self) -> Result<Vec<ArticleRecord>, CatalogError> {
        let contents = std::fs::read_to_string(&self.path).map_err(|source| CatalogError::Read {
            path: self.path.clone(),
            source,
        })?;

        // An empty document is an empty catalog, not an error
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<ArticleRecord> =
            serde_yaml::from_str(&contents).map_err(|source| CatalogError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!("Read {} catalog records from {:?}", records.len(), self.path);
        Ok(records)
    }
}

/// Catalog held in memory, for embedding and tests
impl CatalogSource for Vec<ArticleRecord> {
    fn read(&self) -> Result<Vec<ArticleRecord>, CatalogError> {
        Ok(self.clone())
    }
}
