//! Loading the configured site: config file, catalog and article index.

use anyhow::{Context, Result};
use inkwell_core::{
    ArticleIndex, ArticleOptions, Config, ContentFile, IndexFile, Renderer, SharedIndex,
};
use std::path::Path;
use std::sync::Arc;

pub struct Site {
    pub config: Config,
    index: SharedIndex,
}

impl Site {
    pub fn open(config_path: &Path) -> Result<Self> {
        tracing::debug!("Loading config from {:?}", config_path);
        let config = Config::from_file(config_path)
            .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

        let content = ContentFile::new(Arc::new(Renderer::new()));
        let options =
            ArticleOptions::new(Arc::new(content)).with_file_directory(config.articles_dir());
        let catalog = IndexFile::new(config.catalog_path());

        Ok(Self {
            config,
            index: SharedIndex::new(Box::new(catalog), options),
        })
    }

    pub fn index(&self) -> Result<Arc<ArticleIndex>> {
        self.index.get().context("Failed to load article index")
    }
}
