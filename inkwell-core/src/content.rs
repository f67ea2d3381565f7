//! Article bodies: reading markdown files and rendering them to HTML.

use crate::render::{RenderError, Renderer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read article body {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Article `{0}` has no file_name")]
    MissingFileName(String),

    #[error("Failed to render {path:?}: {source}")]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },
}

/// Produces the rendered HTML body for an article file
pub trait ContentSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<String, ContentError>;
}

/// Reads markdown from disk and renders it
#[derive(Debug, Clone)]
pub struct ContentFile {
    renderer: Arc<Renderer>,
}

impl ContentFile {
    pub fn new(renderer: Arc<Renderer>) -> Self {
        Self { renderer }
    }

    /// Raw markdown for `path`
    pub fn read(&self, path: &Path) -> Result<String, ContentError> {
        std::fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for ContentFile {
    fn default() -> Self {
        Self::new(Arc::new(Renderer::new()))
    }
}

impl ContentSource for ContentFile {
    fn load(&self, path: &Path) -> Result<String, ContentError> {
        let markdown = self.read(path)?;
        tracing::debug!("Rendering {:?} ({} bytes)", path, markdown.len());

        self.renderer
            .render(&markdown)
            .map_err(|source| ContentError::Render {
                path: path.to_path_buf(),
                source,
            })
    }
}
