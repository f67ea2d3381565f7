//! The article index: an immutable, date-ordered article collection.

use crate::article::{Article, ArticleOptions};
use crate::catalog::{CatalogError, CatalogSource};
use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Duplicate permalink: {0}")]
    DuplicatePermalink(String),

    #[error("Shared index already initialized")]
    AlreadyInitialized,
}

/// Articles sorted most recent first, with permalink lookup
#[derive(Debug)]
pub struct ArticleIndex {
    articles: Vec<Article>,
    permalinks: OnceCell<HashMap<String, usize>>,
}

impl ArticleIndex {
    /// Sort once (stable, ties keep input order) and check permalink uniqueness
    pub fn new(mut articles: Vec<Article>) -> Result<Self, IndexError> {
        let mut seen = HashSet::with_capacity(articles.len());
        for article in &articles {
            if !seen.insert(article.permalink()) {
                tracing::warn!("Duplicate permalink: {}", article.permalink());
                return Err(IndexError::DuplicatePermalink(
                    article.permalink().to_string(),
                ));
            }
        }

        articles.sort_by(Article::cmp_by_date_desc);

        Ok(Self {
            articles,
            permalinks: OnceCell::new(),
        })
    }

    /// Read the catalog, inflate its records and build the index
    pub fn load(
        catalog: &dyn CatalogSource,
        options: &ArticleOptions,
    ) -> Result<Self, IndexError> {
        let records = catalog.read()?;
        let articles = Article::inflate(records, options);
        let index = Self::new(articles)?;

        tracing::info!(
            "Indexed {} articles ({} published)",
            index.len(),
            index.published().count()
        );
        Ok(index)
    }

    /// Every article, most recent first
    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    /// Published articles, in index order
    pub fn published(&self) -> impl Iterator<Item = &Article> + '_ {
        self.articles.iter().filter(|a| a.is_published())
    }

    /// The most recent published article
    pub fn latest(&self) -> Option<&Article> {
        self.published().next()
    }

    /// The first unpublished article in index order
    pub fn draft(&self) -> Option<&Article> {
        self.articles.iter().find(|a| !a.is_published())
    }

    pub fn find_by_permalink(&self, permalink: &str) -> Option<&Article> {
        let index = self.permalinks.get_or_init(|| {
            tracing::debug!("Building permalink index over {} articles", self.articles.len());
            self.articles
                .iter()
                .enumerate()
                .map(|(i, article)| (article.permalink().to_string(), i))
                .collect()
        });

        index.get(permalink).map(|&i| &self.articles[i])
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Process-wide handle to an index built at most once
///
/// The first [`SharedIndex::get`] loads the catalog; concurrent first calls
/// block until that single load finishes. A failed load leaves the handle
/// empty so a later call can try again.
pub struct SharedIndex {
    cell: OnceCell<Arc<ArticleIndex>>,
    catalog: Option<Box<dyn CatalogSource>>,
    options: ArticleOptions,
}

impl SharedIndex {
    pub fn new(catalog: Box<dyn CatalogSource>, options: ArticleOptions) -> Self {
        Self {
            cell: OnceCell::new(),
            catalog: Some(catalog),
            options,
        }
    }

    /// Handle around an already built index; the catalog is never read
    pub fn preloaded(index: ArticleIndex) -> Self {
        Self {
            cell: OnceCell::with_value(Arc::new(index)),
            catalog: None,
            options: ArticleOptions::default(),
        }
    }

    /// Install `index` before first use
    pub fn set(&self, index: ArticleIndex) -> Result<(), IndexError> {
        self.cell
            .set(Arc::new(index))
            .map_err(|_| IndexError::AlreadyInitialized)
    }

    pub fn get(&self) -> Result<Arc<ArticleIndex>, IndexError> {
        self.cell
            .get_or_try_init(|| match &self.catalog {
                Some(catalog) => ArticleIndex::load(catalog.as_ref(), &self.options).map(Arc::new),
                None => ArticleIndex::new(Vec::new()).map(Arc::new),
            })
            .map(Arc::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl std::fmt::Debug for SharedIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedIndex")
            .field("initialized", &self.is_initialized())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
