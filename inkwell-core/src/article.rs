//! Articles: one catalog entry each, with permalink derivation and lazily
//! rendered content.

use crate::catalog::ArticleRecord;
use crate::content::{ContentError, ContentFile, ContentSource};
use crate::slug::slugify;
use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use std::cmp::Ordering;
use std::path::PathBuf;
use std::sync::Arc;

/// Directory article bodies are read from unless overridden
pub const DEFAULT_FILE_DIRECTORY: &str = "articles";

/// Shared settings used while inflating catalog records
#[derive(Clone)]
pub struct ArticleOptions {
    pub content_source: Arc<dyn ContentSource>,
    pub file_directory: PathBuf,
}

impl ArticleOptions {
    pub fn new(content_source: Arc<dyn ContentSource>) -> Self {
        Self {
            content_source,
            file_directory: PathBuf::from(DEFAULT_FILE_DIRECTORY),
        }
    }

    pub fn with_file_directory<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.file_directory = dir.into();
        self
    }
}

impl Default for ArticleOptions {
    fn default() -> Self {
        Self::new(Arc::new(ContentFile::default()))
    }
}

impl std::fmt::Debug for ArticleOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArticleOptions")
            .field("file_directory", &self.file_directory)
            .finish_non_exhaustive()
    }
}

/// A single published or draft article
pub struct Article {
    title: Option<String>,
    date: Option<NaiveDate>,
    summary: Option<String>,
    permalink: String,
    file_name: Option<String>,
    draft: bool,

    content_source: Arc<dyn ContentSource>,
    file_directory: PathBuf,
    content: OnceCell<String>,
}

impl Article {
    pub fn new(record: ArticleRecord, options: &ArticleOptions) -> Self {
        let permalink = match record.permalink {
            Some(permalink) => permalink,
            None => default_permalink(record.date, record.title.as_deref()),
        };

        Self {
            title: record.title,
            date: record.date,
            summary: record.summary,
            permalink,
            file_name: record.file_name,
            draft: record.draft,
            content_source: Arc::clone(&options.content_source),
            file_directory: options.file_directory.clone(),
            content: OnceCell::new(),
        }
    }

    /// One article per record, in record order
    pub fn inflate<I>(records: I, options: &ArticleOptions) -> Vec<Article>
    where
        I: IntoIterator<Item = ArticleRecord>,
    {
        records
            .into_iter()
            .map(|record| Article::new(record, options))
            .collect()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Published articles are dated and not marked as drafts
    pub fn is_published(&self) -> bool {
        !self.draft && self.date.is_some()
    }

    /// Path of the body file, `{file_directory}/{file_name}`
    pub fn file_path(&self) -> Option<PathBuf> {
        self.file_name
            .as_ref()
            .map(|name| self.file_directory.join(name))
    }

    /// Rendered HTML body, loaded and rendered on first access then cached
    pub fn content(&self) -> Result<&str, ContentError> {
        self.content
            .get_or_try_init(|| {
                let path = self
                    .file_path()
                    .ok_or_else(|| ContentError::MissingFileName(self.permalink.clone()))?;
                tracing::debug!("Loading content for {}", self.permalink);
                self.content_source.load(&path)
            })
            .map(String::as_str)
    }

    /// Most recent first; undated articles after dated ones
    pub fn cmp_by_date_desc(&self, other: &Article) -> Ordering {
        match (self.date, other.date) {
            (Some(a), Some(b)) => b.cmp(&a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

impl std::fmt::Debug for Article {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Article")
            .field("title", &self.title)
            .field("date", &self.date)
            .field("permalink", &self.permalink)
            .field("file_name", &self.file_name)
            .field("draft", &self.draft)
            .finish_non_exhaustive()
    }
}

/// `/{year}/{month}/{slug}.html`, skipping parts that cannot be derived
fn default_permalink(date: Option<NaiveDate>, title: Option<&str>) -> String {
    let year = date.map(|d| d.format("%Y").to_string());
    let month = date.map(|d| d.format("%m").to_string());
    let slug = title.map(slugify);

    let path = [year, month, slug]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("/");

    format!("/{}.html", path)
}
