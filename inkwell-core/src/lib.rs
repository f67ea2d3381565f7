//! # inkwell-core
//!
//! Core library for the inkwell publishing engine.
//!
//! This crate loads the article catalog, derives permalinks, keeps the
//! date-ordered [`ArticleIndex`], renders markdown bodies into highlighted,
//! typographically polished HTML, and serializes articles as Atom feeds.

pub mod article;
pub mod catalog;
pub mod config;
pub mod content;
pub mod feed;
pub mod index;
pub mod render;
pub mod slug;

pub use article::{Article, ArticleOptions, DEFAULT_FILE_DIRECTORY};
pub use catalog::{ArticleRecord, CatalogError, CatalogSource, IndexFile};
pub use config::{Config, ConfigError, SiteConfig};
pub use content::{ContentError, ContentFile, ContentSource};
pub use feed::{FeedError, FeedGenerator, ATOM_CONTENT_TYPE};
pub use index::{ArticleIndex, IndexError, SharedIndex};
pub use render::{HtmlStage, Highlighter, RenderError, Renderer};
pub use slug::slugify;
