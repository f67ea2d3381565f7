//! CLI command implementations.

pub mod build;
pub mod feed;
pub mod list;
pub mod show;

pub use build::build_site;
pub use feed::write_feed;
pub use list::list_articles;
pub use show::show_article;
