//! List articles in index order.

use crate::site::Site;
use anyhow::Result;
use inkwell_core::Article;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ArticleSummary<'a> {
    title: Option<&'a str>,
    date: Option<String>,
    summary: Option<&'a str>,
    permalink: &'a str,
    published: bool,
}

impl<'a> From<&'a Article> for ArticleSummary<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            title: article.title(),
            date: article.date().map(|d| d.format("%Y-%m-%d").to_string()),
            summary: article.summary(),
            permalink: article.permalink(),
            published: article.is_published(),
        }
    }
}

/// Print published articles (or every article with `all`)
pub fn list_articles(config_path: &Path, all: bool, json: bool) -> Result<()> {
    let site = Site::open(config_path)?;
    let index = site.index()?;

    let articles: Vec<&Article> = if all {
        index.all().iter().collect()
    } else {
        index.published().collect()
    };

    if json {
        let payload: Vec<ArticleSummary> = articles.iter().map(|a| (*a).into()).collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for article in articles {
        let date = article
            .date()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let marker = if article.is_published() { "" } else { " [draft]" };
        println!(
            "{}  {}  {}{}",
            date,
            article.permalink(),
            article.title().unwrap_or("(untitled)"),
            marker
        );
    }

    Ok(())
}
