//! Atom 1.0 feed generation.

use crate::article::Article;
use crate::config::SiteConfig;
use crate::content::ContentError;
use chrono::{NaiveDate, SecondsFormat};
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;
use thiserror::Error;

/// Content type the feed should be served with
pub const ATOM_CONTENT_TYPE: &str = "application/atom+xml";

const ATOM_NAMESPACE: &str = "http://www.w3.org/2005/Atom";

/// `updated` value for an empty feed or an undated entry
const EPOCH: &str = "1970-01-01T00:00:00Z";

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to render entry {permalink}: {source}")]
    Content {
        permalink: String,
        #[source]
        source: ContentError,
    },

    #[error("Failed to write feed XML: {0}")]
    Write(String),
}

/// Serializes articles into an Atom document
#[derive(Debug, Clone)]
pub struct FeedGenerator {
    site: SiteConfig,
}

impl FeedGenerator {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Build the feed for `articles`, which must already be most recent first
    ///
    /// The feed's `updated` is the first article's date. An empty input yields
    /// a valid feed with no entries, updated at the Unix epoch.
    pub fn generate<'a, I>(&self, articles: I) -> Result<String, FeedError>
    where
        I: IntoIterator<Item = &'a Article>,
    {
        let articles: Vec<&Article> = articles.into_iter().collect();
        let mut writer = Writer::new(Cursor::new(Vec::new()));

        let mut feed = BytesStart::new("feed");
        feed.push_attribute(("xmlns", ATOM_NAMESPACE));
        feed.push_attribute(("xml:lang", self.site.language.as_str()));
        emit(&mut writer, Event::Start(feed))?;

        let feed_url = self.site.feed_url();
        let updated = articles
            .first()
            .map(|a| timestamp(a.date()))
            .unwrap_or_else(|| EPOCH.to_string());

        text_element(&mut writer, "title", &self.site.title)?;
        text_element(&mut writer, "updated", &updated)?;
        text_element(&mut writer, "id", &feed_url)?;
        link(&mut writer, self.site.base_url(), "text/html", "alternate")?;
        link(&mut writer, &feed_url, ATOM_CONTENT_TYPE, "self")?;

        for article in &articles {
            self.write_entry(&mut writer, article)?;
        }

        emit(&mut writer, Event::End(BytesEnd::new("feed")))?;

        let body = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| FeedError::Write(e.to_string()))?;

        tracing::debug!("Generated feed with {} entries", articles.len());

        let mut result = String::with_capacity(body.len() + 40);
        result.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        result.push_str(&body);
        result.push('\n');
        Ok(result)
    }

    fn write_entry(
        &self,
        writer: &mut Writer<Cursor<Vec<u8>>>,
        article: &Article,
    ) -> Result<(), FeedError> {
        let content = article.content().map_err(|source| FeedError::Content {
            permalink: article.permalink().to_string(),
            source,
        })?;
        let url = self.site.article_url(article.permalink());
        let date = timestamp(article.date());

        emit(writer, Event::Start(BytesStart::new("entry")))?;

        text_element(writer, "id", &url)?;
        text_element(writer, "published", &date)?;
        text_element(writer, "updated", &date)?;
        link(writer, &url, "text/html", "alternate")?;
        text_element(writer, "title", article.title().unwrap_or_default())?;
        if let Some(summary) = article.summary() {
            text_element(writer, "summary", summary)?;
        }

        emit(writer, Event::Start(BytesStart::new("author")))?;
        text_element(writer, "name", &self.site.author)?;
        emit(writer, Event::End(BytesEnd::new("author")))?;

        let mut content_elem = BytesStart::new("content");
        content_elem.push_attribute(("type", "html"));
        emit(writer, Event::Start(content_elem))?;
        for section in cdata_sections(content) {
            emit(writer, Event::CData(BytesCData::new(section)))?;
        }
        emit(writer, Event::End(BytesEnd::new("content")))?;

        emit(writer, Event::End(BytesEnd::new("entry")))
    }
}

fn emit(writer: &mut Writer<Cursor<Vec<u8>>>, event: Event<'_>) -> Result<(), FeedError> {
    writer
        .write_event(event)
        .map_err(|e| FeedError::Write(e.to_string()))
}

/// `<name>text</name>`; BytesText escapes the text
fn text_element(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    name: &str,
    text: &str,
) -> Result<(), FeedError> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn link(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    href: &str,
    mime_type: &str,
    rel: &str,
) -> Result<(), FeedError> {
    let mut elem = BytesStart::new("link");
    elem.push_attribute(("href", href));
    elem.push_attribute(("type", mime_type));
    elem.push_attribute(("rel", rel));
    emit(writer, Event::Empty(elem))
}

/// RFC 3339 timestamp at midnight UTC
fn timestamp(date: Option<NaiveDate>) -> String {
    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| EPOCH.to_string())
}

/// Split `text` so no section contains `]]>`; the sections concatenate back
/// to `text`
fn cdata_sections(text: &str) -> Vec<String> {
    let parts: Vec<&str> = text.split("]]>").collect();
    let last = parts.len() - 1;

    parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            let mut section = String::with_capacity(part.len() + 3);
            if i > 0 {
                section.push('>');
            }
            section.push_str(part);
            if i < last {
                section.push_str("]]");
            }
            section
        })
        .collect()
}
