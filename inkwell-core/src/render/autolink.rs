//! Autolinking of bare URLs in running text.

use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::sync::OnceLock;

static URL_REGEX: OnceLock<Regex> = OnceLock::new();

fn url_regex() -> &'static Regex {
    URL_REGEX.get_or_init(|| {
        Regex::new(r#"\b(?:https?://|www\.)[^\s<>]*[^\s<>.,:;!?"')\]]"#)
            .expect("static regex is valid")
    })
}

/// Transformer turning bare `http(s)://` and `www.` URLs into links
///
/// Text inside code blocks, existing links and images is left alone.
pub struct AutolinkTransformer;

impl AutolinkTransformer {
    pub fn new() -> Self {
        Self
    }

    pub fn transform(&self, events: Vec<Event<'_>>) -> Vec<Event<'static>> {
        let mut result = Vec::with_capacity(events.len());
        let mut pending_text = String::new();
        let mut in_code_block = false;
        let mut link_depth = 0usize;

        for event in events {
            if let Event::Text(text) = &event {
                if !in_code_block && link_depth == 0 {
                    // pulldown splits text around some characters; merge before matching
                    pending_text.push_str(text.as_ref());
                    continue;
                }
            }

            self.flush(&mut pending_text, &mut result);

            match &event {
                Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
                Event::End(TagEnd::CodeBlock) => in_code_block = false,
                Event::Start(Tag::Link { .. }) | Event::Start(Tag::Image { .. }) => link_depth += 1,
                Event::End(TagEnd::Link) | Event::End(TagEnd::Image) => {
                    link_depth = link_depth.saturating_sub(1)
                }
                Event::InlineHtml(html) | Event::Html(html) => {
                    let (opened, closed) = count_anchor_tags(html);
                    link_depth = (link_depth + opened).saturating_sub(closed);
                }
                _ => {}
            }
            result.push(event.into_static());
        }

        self.flush(&mut pending_text, &mut result);
        result
    }

    fn flush(&self, text: &mut String, out: &mut Vec<Event<'static>>) {
        if text.is_empty() {
            return;
        }
        out.extend(link_urls(text));
        text.clear();
    }
}

impl Default for AutolinkTransformer {
    fn default() -> Self {
        Self::new()
    }
}

fn link_urls(text: &str) -> Vec<Event<'static>> {
    let mut events = Vec::new();
    let mut last = 0;

    for m in url_regex().find_iter(text) {
        if m.start() > last {
            events.push(text_event(&text[last..m.start()]));
        }

        let shown = m.as_str();
        let href = if shown.starts_with("www.") {
            format!("http://{}", shown)
        } else {
            shown.to_string()
        };

        events.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::Boxed(href.into_boxed_str()),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        events.push(text_event(shown));
        events.push(Event::End(TagEnd::Link));

        last = m.end();
    }

    if last < text.len() {
        events.push(text_event(&text[last..]));
    }

    events
}

/// Number of `<a ...>` and `</a>` tags in a raw HTML fragment
fn count_anchor_tags(html: &str) -> (usize, usize) {
    let lower = html.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut opened = 0;
    let mut closed = 0;

    for (i, _) in lower.match_indices('<') {
        let (is_close, name_at) = match bytes.get(i + 1) {
            Some(b'/') => (true, i + 2),
            _ => (false, i + 1),
        };
        if bytes.get(name_at) != Some(&b'a') {
            continue;
        }
        match bytes.get(name_at + 1) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {
                if is_close {
                    closed += 1;
                } else {
                    opened += 1;
                }
            }
            _ => {}
        }
    }

    (opened, closed)
}

fn text_event(text: &str) -> Event<'static> {
    Event::Text(CowStr::Boxed(text.to_string().into_boxed_str()))
}
