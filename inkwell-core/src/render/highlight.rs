//! Code syntax highlighting using syntect.

use super::html_escape;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;
use thiserror::Error;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME: OnceLock<Option<Theme>> = OnceLock::new();

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    THEME
        .get_or_init(|| {
            let mut theme_set = ThemeSet::load_defaults();
            theme_set
                .themes
                .remove("InspiredGitHub")
                .or_else(|| theme_set.themes.remove("base16-ocean.light"))
        })
        .as_ref()
}

#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Highlighting failed: {0}")]
    Failed(String),
}

/// Turns a code block and its language tag into an HTML fragment
pub trait Highlighter: Send + Sync {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

/// Syntect-backed highlighter with inline styles
///
/// Output is wrapped in `<div class="highlight">`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let ss = syntax_set();
        let syntax = ss
            .find_syntax_by_token(language)
            .or_else(|| ss.find_syntax_by_extension(language))
            .ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
        let theme = theme().ok_or_else(|| HighlightError::Failed("no theme loaded".into()))?;

        let html = highlighted_html_for_string(code, ss, syntax, theme)
            .map_err(|e| HighlightError::Failed(e.to_string()))?;

        Ok(format!("<div class=\"highlight\">{}</div>\n", html))
    }
}

/// Transformer routing fenced code blocks through a [`Highlighter`]
pub struct HighlightTransformer<'a> {
    highlighter: &'a dyn Highlighter,
}

impl<'a> HighlightTransformer<'a> {
    pub fn new(highlighter: &'a dyn Highlighter) -> Self {
        Self { highlighter }
    }

    /// Transform events, replacing tagged code blocks with highlighted HTML
    pub fn transform(&self, events: Vec<Event<'_>>) -> Vec<Event<'static>> {
        let mut result = Vec::with_capacity(events.len());
        let mut in_code_block = false;
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    in_code_block = true;
                    code_lang = language_tag(&info);
                    code_content.clear();
                }
                Event::Text(text) if in_code_block => {
                    code_content.push_str(text.as_ref());
                }
                Event::End(TagEnd::CodeBlock) if in_code_block => {
                    in_code_block = false;

                    let html = match code_lang.take() {
                        Some(lang) => self.highlight_or_escape(&code_content, &lang),
                        None => plain_code_block(&code_content, None),
                    };
                    result.push(Event::Html(CowStr::Boxed(html.into_boxed_str())));
                }
                other => result.push(other.into_static()),
            }
        }

        result
    }

    fn highlight_or_escape(&self, code: &str, lang: &str) -> String {
        match self.highlighter.highlight(code, lang) {
            Ok(html) => html,
            Err(HighlightError::UnknownLanguage(lang)) => {
                tracing::debug!("No syntax for `{}`; rendering plain code block", lang);
                plain_code_block(code, Some(&lang))
            }
            Err(e) => {
                tracing::warn!("Highlighter failed for `{}`: {}", lang, e);
                plain_code_block(code, Some(lang))
            }
        }
    }
}

/// First token of a fence info string (`rust,ignore` and `ruby linenos` both
/// yield the bare language)
fn language_tag(info: &str) -> Option<String> {
    info.split(|c: char| c.is_whitespace() || c == ',')
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn plain_code_block(code: &str, lang: Option<&str>) -> String {
    match lang {
        Some(lang) => format!(
            "<pre><code class=\"language-{}\">{}</code></pre>\n",
            html_escape(lang),
            html_escape(code)
        ),
        None => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
    }
}
