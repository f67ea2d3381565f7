//! Content rendering pipeline: markdown → highlighted HTML → typography.
//!
//! The pipeline is a fixed sequence. Markdown is parsed into events, bare
//! URLs are autolinked, fenced code is routed through a [`Highlighter`], the
//! events are written out as HTML, and the HTML then flows through an ordered
//! list of [`HtmlStage`]s (by default only [`Typography`]).

pub mod autolink;
pub mod highlight;
pub mod typography;

use pulldown_cmark::{html, Event, Options, Parser};
use std::sync::Arc;
use thiserror::Error;

pub use autolink::AutolinkTransformer;
pub use highlight::{HighlightError, HighlightTransformer, Highlighter, SyntectHighlighter};
pub use typography::Typography;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render stage `{stage}` failed: {message}")]
    Stage {
        stage: &'static str,
        message: String,
    },
}

/// A pure transform over a complete HTML fragment
pub trait HtmlStage: Send + Sync {
    fn name(&self) -> &'static str;

    fn apply(&self, html: &str) -> Result<String, RenderError>;
}

/// Markdown renderer with highlighting and typographic substitution
///
/// Holds only configuration; rendering the same input twice gives the same
/// output.
pub struct Renderer {
    options: Options,
    highlighter: Arc<dyn Highlighter>,
    stages: Vec<Box<dyn HtmlStage>>,
}

impl Renderer {
    /// Renderer bound to syntect with the typography stage enabled
    pub fn new() -> Self {
        Self::with_highlighter(Arc::new(SyntectHighlighter::new()))
    }

    pub fn with_highlighter(highlighter: Arc<dyn Highlighter>) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        // Smart punctuation stays off: the Typography stage owns quotes and dashes

        Self {
            options,
            highlighter,
            stages: vec![Box::new(Typography::new())],
        }
    }

    /// Replace the HTML stages run after markdown conversion
    pub fn with_stages(mut self, stages: Vec<Box<dyn HtmlStage>>) -> Self {
        self.stages = stages;
        self
    }

    /// Render raw markdown into final HTML
    pub fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut output = self.markdown_to_html(markdown);

        for stage in &self.stages {
            output = stage.apply(&output)?;
        }

        Ok(output)
    }

    /// Markdown conversion with autolinks and highlighting, before any
    /// HTML stage runs
    pub fn markdown_to_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let events: Vec<Event> = parser.collect();

        let events = AutolinkTransformer::new().transform(events);

        let highlight_transformer = HighlightTransformer::new(self.highlighter.as_ref());
        let events = highlight_transformer.transform(events);

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stages: Vec<&str> = self.stages.iter().map(|s| s.name()).collect();
        f.debug_struct("Renderer")
            .field("options", &self.options)
            .field("stages", &stages)
            .finish()
    }
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
