//! Typographic substitution over rendered HTML.
//!
//! Straight quotes become curly quotes, `---` and `--` become em and en
//! dashes, `...` becomes an ellipsis, and `(c)`, `(r)`, `(tm)` become their
//! symbols. Markup, comments, and the contents of `pre`, `code`, `kbd`,
//! `script` and `style` elements pass through untouched.
//!
//! The pipeline applies it exactly once per render. It is not meant to be
//! re-run over its own output.

use super::{HtmlStage, RenderError};

const SKIP_TAGS: &[&str] = &["pre", "code", "kbd", "script", "style", "math"];

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "ul", "ol", "blockquote", "div", "td", "th",
    "tr", "table", "br", "hr", "dt", "dd", "section", "article", "footer",
];

/// HTML stage applying "smart" typography
#[derive(Debug, Default, Clone, Copy)]
pub struct Typography;

impl Typography {
    pub fn new() -> Self {
        Self
    }
}

impl HtmlStage for Typography {
    fn name(&self) -> &'static str {
        "typography"
    }

    fn apply(&self, html: &str) -> Result<String, RenderError> {
        Ok(smarten(html))
    }
}

/// Apply typographic substitutions to an HTML fragment
pub fn smarten(html: &str) -> String {
    let mut out = String::with_capacity(html.len() + html.len() / 8);
    let mut skip_depth = 0usize;
    let mut prev: Option<char> = None;
    let mut rest = html;

    while !rest.is_empty() {
        if rest.starts_with("<!--") {
            let end = rest.find("-->").map(|i| i + 3).unwrap_or(rest.len());
            out.push_str(&rest[..end]);
            rest = &rest[end..];
            continue;
        }

        if rest.starts_with('<') {
            let end = tag_end(rest);
            let tag = &rest[..end];
            if let Some((name, closing, self_closing)) = parse_tag(tag) {
                if SKIP_TAGS.contains(&name.as_str()) && !self_closing {
                    if closing {
                        skip_depth = skip_depth.saturating_sub(1);
                    } else {
                        skip_depth += 1;
                    }
                }
                if BLOCK_TAGS.contains(&name.as_str()) {
                    prev = None;
                }
            }
            out.push_str(tag);
            rest = &rest[end..];
            continue;
        }

        let end = rest.find('<').unwrap_or(rest.len());
        let text = &rest[..end];
        if skip_depth > 0 {
            out.push_str(text);
            if let Some(c) = text.chars().last() {
                prev = Some(c);
            }
        } else {
            smarten_text(text, &mut prev, &mut out);
        }
        rest = &rest[end..];
    }

    out
}

/// Byte offset just past the `>` closing the tag at the start of `html`,
/// ignoring any `>` inside quoted attribute values
fn tag_end(html: &str) -> usize {
    let mut quote: Option<char> = None;
    let mut after_equals = false;
    for (i, c) in html.char_indices() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '>' => return i + 1,
            '"' | '\'' if after_equals => quote = Some(c),
            c if c.is_whitespace() => continue,
            _ => {}
        }
        after_equals = c == '=';
    }
    html.len()
}

/// Lowercased tag name plus closing / self-closing flags
fn parse_tag(tag: &str) -> Option<(String, bool, bool)> {
    let inner = tag.strip_prefix('<')?;
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if name.is_empty() {
        return None;
    }
    let self_closing = tag.ends_with("/>");
    Some((name, closing, self_closing))
}

fn smarten_text(text: &str, prev: &mut Option<char>, out: &mut String) {
    let mut i = 0;

    while i < text.len() {
        let rest = &text[i..];

        if let Some((entity, len)) = read_entity(rest) {
            match entity {
                "&quot;" => push_quote('"', rest[len..].chars().next(), prev, out),
                "&#39;" | "&#x27;" | "&apos;" => {
                    push_quote('\'', rest[len..].chars().next(), prev, out)
                }
                _ => {
                    out.push_str(entity);
                    *prev = Some(';');
                }
            }
            i += len;
            continue;
        }

        if let Some((replacement, len)) = replacement_at(rest) {
            out.push(replacement);
            *prev = Some(replacement);
            i += len;
            continue;
        }

        let c = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        let next = rest[c.len_utf8()..].chars().next();
        match c {
            '"' | '\'' => push_quote(c, next, prev, out),
            _ => {
                out.push(c);
                *prev = Some(c);
            }
        }
        i += c.len_utf8();
    }
}

/// A complete `&...;` entity at the start of `text`
fn read_entity(text: &str) -> Option<(&str, usize)> {
    if !text.starts_with('&') {
        return None;
    }
    let end = text.char_indices().take(12).find(|(_, c)| *c == ';')?.0;
    let body = &text[1..end];
    let valid = !body.is_empty()
        && body
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '#');
    valid.then_some((&text[..=end], end + 1))
}

fn replacement_at(text: &str) -> Option<(char, usize)> {
    const TABLE: &[(&str, char)] = &[
        ("---", '\u{2014}'),
        ("--", '\u{2013}'),
        ("...", '\u{2026}'),
        (". . .", '\u{2026}'),
    ];
    for (pattern, replacement) in TABLE {
        if text.starts_with(pattern) {
            return Some((*replacement, pattern.len()));
        }
    }

    const SYMBOLS: &[(&str, char)] = &[("(c)", '©'), ("(r)", '®'), ("(tm)", '™')];
    for (pattern, replacement) in SYMBOLS {
        if let Some(head) = text.get(..pattern.len()) {
            if head.eq_ignore_ascii_case(pattern) {
                return Some((*replacement, pattern.len()));
            }
        }
    }

    None
}

fn push_quote(quote: char, next: Option<char>, prev: &mut Option<char>, out: &mut String) {
    let opening = opens_quote(*prev);
    let curly = match quote {
        '"' if opening => '\u{201C}',
        '"' => '\u{201D}',
        // '90s and 'tis read as apostrophes
        '\'' if opening && !next.is_some_and(|c| c.is_ascii_digit()) => '\u{2018}',
        _ => '\u{2019}',
    };
    out.push(curly);
    *prev = Some(curly);
}

fn opens_quote(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => {
            c.is_whitespace()
                || matches!(c, '(' | '[' | '{' | '-' | '\u{2013}' | '\u{2014}' | '\u{201C}' | '\u{2018}')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_attribute_containing_gt() {
        assert_eq!(
            smarten("<p><span title=\"a>b\">\"x\"</span></p>"),
            "<p><span title=\"a>b\">“x”</span></p>"
        );
        assert_eq!(
            smarten("<p><a href='/x?a>b'>it's</a></p>"),
            "<p><a href='/x?a>b'>it’s</a></p>"
        );
    }

    #[test]
    fn test_double_quotes() {
        assert_eq!(
            smarten("<p>say \"or something\" now</p>"),
            "<p>say “or something” now</p>"
        );
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(
            smarten("<p>&quot;hi&quot; &amp; &#39;bye&#39;</p>"),
            "<p>“hi” &amp; ‘bye’</p>"
        );
    }

    #[test]
    fn test_apostrophes() {
        assert_eq!(smarten("<p>don't</p>"), "<p>don’t</p>");
        assert_eq!(smarten("<p>back in '90s</p>"), "<p>back in ’90s</p>");
    }

    #[test]
    fn test_nested_quotes() {
        assert_eq!(
            smarten("<p>\"she said 'no'\"</p>"),
            "<p>“she said ‘no’”</p>"
        );
    }

    #[test]
    fn test_dashes_and_ellipsis() {
        assert_eq!(
            smarten("<p>one -- two --- three...</p>"),
            "<p>one – two — three…</p>"
        );
    }

    #[test]
    fn test_symbols() {
        assert_eq!(smarten("<p>(c) (R) (tm)</p>"), "<p>© ® ™</p>");
    }

    #[test]
    fn test_quote_after_inline_markup() {
        assert_eq!(
            smarten("<p>a <em>\"b\"</em> c</p>"),
            "<p>a <em>“b”</em> c</p>"
        );
    }

    #[test]
    fn test_block_start_opens_quote() {
        assert_eq!(
            smarten("<p>end.</p><p>\"Start\"</p>"),
            "<p>end.</p><p>“Start”</p>"
        );
    }

    #[test]
    fn test_markup_and_code_untouched() {
        let html = "<a href=\"x--y\" title='t'>link</a><pre><code>\"a\" -- b</code></pre><!-- c -- d -->";
        assert_eq!(smarten(html), html);
    }

    #[test]
    fn test_inline_code_sets_context() {
        assert_eq!(
            smarten("<p><code>Vec</code>'s</p>"),
            "<p><code>Vec</code>’s</p>"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(smarten("<p>nothing to see</p>"), "<p>nothing to see</p>");
    }
}
