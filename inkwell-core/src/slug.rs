//! Slug generation for default permalinks.

use regex::Regex;
use std::sync::OnceLock;

static NON_WORD_RUN: OnceLock<Regex> = OnceLock::new();

fn non_word_run() -> &'static Regex {
    NON_WORD_RUN.get_or_init(|| Regex::new(r"\W+").expect("static regex is valid"))
}

/// Convert a title to a URL slug
///
/// Rules:
/// - Lowercase
/// - Every maximal run of non-word characters (anything that is not a
///   letter, digit or underscore) becomes a single hyphen
///
/// Leading and trailing runs are kept as hyphens, so the slug of a title is
/// stable even when it ends in punctuation.
///
/// # Examples
///
/// ```
/// use inkwell_core::slugify;
///
/// assert_eq!(slugify("something about something"), "something-about-something");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("oh hai!"), "oh-hai-");
/// ```
pub fn slugify(input: &str) -> String {
    let lowercased = input.to_lowercase();
    non_word_run().replace_all(&lowercased, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("something about something"), "something-about-something");
    }

    #[test]
    fn test_runs_collapse_to_one_hyphen() {
        assert_eq!(slugify("Hello    World"), "hello-world");
        assert_eq!(slugify("C++ -- Programming"), "c-programming");
        assert_eq!(slugify("What's new?"), "what-s-new-");
    }

    #[test]
    fn test_underscores_are_word_characters() {
        assert_eq!(slugify("rust_lang basics"), "rust_lang-basics");
    }

    #[test]
    fn test_unicode_letters_survive() {
        assert_eq!(slugify("Café Crème"), "café-crème");
    }

    #[test]
    fn test_empty_and_special_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "-");
    }
}
