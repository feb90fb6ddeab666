//! Syntactic classification of selector texts.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// The structural form of a selector, used to pick matchers and to decide
/// whether the absence of evidence is trustworthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorShape {
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// `div`
    Element,
    /// `[name="value"]`
    Attribute,
    /// `p.error`, `a#top.link`
    Compound,
    /// `div .item`, `ul > li`
    Combinator,
    /// `.btn:hover`, `a::before`
    PseudoClass,
}

impl SelectorShape {
    /// Classifies a normalized selector.
    pub fn of(selector: &str) -> Self {
        if is_combinator(selector) {
            Self::Combinator
        } else if pseudo_split(selector).is_some() {
            Self::PseudoClass
        } else if selector.starts_with('[') {
            Self::Attribute
        } else if is_simple_class_or_id(selector) {
            if selector.starts_with('.') {
                Self::Class
            } else {
                Self::Id
            }
        } else if element_regex().is_match(selector) {
            Self::Element
        } else {
            Self::Compound
        }
    }
}

fn simple_class_or_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| Regex::new(r"^[.#][A-Za-z0-9_-]+$").expect("Hardcoded regex pattern is valid"))
}

fn element_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| Regex::new(r"^(\*|[A-Za-z][A-Za-z0-9_-]*)$").expect("Hardcoded regex pattern is valid"))
}

/// True for a bare `.class` or `#id` with an identifier-like body.
///
/// Only these forms can be reported as definitely unused.
pub fn is_simple_class_or_id(selector: &str) -> bool {
    simple_class_or_id_regex().is_match(selector)
}

/// True if the selector contains a descendant (space) or child (`>`) combinator.
pub fn is_combinator(selector: &str) -> bool {
    selector.contains(char::is_whitespace) || selector.contains('>')
}

/// Splits a combinator selector into its non-empty simple parts.
pub fn combinator_parts(selector: &str) -> Vec<&str> {
    selector
        .split(|c: char| c.is_whitespace() || c == '>')
        .filter(|p| !p.is_empty())
        .collect()
}

/// Splits `base:pseudo` at the first `:` outside an attribute bracket.
///
/// Returns `None` when the selector has no pseudo part.
pub fn pseudo_split(selector: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in selector.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            ':' if depth == 0 => return Some((&selector[..i], &selector[i + 1..])),
            _ => {}
        }
    }
    None
}
