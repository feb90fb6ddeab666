//! Selector extraction from stylesheet text.
//!
//! This is deliberately not a CSS parser. Block comments are stripped first,
//! then every flat `selector-list { body }` rule is matched and its selector
//! list split on top-level commas. Rules nested inside at-rule blocks are not
//! unwrapped.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

use crate::error::{DeadcssError, DeadcssResult};

/// Mapping of selector text to the stylesheet that defines it.
///
/// Keys are unique. Inserting a selector that is already present replaces its
/// defining path, so the last stylesheet to define a selector wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorUniverse {
    defs: BTreeMap<String, PathBuf>,
}

impl SelectorUniverse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a universe where every selector is defined in `path`.
    pub fn from_selectors<I, S>(selectors: I, path: impl AsRef<Path>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path = path.as_ref();
        selectors
            .into_iter()
            .map(|s| (s.into(), path.to_path_buf()))
            .collect()
    }

    /// Registers a selector, replacing any earlier defining path.
    pub fn insert(&mut self, selector: impl Into<String>, path: impl Into<PathBuf>) {
        self.defs.insert(selector.into(), path.into());
    }

    /// Merges `other` into `self`; entries from `other` win on collision.
    pub fn merge(&mut self, other: SelectorUniverse) {
        self.defs.extend(other.defs);
    }

    #[inline]
    pub fn contains(&self, selector: &str) -> bool {
        self.defs.contains_key(selector)
    }

    pub fn defined_in(&self, selector: &str) -> Option<&Path> {
        self.defs.get(selector).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Selector texts in sorted order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.defs.keys().map(String::as_str)
    }

    /// (selector, defining path) pairs in sorted selector order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.defs.iter().map(|(s, p)| (s.as_str(), p.as_path()))
    }
}

impl FromIterator<(String, PathBuf)> for SelectorUniverse {
    fn from_iter<T: IntoIterator<Item = (String, PathBuf)>>(iter: T) -> Self {
        Self {
            defs: iter.into_iter().collect(),
        }
    }
}

fn comment_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("Hardcoded regex pattern is valid"))
}

fn rule_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
    REGEX.get_or_init(|| Regex::new(r"([^{}]+)\{[^}]*\}").expect("Hardcoded regex pattern is valid"))
}

/// Removes `/* ... */` comments. Comments do not nest.
pub fn strip_comments(css: &str) -> String {
    comment_regex().replace_all(css, "").into_owned()
}

/// Splits a selector list on commas that are outside parentheses, brackets
/// and quoted strings.
pub fn split_selector_list(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '(') | (None, '[') => depth += 1,
            (None, ')') | (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Trims a selector and collapses internal whitespace runs to one space.
pub fn normalize_selector(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extracts every selector defined in `css`, attributing each to `path`.
pub fn extract_selectors(css: &str, path: &Path) -> SelectorUniverse {
    let stripped = strip_comments(css);
    let mut universe = SelectorUniverse::new();

    for caps in rule_regex().captures_iter(&stripped) {
        let Some(list) = caps.get(1) else { continue };
        for piece in split_selector_list(list.as_str()) {
            let selector = normalize_selector(piece);
            if !selector.is_empty() {
                universe.insert(selector, path);
            }
        }
    }

    universe
}

/// Reads and extracts one stylesheet.
///
/// An unreadable stylesheet is fatal for the run.
pub fn parse_stylesheet(path: &Path) -> DeadcssResult<SelectorUniverse> {
    let css = fs::read_to_string(path)
        .map_err(|e| DeadcssError::stylesheet(path, format!("cannot read stylesheet: {e}")))?;
    Ok(extract_selectors(&css, path))
}

/// Reads and merges several stylesheets in order. Later files override
/// earlier ones when they define the same selector text.
pub fn parse_stylesheets(paths: &[PathBuf]) -> DeadcssResult<SelectorUniverse> {
    let mut universe = SelectorUniverse::new();
    for path in paths {
        universe.merge(parse_stylesheet(path)?);
    }
    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(css: &str) -> Vec<String> {
        extract_selectors(css, Path::new("test.css"))
            .selectors()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_extract_basic_selectors() {
        let css = r#"
        .container { width: 80%; }
        #main { padding: 20px; }
        div { border: 1px solid #ccc; }
        p.error { color: red; }
        [data-type="button"] { cursor: pointer; }
        "#;
        let found = extract(css);
        assert_eq!(found.len(), 5);
        for sel in [".container", "#main", "div", "p.error", r#"[data-type="button"]"#] {
            assert!(found.contains(&sel.to_string()), "missing {sel}");
        }
    }

    #[test]
    fn test_comma_groups_are_split_and_trimmed() {
        let found = extract(".a, .b , #c {x:1}");
        assert_eq!(found, vec!["#c", ".a", ".b"]);
    }

    #[test]
    fn test_comments_are_stripped_before_matching() {
        assert_eq!(extract("/* .fake {x:1} */ .real{y:2}"), vec![".real"]);
    }

    #[test]
    fn test_multiline_comment() {
        let css = "/*\n.ghost { a: b; }\n*/\n.alive { c: d; }";
        assert_eq!(extract(css), vec![".alive"]);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let css = ".b{} .a, #x{} div > .item{}";
        let first = extract_selectors(css, Path::new("s.css"));
        let second = extract_selectors(css, Path::new("s.css"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_commas_inside_brackets_and_parens_are_kept() {
        let found = extract(r#"[data-x="a,b"], :is(.p, .q) { color: red; }"#);
        assert_eq!(found, vec![":is(.p, .q)", r#"[data-x="a,b"]"#]);
    }

    #[test]
    fn test_internal_whitespace_is_collapsed() {
        assert_eq!(extract(".container\n    .item { a: b; }"), vec![".container .item"]);
    }

    #[test]
    fn test_nested_rule_after_at_block_does_not_leak_brace() {
        let found = extract("@media print { .a { c: d; } }\n.b { e: f; }");
        assert!(found.contains(&".b".to_string()));
        assert!(found.iter().all(|s| !s.contains('}')));
    }

    #[test]
    fn test_empty_pieces_are_skipped() {
        assert_eq!(extract(".a,,{x:1}"), vec![".a"]);
    }

    #[test]
    fn test_merge_last_writer_wins() {
        let mut universe = SelectorUniverse::from_selectors([".a", ".b"], "first.css");
        universe.merge(SelectorUniverse::from_selectors([".b"], "second.css"));
        assert_eq!(universe.len(), 2);
        assert_eq!(universe.defined_in(".a"), Some(Path::new("first.css")));
        assert_eq!(universe.defined_in(".b"), Some(Path::new("second.css")));
    }

    #[test]
    fn test_parse_stylesheet_missing_file_is_fatal() {
        let err = parse_stylesheet(Path::new("/definitely/not/here.css")).unwrap_err();
        assert!(matches!(err, DeadcssError::Stylesheet { .. }));
        assert!(!err.is_recoverable());
    }
}
