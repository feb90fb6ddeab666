//! Markup embedded in template `echo` strings.

use crate::selectors::SelectorUniverse;

use super::patterns::echo_statement;
use super::{Detection, LINE_MATCHERS};

/// Undoes backslash-escaped quotes inside an echoed string.
fn unescape_quotes(content: &str) -> String {
    content.replace("\\\"", "\"").replace("\\'", "'")
}

/// Runs every line matcher over the unescaped content of each `echo` string.
///
/// Detections carry the original source line as evidence, not the echoed
/// content.
pub fn detect_echo_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    let mut found = Vec::new();

    for caps in echo_statement().captures_iter(line) {
        let Some(raw) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        let content = unescape_quotes(raw.as_str());

        for (_, matcher) in LINE_MATCHERS {
            found.extend(
                matcher(&content, universe)
                    .into_iter()
                    .map(|d| Detection::new(d.selector, line)),
            );
        }
    }

    found
}
