//! Pseudo-class evidence: inline style attributes and `classList` calls.

use std::collections::HashSet;

use crate::selectors::SelectorUniverse;
use crate::shape::pseudo_split;

use super::patterns::{class_attr, class_list_call, style_attr};
use super::Detection;

/// Detects pseudo-class usage two ways:
///
/// - a `style="..."` attribute containing `:pseudo` on a line whose classes
///   include the base of a `base:pseudo` selector;
/// - a `classList.add/remove/toggle("token")` call, where `.token` is looked
///   up directly (so `"btn:hover"` resolves to `.btn:hover`).
pub fn detect_pseudo_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    let mut found = Vec::new();

    let styles: Vec<&str> = style_attr().find_iter(line).map(|m| m.as_str()).collect();
    if !styles.is_empty() {
        let classes: HashSet<String> = class_attr()
            .captures_iter(line)
            .flat_map(|caps| {
                caps[1]
                    .split_whitespace()
                    .map(|c| format!(".{c}"))
                    .collect::<Vec<_>>()
            })
            .collect();

        for style in styles {
            for selector in universe.selectors() {
                let Some((base, pseudo)) = pseudo_split(selector) else {
                    continue;
                };
                if classes.contains(base) && style.contains(&format!(":{pseudo}")) {
                    found.push(Detection::new(selector, line));
                }
            }
        }
    }

    for caps in class_list_call().captures_iter(line) {
        let selector = format!(".{}", &caps[1]);
        if universe.contains(&selector) {
            found.push(Detection::new(selector, line));
        }
    }

    found
}
