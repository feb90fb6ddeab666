//! Matchers for selectors that appear directly as markup: class and id
//! attributes, tag names, attribute pairs and element.class compounds.

use crate::selectors::SelectorUniverse;

use super::patterns::{attr_pair, class_attr, id_attr, tag_class_pair, tag_open};
use super::Detection;

/// Reports `.token` for every class token of every `class=` attribute on the line.
pub fn detect_class_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    let mut found = Vec::new();
    for caps in class_attr().captures_iter(line) {
        for token in caps[1].split_whitespace() {
            let selector = format!(".{token}");
            if universe.contains(&selector) {
                found.push(Detection::new(selector, line));
            }
        }
    }
    found
}

/// Reports `#value` for every `id=` attribute. The value is not split.
pub fn detect_id_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    id_attr()
        .captures_iter(line)
        .map(|caps| format!("#{}", &caps[1]))
        .filter(|selector| universe.contains(selector))
        .map(|selector| Detection::new(selector, line))
        .collect()
}

/// Reports the bare tag name of every `<tag` opening on the line.
pub fn detect_element_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    tag_open()
        .captures_iter(line)
        .map(|caps| caps[1].to_string())
        .filter(|tag| universe.contains(tag))
        .map(|tag| Detection::new(tag, line))
        .collect()
}

/// Reports `[name="value"]` for double-quoted attribute pairs on tag-shaped lines.
///
/// `class=` and `id=` pairs are candidates too; the reconciler dedups them.
pub fn detect_attribute_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    if !(line.contains('<') && line.contains('>')) {
        return Vec::new();
    }

    attr_pair()
        .captures_iter(line)
        .map(|caps| format!(r#"[{}="{}"]"#, &caps[1], caps[2].trim()))
        .filter(|selector| universe.contains(selector))
        .map(|selector| Detection::new(selector, line))
        .collect()
}

/// Reports `tag.class` built from the first tag and the first class attribute
/// on the line only. Later tags and class attributes are never paired.
pub fn detect_compound_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    let (Some(tag), Some(classes)) = (
        tag_open().captures(line),
        class_attr().captures(line),
    ) else {
        return Vec::new();
    };

    classes[1]
        .split_whitespace()
        .map(|class| format!("{}.{}", &tag[1], class))
        .filter(|selector| universe.contains(selector))
        .map(|selector| Detection::new(selector, line))
        .collect()
}

/// Reports `tag.class` for every tag on the line paired with its own class
/// attribute. Not a line matcher; the second file pass uses it to resolve
/// compounds the first-pair heuristic misses.
pub fn detect_tagged_class_usage(line: &str, universe: &SelectorUniverse) -> Vec<Detection> {
    let mut found = Vec::new();
    for caps in tag_class_pair().captures_iter(line) {
        for class in caps[2].split_whitespace() {
            let selector = format!("{}.{}", &caps[1], class);
            if universe.contains(&selector) {
                found.push(Detection::new(selector, line));
            }
        }
    }
    found
}
