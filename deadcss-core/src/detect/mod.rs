//! Usage detection: one pure matcher per selector shape.
//!
//! Every matcher takes a single source line and the selector universe and
//! returns the selectors it found evidence for. Matchers are independent and
//! side-effect free; the reconciler runs them all and dedups the results.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │  markup.rs   │  │  pseudo.rs   │  │   echo.rs    │
//! │  class, id,  │  │ inline style │  │ re-runs the  │
//! │  element,    │  │ + classList  │  │ line matchers│
//! │  attribute,  │  │              │  │ on echoed    │
//! │  compound    │  │              │  │ strings      │
//! └──────┬───────┘  └──────┬───────┘  └──────┬───────┘
//!        └─────────────────┼─────────────────┘
//!                          ▼
//!                   LINE_MATCHERS / detect_line
//! ```

pub mod echo;
pub mod markup;
pub(crate) mod patterns;
pub mod pseudo;

use serde::{Deserialize, Serialize};

use crate::selectors::SelectorUniverse;
use crate::shape::SelectorShape;

pub use echo::detect_echo_usage;
pub use markup::{
    detect_attribute_usage, detect_class_usage, detect_compound_usage, detect_element_usage,
    detect_id_usage, detect_tagged_class_usage,
};
pub use pseudo::detect_pseudo_usage;

/// One piece of evidence: a selector and the source line it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub selector: String,
    pub line: String,
}

impl Detection {
    pub fn new(selector: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            line: line.into(),
        }
    }
}

/// Signature shared by every line matcher.
pub type Matcher = fn(&str, &SelectorUniverse) -> Vec<Detection>;

/// Flat registry of the matchers run on every line, keyed by the selector
/// shape each one detects.
pub const LINE_MATCHERS: &[(SelectorShape, Matcher)] = &[
    (SelectorShape::Class, detect_class_usage),
    (SelectorShape::Id, detect_id_usage),
    (SelectorShape::Element, detect_element_usage),
    (SelectorShape::Attribute, detect_attribute_usage),
    (SelectorShape::Compound, detect_compound_usage),
    (SelectorShape::PseudoClass, detect_pseudo_usage),
];

/// Runs all line matchers, plus the echo matcher when the file type supports
/// embedded statements.
pub fn detect_line(line: &str, universe: &SelectorUniverse, embedded: bool) -> Vec<Detection> {
    let mut found: Vec<Detection> = LINE_MATCHERS
        .iter()
        .flat_map(|(_, matcher)| matcher(line, universe))
        .collect();

    if embedded {
        found.extend(detect_echo_usage(line, universe));
    }

    found
}

/// True if the line starts with a `$variable` and carries no tag with a
/// `class=` attribute. Such lines are skipped in template files.
pub fn is_bare_variable_line(line: &str) -> bool {
    patterns::template_var().is_match(line) && !patterns::tag_with_class().is_match(line)
}
