//! Pre-compiled regex patterns shared by the matchers.
//!
//! Each pattern is compiled once on first use via `OnceLock`.

use std::sync::OnceLock;

use regex::Regex;

macro_rules! static_regex {
    ($(#[$meta:meta])* $name:ident, $pattern:expr) => {
        $(#[$meta])*
        pub(crate) fn $name() -> &'static Regex {
            static REGEX: OnceLock<Regex> = OnceLock::new();
            // SAFETY: This regex pattern is hardcoded and validated at compile-test time.
            REGEX.get_or_init(|| Regex::new($pattern).expect("Hardcoded regex pattern is valid"))
        }
    };
}

static_regex!(
    /// `class="a b"` / `class='a b'`; group 1 is the raw class list.
    class_attr,
    r#"class=["']([^"']*)["']"#
);

static_regex!(
    /// `id="x"` / `id='x'`; group 1 is the id value.
    id_attr,
    r#"id=["']([^"']*)["']"#
);

static_regex!(
    /// Tag open `<name`; group 1 is the tag name.
    tag_open,
    r"<([A-Za-z][\w-]*)"
);

static_regex!(
    /// Double-quoted `name="value"`.
    attr_pair,
    r#"([\w-]+)="([^"]*)""#
);

static_regex!(
    /// A tag carrying a class attribute.
    tag_with_class,
    r#"<[^>]+class=["'][^>]*>"#
);

static_regex!(
    /// A tag and its own class attribute; group 1 is the tag name, group 2
    /// the raw class list.
    tag_class_pair,
    r#"<([A-Za-z][\w-]*)[^>]*?\bclass=["']([^"']*)["']"#
);

static_regex!(
    /// A line that starts with a `$variable` reference.
    template_var,
    r"^\s*\$\w+"
);

static_regex!(
    /// Inline `style="..."` attribute, whole match.
    style_attr,
    r#"style=["'][^"']*["']"#
);

static_regex!(
    /// `classList.add/remove/toggle("token")`; group 1 is the token.
    class_list_call,
    r#"classList\.(?:add|remove|toggle)\s*\(\s*["']([^"']+)["']"#
);

static_regex!(
    /// `echo "..."` or `echo '...'`. Backslash-escaped quotes do not end the
    /// string. Group 1 holds double-quoted content, group 2 single-quoted.
    echo_statement,
    r#"echo\s*(?:"((?:[^"\\]|\\.)*)"|'((?:[^'\\]|\\.)*)')"#
);
