//! Per-file analysis: runs the matchers over every line, then resolves
//! combinator and pseudo-class selectors from the file-wide evidence.
//!
//! The analysis state for one file lives in an explicit [`FileAccumulator`]
//! that is threaded through both passes, so each pass is a plain function of
//! its inputs.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::detect::{detect_line, detect_tagged_class_usage, is_bare_variable_line};
use crate::error::{DeadcssError, DeadcssResult};
use crate::logging::{log_file_failure, log_scanning};
use crate::selectors::SelectorUniverse;
use crate::shape::{combinator_parts, is_combinator, pseudo_split};

/// Target extensions scanned when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["html", "htm", "php", "phtml", "js", "jsx", "ts", "tsx"];

/// One recorded piece of evidence that a selector is used in a file.
///
/// At most one `Usage` exists per (selector, file, line number).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub selector: String,
    pub file: PathBuf,
    pub line_number: usize,
    pub line: String,
}

/// Broad category of a target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Static markup (`.html`)
    Markup,
    /// Server-side templates that can echo markup (`.php`)
    Template,
    /// Scripts (`.js`, `.ts`)
    Script,
}

impl FileKind {
    /// Classifies an extension. Unknown extensions are treated as markup.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "php" | "phtml" | "php3" | "php4" | "php5" | "inc" => Self::Template,
            "js" | "jsx" | "mjs" | "cjs" | "ts" | "tsx" => Self::Script,
            _ => Self::Markup,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|e| e.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Markup)
    }

    /// Whether `echo` statements can carry markup in this kind of file.
    pub fn supports_embedded(self) -> bool {
        matches!(self, Self::Template)
    }
}

/// Analysis state for a single file.
#[derive(Debug, Clone, Default)]
pub struct FileAccumulator {
    file: PathBuf,
    usages: Vec<Usage>,
    emitted: HashSet<(String, usize)>,
    seen: HashSet<String>,
    first_seen: HashMap<String, (usize, String)>,
}

impl FileAccumulator {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            ..Self::default()
        }
    }

    /// Emits a usage unless one already exists for (selector, line number).
    /// Returns whether a usage was added.
    pub fn emit(&mut self, selector: &str, line_number: usize, line: &str) -> bool {
        if !self.emitted.insert((selector.to_string(), line_number)) {
            return false;
        }
        self.usages.push(Usage {
            selector: selector.to_string(),
            file: self.file.clone(),
            line_number,
            line: line.trim().to_string(),
        });
        true
    }

    /// Records direct line-pass evidence: emits the usage and remembers the
    /// earliest line the selector was seen on.
    pub fn observe(&mut self, selector: &str, line_number: usize, line: &str) {
        self.emit(selector, line_number, line);
        if self.seen.insert(selector.to_string()) {
            self.first_seen
                .insert(selector.to_string(), (line_number, line.to_string()));
        }
    }

    pub fn has_seen(&self, selector: &str) -> bool {
        self.seen.contains(selector)
    }

    /// Earliest (line number, evidence line) recorded for a selector.
    pub fn first_seen(&self, selector: &str) -> Option<(usize, &str)> {
        self.first_seen
            .get(selector)
            .map(|(n, line)| (*n, line.as_str()))
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn usages(&self) -> &[Usage] {
        &self.usages
    }

    pub fn into_usages(self) -> Vec<Usage> {
        self.usages
    }
}

/// First pass: runs the matchers on every trimmed line.
///
/// In files that support embedded statements, lines that are just a
/// `$variable` expression without a classed tag are skipped.
pub fn line_pass(
    universe: &SelectorUniverse,
    mut acc: FileAccumulator,
    content: &str,
    kind: FileKind,
) -> FileAccumulator {
    let embedded = kind.supports_embedded();

    for (idx, raw) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw.trim();

        if embedded && is_bare_variable_line(line) {
            continue;
        }

        for detection in detect_line(line, universe, embedded) {
            acc.observe(&detection.selector, line_number, &detection.line);
        }
    }

    acc
}

/// True if `part` was seen directly, or appears verbatim as a
/// `class="part"` / `id="part"` attribute somewhere in the file.
fn part_present(acc: &FileAccumulator, part: &str, content: &str) -> bool {
    if acc.has_seen(part) {
        return true;
    }
    if let Some(class) = part.strip_prefix('.') {
        return content.contains(&format!(r#"class="{class}""#));
    }
    if let Some(id) = part.strip_prefix('#') {
        return content.contains(&format!(r#"id="{id}""#));
    }
    false
}

/// Second pass: resolves compound, combinator and pseudo-class selectors
/// from the evidence gathered by [`line_pass`].
///
/// Every `tag.class` pair in the file is recorded first, so compounds past
/// the first pair on a line still count. Lines skipped by the line pass are
/// skipped here too. A combinator selector is used when every part is present in the file; it
/// is attributed to the first part (in selector order) that has a recorded
/// line, or to line 1. A pseudo-class selector is used when its base was seen,
/// and is attributed to the base's line.
pub fn combinator_pass(
    universe: &SelectorUniverse,
    mut acc: FileAccumulator,
    content: &str,
    kind: FileKind,
) -> FileAccumulator {
    let embedded = kind.supports_embedded();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if embedded && is_bare_variable_line(line) {
            continue;
        }
        for detection in detect_tagged_class_usage(line, universe) {
            acc.observe(&detection.selector, idx + 1, &detection.line);
        }
    }

    for selector in universe.selectors() {
        if is_combinator(selector) {
            let parts = combinator_parts(selector);
            if parts.is_empty() || !parts.iter().all(|p| part_present(&acc, p, content)) {
                continue;
            }

            let (line_number, line) = parts
                .iter()
                .find_map(|p| acc.first_seen(p))
                .map(|(n, l)| (n, l.to_string()))
                .unwrap_or_else(|| (1, content.lines().next().unwrap_or("").to_string()));
            acc.emit(selector, line_number, &line);
        } else if let Some((base, _)) = pseudo_split(selector) {
            if let Some((line_number, line)) = acc.first_seen(base).map(|(n, l)| (n, l.to_string())) {
                acc.emit(selector, line_number, &line);
            }
        }
    }

    acc
}

/// Analyzes in-memory content for one file. Pure: no I/O.
pub fn analyze_content(
    universe: &SelectorUniverse,
    file: &Path,
    content: &str,
    kind: FileKind,
) -> Vec<Usage> {
    let acc = FileAccumulator::new(file);
    let acc = line_pass(universe, acc, content, kind);
    combinator_pass(universe, acc, content, kind).into_usages()
}

/// Reads and analyzes one target file.
pub fn analyze_file(universe: &SelectorUniverse, path: &Path) -> DeadcssResult<Vec<Usage>> {
    let content = fs::read_to_string(path)
        .map_err(|e| DeadcssError::scan(path, format!("cannot read file: {e}")))?;
    Ok(analyze_content(universe, path, &content, FileKind::from_path(path)))
}

/// Like [`analyze_file`], but a failure is logged and yields no usages so
/// one bad file never aborts the run.
pub fn analyze_file_lenient(universe: &SelectorUniverse, path: &Path) -> Vec<Usage> {
    log_scanning(path);
    match analyze_file(universe, path) {
        Ok(usages) => usages,
        Err(e) => {
            log_file_failure(path, &e);
            Vec::new()
        }
    }
}
