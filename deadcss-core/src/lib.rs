//! deadcss-core: unused CSS selector detection library
//!
//! This library parses stylesheets into a selector universe, scans markup,
//! template and script files for evidence that each selector is used, and
//! assigns every selector a verdict.
//!
//! # Features
//!
//! - **Selector extraction**: Comment stripping, top-level comma splitting, whitespace normalization
//! - **Shape-specific matchers**: Class, id, element, attribute, compound and pseudo-class evidence
//! - **Embedded markup**: Markup inside template `echo` strings is matched like literal markup
//! - **Combinator resolution**: Descendant and child selectors resolved per file
//! - **Three-valued verdicts**: Used, unused, or indeterminate when detection cannot decide
//! - **Incremental caching**: Only re-analyze changed files
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use deadcss_core::prelude::*;
//!
//! let result = Deadcss::new("css/site.css", "templates")
//!     .with_cache(true)
//!     .analyze()?;
//!
//! for report in result.with_verdict(Verdict::Unused) {
//!     println!("Unused selector: {}", report.selector);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`selectors`]: Stylesheet parsing into a [`SelectorUniverse`]
//! - [`shape`]: Selector shape classification
//! - [`detect`]: Per-line usage matchers
//! - [`analyze`]: Per-file passes (line pass, then combinator pass)
//! - [`verdict`]: Cross-file reconciliation and verdicts
//! - [`report`]: CSV, JSON and plaintext output
//! - [`scan`]: Parallel file discovery
//! - [`cache`]: Incremental analysis cache with SHA-256 change detection
//! - [`builder`]: Fluent builder API for configuration
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `cache` (default): Enable the incremental analysis cache

// Core modules (always available)
pub mod analyze;
pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod scan;
pub mod selectors;
pub mod shape;
pub mod verdict;

// Feature-gated modules
#[cfg(feature = "cache")]
pub mod cache;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{DeadcssError, DeadcssResult, IoResultExt};

// Builder API
pub use builder::{is_ignored, AnalysisResult, Deadcss};

// Configuration
pub use config::{load_config, DeadcssConfig, OutputConfig, CONFIG_FILE};

// Stylesheet parsing
pub use selectors::{
    extract_selectors, normalize_selector, parse_stylesheet, parse_stylesheets,
    split_selector_list, strip_comments, SelectorUniverse,
};

// Shapes
pub use shape::{combinator_parts, is_combinator, is_simple_class_or_id, pseudo_split, SelectorShape};

// Detection
pub use detect::{
    detect_attribute_usage, detect_class_usage, detect_compound_usage, detect_echo_usage,
    detect_element_usage, detect_id_usage, detect_line, detect_pseudo_usage, detect_tagged_class_usage,
    is_bare_variable_line, Detection, Matcher, LINE_MATCHERS,
};

// Per-file analysis
pub use analyze::{
    analyze_content, analyze_file, analyze_file_lenient, combinator_pass, line_pass,
    FileAccumulator, FileKind, Usage, DEFAULT_EXTENSIONS,
};

// Verdicts
pub use verdict::{reconcile, SelectorReport, Verdict, VerdictStats};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{
    print_json, print_summary, select_rows, to_json, write_csv, write_csv_file, ReportOptions,
    CONDENSED_HEADER, DETAILED_HEADER,
};

// File scanning
pub use scan::{gather_files, gather_stylesheets, gather_target_files, EXCLUDED_DIRS};

// Feature-gated re-exports
#[cfg(feature = "cache")]
pub use cache::{
    file_hash, incremental_analyze, load_cache, save_cache, universe_fingerprint, CacheMetadata,
    CachedFile, DeadcssCache,
};

#[cfg(test)]
mod tests;
