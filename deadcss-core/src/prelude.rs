//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use deadcss_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for selector analysis
//! without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::error::{DeadcssError, DeadcssResult};
pub use crate::selectors::{parse_stylesheet, parse_stylesheets, SelectorUniverse};
pub use crate::shape::SelectorShape;

// Per-file analysis and verdicts
pub use crate::analyze::{analyze_content, analyze_file, FileKind, Usage};
pub use crate::verdict::{reconcile, SelectorReport, Verdict, VerdictStats};

// File scanning
pub use crate::scan::{gather_stylesheets, gather_target_files};

// Configuration
pub use crate::config::{load_config, DeadcssConfig};

// Reporting
pub use crate::report::{write_csv, write_csv_file, ReportOptions};

// Builder API
pub use crate::builder::{AnalysisResult, Deadcss};

// Caching
#[cfg(feature = "cache")]
pub use crate::cache::{incremental_analyze, load_cache, save_cache, DeadcssCache};
