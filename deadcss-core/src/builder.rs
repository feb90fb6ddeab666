//! Builder pattern API for deadcss analysis.
//!
//! Provides a fluent interface for configuring and running a selector audit:
//!
//! ```rust,ignore
//! use deadcss_core::prelude::*;
//!
//! let result = Deadcss::new("styles/site.css", "templates/")
//!     .with_cache(true)
//!     .ignore_patterns([".js-*"])
//!     .analyze()?;
//!
//! println!("Unused selectors: {}", result.unused_count());
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::analyze::{analyze_file_lenient, Usage, DEFAULT_EXTENSIONS};
use crate::config::DeadcssConfig;
use crate::error::DeadcssError;
use crate::logging::log_info;
use crate::scan::{gather_stylesheets, gather_target_files};
use crate::selectors::{parse_stylesheets, SelectorUniverse};
use crate::verdict::{reconcile, SelectorReport, Verdict, VerdictStats};

/// Builder for configuring a selector audit.
///
/// # Example
///
/// ```rust,ignore
/// let result = Deadcss::new("css/", "site/")
///     .stylesheet_dir(true)
///     .with_cache(false)
///     .analyze()?;
/// ```
#[derive(Debug, Clone)]
pub struct Deadcss {
    /// Stylesheet file, or directory of stylesheets when `stylesheet_dir` is set
    stylesheet: PathBuf,

    /// Directory searched for markup, templates and scripts
    search_dir: PathBuf,

    /// Treat `stylesheet` as a directory of `.css` files
    stylesheet_dir: bool,

    /// Whether to use incremental caching
    use_cache: bool,

    /// Target file extensions
    extensions: Vec<String>,

    /// Custom excluded directories
    excluded_dirs: Vec<String>,

    /// Selectors or `prefix*` patterns to leave out of the result
    ignored_patterns: Vec<String>,
}

impl Deadcss {
    /// Create a new builder for a stylesheet and a search directory.
    pub fn new(stylesheet: impl Into<PathBuf>, search_dir: impl Into<PathBuf>) -> Self {
        Self {
            stylesheet: stylesheet.into(),
            search_dir: search_dir.into(),
            stylesheet_dir: false,
            use_cache: cfg!(feature = "cache"),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            excluded_dirs: Vec::new(),
            ignored_patterns: Vec::new(),
        }
    }

    /// Treat the stylesheet path as a directory and load every `.css` file in it.
    pub fn stylesheet_dir(mut self, enabled: bool) -> Self {
        self.stylesheet_dir = enabled;
        self
    }

    /// Enable or disable incremental caching.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Replace the target file extensions.
    pub fn extensions(mut self, exts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    /// Add directories to exclude from the scan.
    pub fn exclude_dirs(mut self, dirs: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.excluded_dirs.extend(dirs.into_iter().map(Into::into));
        self
    }

    /// Add selector patterns to leave out of the result.
    pub fn ignore_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ignored_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Apply the scan settings of a `deadcss.toml`.
    ///
    /// Ignore and exclude lists are appended; `extensions` replaces the current set.
    pub fn with_config(mut self, config: &DeadcssConfig) -> Self {
        if let Some(ignore) = &config.ignore {
            self.ignored_patterns.extend(ignore.iter().cloned());
        }
        if let Some(exclude) = &config.exclude {
            self.excluded_dirs.extend(exclude.iter().cloned());
        }
        if let Some(exts) = &config.extensions {
            self.extensions = exts.clone();
        }
        self
    }

    /// Check the input paths before any work is done.
    pub fn validate(&self) -> Result<(), DeadcssError> {
        if !self.stylesheet.exists() {
            return Err(DeadcssError::invalid_argument(format!(
                "stylesheet path does not exist: {}",
                self.stylesheet.display()
            )));
        }
        if self.stylesheet_dir && !self.stylesheet.is_dir() {
            return Err(DeadcssError::invalid_argument(format!(
                "expected a directory of stylesheets: {}",
                self.stylesheet.display()
            )));
        }
        if !self.stylesheet_dir && !self.stylesheet.is_file() {
            return Err(DeadcssError::invalid_argument(format!(
                "expected a stylesheet file (use --css-dir for directories): {}",
                self.stylesheet.display()
            )));
        }
        if !self.search_dir.is_dir() {
            return Err(DeadcssError::invalid_argument(format!(
                "search directory does not exist or is not a directory: {}",
                self.search_dir.display()
            )));
        }
        Ok(())
    }

    /// Resolve the stylesheet paths to load, in merge order.
    pub fn stylesheets(&self) -> Result<Vec<PathBuf>> {
        if !self.stylesheet_dir {
            return Ok(vec![self.stylesheet.clone()]);
        }
        let sheets = gather_stylesheets(&self.stylesheet)?;
        if sheets.is_empty() {
            return Err(DeadcssError::invalid_argument(format!(
                "no .css files found in {}",
                self.stylesheet.display()
            ))
            .into());
        }
        Ok(sheets)
    }

    /// Run the analysis and return results.
    pub fn analyze(&self) -> Result<AnalysisResult> {
        // 1. Validate inputs
        self.validate()?;

        // 2. Build the selector universe
        let stylesheets = self.stylesheets()?;
        let universe = parse_stylesheets(&stylesheets)?;
        log_info(&format!(
            "{} selectors from {} stylesheet(s)",
            universe.len(),
            stylesheets.len()
        ));

        // 3. Gather target files
        let exts: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        let excludes: Vec<&str> = self.excluded_dirs.iter().map(String::as_str).collect();
        let files = gather_target_files(&self.search_dir, &exts, &excludes)
            .context("Failed to gather target files")?;

        // 4. Detect usages (incremental if cache enabled)
        let usages = self.collect_usages(&universe, &files);

        // 5. Reconcile into verdicts
        let reports: Vec<SelectorReport> = reconcile(&universe, usages)
            .into_iter()
            .filter(|r| !self.is_ignored(&r.selector))
            .collect();
        let stats = VerdictStats::from_reports(&reports);

        Ok(AnalysisResult {
            search_dir: self.search_dir.clone(),
            stylesheets,
            files_scanned: files.len(),
            universe,
            reports,
            stats,
        })
    }

    fn collect_usages(&self, universe: &SelectorUniverse, files: &[PathBuf]) -> Vec<Usage> {
        #[cfg(feature = "cache")]
        {
            if self.use_cache {
                let cached = crate::cache::load_cache(&self.search_dir, universe);
                return crate::cache::incremental_analyze(&self.search_dir, universe, files, cached);
            }
        }

        files
            .par_iter()
            .flat_map_iter(|file| analyze_file_lenient(universe, file))
            .collect()
    }

    /// Check if a selector matches any ignored pattern.
    fn is_ignored(&self, selector: &str) -> bool {
        is_ignored(selector, &self.ignored_patterns)
    }
}

/// Checks if a selector matches an ignore pattern.
///
/// `prefix*` matches by prefix; anything else matches exactly or as a substring.
pub fn is_ignored(selector: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|p| match p.strip_suffix('*') {
        Some(prefix) => selector.starts_with(prefix),
        None => selector == p || selector.contains(p.as_str()),
    })
}

/// Result of running a selector audit.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    /// Directory that was searched
    pub search_dir: PathBuf,

    /// Stylesheets loaded, in merge order
    pub stylesheets: Vec<PathBuf>,

    /// Number of target files analyzed
    pub files_scanned: usize,

    /// Every selector defined by the stylesheets
    pub universe: SelectorUniverse,

    /// One report per selector, ordered by selector text
    pub reports: Vec<SelectorReport>,

    pub stats: VerdictStats,
}

impl AnalysisResult {
    /// Check if any selector was found unused.
    pub fn has_unused(&self) -> bool {
        self.stats.unused > 0
    }

    pub fn unused_count(&self) -> usize {
        self.stats.unused
    }

    /// Reports with the given verdict.
    pub fn with_verdict(&self, verdict: Verdict) -> impl Iterator<Item = &SelectorReport> {
        self.reports.iter().filter(move |r| r.verdict == verdict)
    }

    /// Look up the report for one selector.
    pub fn report_for(&self, selector: &str) -> Option<&SelectorReport> {
        self.reports.iter().find(|r| r.selector == selector)
    }

    /// Root the search started from.
    pub fn search_dir(&self) -> &Path {
        &self.search_dir
    }
}
