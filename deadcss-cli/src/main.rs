//! deadcss CLI - finds CSS selectors that nothing in a project uses.
//!
//! Features:
//! - Single stylesheet or a whole directory of stylesheets
//! - Recursive scan of markup, template and script files
//! - Rayon-powered parallel analysis
//! - Incremental caching for faster re-analysis
//! - Detailed or condensed CSV report, optional JSON on stdout

use anyhow::{anyhow, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

use deadcss_core::{
    init_structured_logging, load_config, log_info, log_warn, print_json, print_summary,
    select_rows, write_csv_file, Deadcss, DeadcssConfig, ReportOptions,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Finds unused CSS selectors in markup, templates and scripts")]
pub struct Cli {
    /// Stylesheet to audit (a directory of stylesheets with --css-dir)
    css_path: String,

    /// Directory to scan for markup, template and script files
    search_dir: String,

    /// Where to write the CSV report
    #[arg(short, long, default_value = "output.csv")]
    output: String,

    /// Treat CSS_PATH as a directory and load every .css file in it
    #[arg(long)]
    css_dir: bool,

    /// One row per selector with a count of files using it
    #[arg(long)]
    condensed: bool,

    /// Only report selectors with no evidence of use
    #[arg(long)]
    unused_only: bool,

    /// Also print the results as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Disable the incremental analysis cache
    #[arg(long)]
    no_cache: bool,

    /// Selectors or prefix patterns (e.g. ".js-*") to leave out
    #[arg(long, num_args = 1..)]
    ignore: Vec<String>,

    /// Extra directory names to skip while scanning
    #[arg(long, num_args = 1..)]
    exclude: Vec<String>,

    /// Target file extensions, replacing the defaults
    #[arg(long, num_args = 1..)]
    ext: Vec<String>,
}

/// Settings after merging command-line flags with deadcss.toml.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    condensed: bool,
    unused_only: bool,
    json: bool,
}

/// Merges flags with the `[output]` table. A flag set on the command line
/// always wins; the config can only switch options on.
fn merge_settings(cli: &Cli, config: Option<&DeadcssConfig>) -> Settings {
    let output = config.and_then(|c| c.output.as_ref());
    Settings {
        condensed: cli.condensed || output.and_then(|o| o.condensed).unwrap_or(false),
        unused_only: cli.unused_only || output.and_then(|o| o.unused_only).unwrap_or(false),
        json: cli.json || output.and_then(|o| o.format.as_deref()) == Some("json"),
    }
}

/// Builds the analysis from the arguments and the optional config.
///
/// Config lists are applied first, so `--ext` replaces configured extensions.
fn configure(cli: &Cli, config: Option<&DeadcssConfig>) -> Deadcss {
    let mut builder = Deadcss::new(&cli.css_path, &cli.search_dir)
        .stylesheet_dir(cli.css_dir)
        .with_cache(!cli.no_cache);
    if let Some(cfg) = config {
        builder = builder.with_config(cfg);
    }
    builder = builder
        .ignore_patterns(cli.ignore.iter().cloned())
        .exclude_dirs(cli.exclude.iter().cloned());
    if !cli.ext.is_empty() {
        builder = builder.extensions(cli.ext.iter().cloned());
    }
    builder
}

/// Validates the report path.
///
/// Rejects empty paths and paths with null bytes.
fn validate_output_path(path: &str) -> Result<PathBuf> {
    if path.trim().is_empty() {
        return Err(anyhow!("Output path must not be empty"));
    }
    if path.contains('\0') {
        return Err(anyhow!("Output path contains null bytes"));
    }
    Ok(PathBuf::from(path))
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] deadcss internal error: {}", info);
        eprintln!("[PANIC] The process will exit with code 101.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();

    // 1. Load config from deadcss.toml if present (safe - don't fail on config errors)
    let config = match load_config(Path::new(&cli.search_dir)) {
        Ok(cfg) => cfg,
        Err(e) => {
            log_warn(&format!("config load failed, using defaults: {:#}", e));
            None
        }
    };
    let settings = merge_settings(&cli, config.as_ref());

    // 2. Validate inputs (fail fast, nothing scanned yet)
    let builder = configure(&cli, config.as_ref());
    builder.validate()?;
    let output = validate_output_path(&cli.output)?;

    // 3. Run it
    let result = builder.analyze()?;

    // 4. Write the report
    let options = ReportOptions {
        condensed: settings.condensed,
        unused_only: settings.unused_only,
    };
    let rows = select_rows(&result.reports, &options);
    write_csv_file(&output, &rows, options.condensed)?;
    log_info(&format!("report written to {}", output.display()));

    // 5. Console output
    if settings.json {
        print_json(&rows, &result.stats, result.files_scanned);
    } else {
        print_summary(&rows, &result.stats, result.files_scanned);
        println!("\nReport saved to: {}", output.display());
    }

    Ok(())
}
