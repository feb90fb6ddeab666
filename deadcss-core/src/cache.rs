//! Incremental analysis cache using SHA-256 for change detection.
//!
//! Performance characteristics:
//! - Parallel file hashing and analysis via Rayon
//! - Read-once pattern: file content read once, then hashed and analyzed
//! - O(changed_files) analysis work, O(1) cache lookups
//!
//! # Cache Invalidation
//!
//! The whole cache is discarded when:
//! - the cache format or deadcss major version changes
//! - the selector universe changes (different stylesheets, edited rules),
//!   detected through a fingerprint of the sorted selector texts

use crate::analyze::{analyze_content, FileKind, Usage};
use crate::error::{DeadcssError, DeadcssResult, IoResultExt};
use crate::logging::{log_file_failure, log_info, log_scanning, log_warn};
use crate::selectors::SelectorUniverse;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Maximum cache file size (50MB).
const MAX_CACHE_SIZE_BYTES: usize = 50_000_000;

/// Current cache format version. Increment when cache format changes.
const CACHE_VERSION: u32 = 1;

/// Deadcss version for cache compatibility checking.
const DEADCSS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory (relative to the search root) holding the cache.
pub const CACHE_DIR: &str = ".deadcss";

/// Cached analysis of one file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CachedFile {
    pub hash: String,
    pub usages: Vec<Usage>,
}

/// Cache metadata for version checking.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CacheMetadata {
    /// Cache format version
    pub cache_version: u32,
    /// Deadcss version that created this cache
    pub deadcss_version: String,
    /// Timestamp when cache was created
    #[serde(default)]
    pub created_at: u64,
    /// Fingerprint of the selector universe the usages were computed against
    pub universe_fingerprint: String,
}

impl CacheMetadata {
    /// Create metadata for the current environment and universe.
    pub fn current(universe: &SelectorUniverse) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            cache_version: CACHE_VERSION,
            deadcss_version: DEADCSS_VERSION.to_string(),
            created_at,
            universe_fingerprint: universe_fingerprint(universe),
        }
    }

    /// Check if this cache can be reused against `universe`.
    pub fn is_compatible(&self, universe: &SelectorUniverse) -> bool {
        if self.cache_version != CACHE_VERSION {
            return false;
        }

        let current_major = DEADCSS_VERSION.split('.').next().unwrap_or("0");
        let cached_major = self.deadcss_version.split('.').next().unwrap_or("0");

        current_major == cached_major && self.universe_fingerprint == universe_fingerprint(universe)
    }
}

/// The full cache model, stored in `.deadcss/cache.json`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DeadcssCache {
    #[serde(default)]
    pub metadata: CacheMetadata,
    /// Maps file path to its cached analysis.
    pub files: HashMap<String, CachedFile>,
}

/// Compute SHA-256 hash from bytes (in-memory, no I/O).
#[inline]
fn hash_bytes(bytes: &[u8]) -> String {
    let mut sha = Sha256::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

/// Compute SHA-256 file hash.
pub fn file_hash(path: &Path) -> DeadcssResult<String> {
    let bytes = fs::read(path).with_path(path)?;
    Ok(hash_bytes(&bytes))
}

/// SHA-256 over the sorted selector texts.
pub fn universe_fingerprint(universe: &SelectorUniverse) -> String {
    let mut sha = Sha256::new();
    for selector in universe.selectors() {
        sha.update(selector.as_bytes());
        sha.update([0u8]);
    }
    format!("{:x}", sha.finalize())
}

/// Load the cache from `.deadcss/cache.json` under `root`.
///
/// Returns `None` if the file is missing, corrupted, or incompatible with the
/// current version or selector universe.
pub fn load_cache(root: &Path, universe: &SelectorUniverse) -> Option<DeadcssCache> {
    let path = root.join(CACHE_DIR).join("cache.json");
    if !path.exists() {
        return None;
    }

    let text = fs::read_to_string(&path).ok()?;
    let cache: DeadcssCache = serde_json::from_str(&text).ok()?;

    if !cache.metadata.is_compatible(universe) {
        log_info(&format!(
            "Cache invalidated (cache: v{} {}), rebuilding",
            cache.metadata.cache_version, cache.metadata.deadcss_version
        ));
        let _ = fs::remove_file(&path);
        return None;
    }

    Some(cache)
}

/// Save the cache to disk using a temp file + rename.
pub fn save_cache(root: &Path, cache: &DeadcssCache) -> DeadcssResult<()> {
    let dir = root.join(CACHE_DIR);
    if !dir.exists() {
        fs::create_dir_all(&dir).with_path(&dir)?;
    }

    let path = dir.join("cache.json");
    let json = serde_json::to_string_pretty(cache)
        .map_err(|e| DeadcssError::cache(format!("serialization failed: {e}")))?;

    if json.len() > MAX_CACHE_SIZE_BYTES {
        log_warn(&format!(
            "Cache exceeds {}MB limit, clearing old cache",
            MAX_CACHE_SIZE_BYTES / 1_000_000
        ));
        let _ = fs::remove_file(&path);
        return Ok(());
    }

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let temp_path = dir.join(format!("cache.json.{}.{}.tmp", std::process::id(), nanos));

    fs::write(&temp_path, &json).with_path(&temp_path)?;

    if let Err(e) = fs::rename(&temp_path, &path) {
        let _ = fs::remove_file(&temp_path);
        return Err(DeadcssError::io(&path, e));
    }

    Ok(())
}

/// Result of processing a single file.
enum FileProcessResult {
    Ok(String, CachedFile),
    Skipped,
}

/// Read once, hash in memory, reuse cached usages on a hash match, analyze otherwise.
fn process_file(
    universe: &SelectorUniverse,
    file: &Path,
    old_cache: Option<&DeadcssCache>,
) -> FileProcessResult {
    log_scanning(file);
    let key = file.display().to_string();

    let content = match fs::read_to_string(file) {
        Ok(c) => c,
        Err(e) => {
            log_file_failure(file, &DeadcssError::scan(file, format!("cannot read file: {e}")));
            return FileProcessResult::Skipped;
        }
    };

    let hash = hash_bytes(content.as_bytes());

    if let Some(cached) = old_cache.and_then(|c| c.files.get(&key)) {
        if cached.hash == hash {
            return FileProcessResult::Ok(key, cached.clone());
        }
    }

    let usages = analyze_content(universe, file, &content, FileKind::from_path(file));
    FileProcessResult::Ok(key, CachedFile { hash, usages })
}

/// Analyzes `files` in parallel, reusing cached results for unchanged files,
/// then saves the refreshed cache under `root`.
///
/// Unreadable files are logged and contribute no usages. A failed cache save
/// is logged and otherwise ignored.
pub fn incremental_analyze(
    root: &Path,
    universe: &SelectorUniverse,
    files: &[PathBuf],
    old_cache: Option<DeadcssCache>,
) -> Vec<Usage> {
    let results: Vec<FileProcessResult> = files
        .par_iter()
        .map(|file| process_file(universe, file, old_cache.as_ref()))
        .collect();

    let mut new_cache = DeadcssCache {
        metadata: CacheMetadata::current(universe),
        files: HashMap::with_capacity(results.len()),
    };
    let mut usages = Vec::new();

    for result in results {
        if let FileProcessResult::Ok(key, entry) = result {
            usages.extend(entry.usages.iter().cloned());
            new_cache.files.insert(key, entry);
        }
    }

    if let Err(e) = save_cache(root, &new_cache) {
        log_warn(&format!("cache save failed: {}", e));
    }

    usages
}
