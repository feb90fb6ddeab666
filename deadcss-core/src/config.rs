//! Configuration loading from deadcss.toml.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{DeadcssError, IoResultExt};

/// File name looked up in the search directory.
pub const CONFIG_FILE: &str = "deadcss.toml";

/// Main configuration structure for deadcss.toml.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DeadcssConfig {
    /// Selectors or patterns (`prefix*`) to leave out of the report.
    pub ignore: Option<Vec<String>>,
    /// Extra directory names to prune while scanning.
    pub exclude: Option<Vec<String>>,
    /// Target file extensions, replacing the defaults.
    pub extensions: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output configuration.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// One row per selector with a count.
    pub condensed: Option<bool>,
    /// Only report selectors without evidence of use.
    pub unused_only: Option<bool>,
    /// Output format: "csv" or "json".
    pub format: Option<String>,
}

/// Loads configuration from deadcss.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<DeadcssConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| DeadcssError::config(&path, format!("invalid {CONFIG_FILE}: {e}")))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("deadcss_config_test")
            .join(format!("{}_{}", name, std::process::id()));
        if dir.exists() {
            fs::remove_dir_all(&dir).ok();
        }
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_missing_config_is_none() {
        let dir = create_temp_dir("missing");
        assert_eq!(load_config(&dir).unwrap(), None);
    }

    #[test]
    fn test_full_config() {
        let dir = create_temp_dir("full");
        fs::write(
            dir.join(CONFIG_FILE),
            r#"
ignore = [".js-*", "sr-only"]
exclude = ["dist"]
extensions = ["html", "twig"]

[output]
condensed = true
format = "json"
"#,
        )
        .unwrap();

        let cfg = load_config(&dir).unwrap().unwrap();
        assert_eq!(cfg.ignore.unwrap(), vec![".js-*", "sr-only"]);
        assert_eq!(cfg.exclude.unwrap(), vec!["dist"]);
        assert_eq!(cfg.extensions.unwrap(), vec!["html", "twig"]);
        let output = cfg.output.unwrap();
        assert_eq!(output.condensed, Some(true));
        assert_eq!(output.unused_only, None);
        assert_eq!(output.format.as_deref(), Some("json"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = create_temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE), "ignore = 42").unwrap();
        let err = load_config(&dir).unwrap_err();
        let err = err.downcast_ref::<DeadcssError>().unwrap();
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(&dir.join(CONFIG_FILE)));

        fs::write(dir.join(CONFIG_FILE), "unknown_key = true").unwrap();
        assert!(load_config(&dir).is_err());

        fs::remove_dir_all(&dir).ok();
    }
}
