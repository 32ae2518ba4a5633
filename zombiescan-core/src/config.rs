//! Scan configuration: validated `ScanConfig` plus zombiescan.toml loading.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::{fs, path::Path};

use crate::error::{IoResultExt, ZombiescanError, ZombiescanResult};

/// Extensions treated as source code when harvesting references.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "vue", "svelte", "py", "rb", "go", "rs", "java", "php",
];

/// Directories never descended into.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "target",
    "dist",
    "build",
    "vendor",
    "coverage",
    "__pycache__",
    ".dead-code-backups",
];

const MAX_EXCLUDE_PATTERNS: usize = 100;
const MAX_PATTERN_LEN: usize = 200;
const MAX_EXTENSION_LEN: usize = 20;
const MAX_DEPTH_LIMIT: usize = 50;

/// Validated, immutable scan parameters.
///
/// Construction is the only place invariants are checked; once built, a
/// config cannot drift into an invalid state.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    file_types: BTreeSet<String>,
    exclude_patterns: Vec<String>,
    max_depth: usize,
}

impl ScanConfig {
    /// Builds a config, rejecting invalid inputs up front.
    ///
    /// File types are normalized (leading `.` stripped, lowercased) and must
    /// be 1..=20 alphanumeric chars. Exclude patterns are capped at 100
    /// entries of at most 200 chars each and may not contain `..`. Depth must
    /// be within 1..=50; out-of-range values are rejected, never clamped.
    pub fn new(
        types: Vec<String>,
        excludes: Vec<String>,
        max_depth: usize,
    ) -> ZombiescanResult<Self> {
        let mut file_types = BTreeSet::new();
        for raw in &types {
            let normalized = raw.trim().trim_start_matches('.').to_lowercase();
            if normalized.is_empty() || normalized.len() > MAX_EXTENSION_LEN {
                return Err(ZombiescanError::invalid_argument(format!(
                    "file type '{raw}' must be 1-{MAX_EXTENSION_LEN} characters"
                )));
            }
            if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ZombiescanError::invalid_argument(format!(
                    "file type '{raw}' must be alphanumeric"
                )));
            }
            file_types.insert(normalized);
        }
        if file_types.is_empty() {
            return Err(ZombiescanError::invalid_argument(
                "at least one file type is required",
            ));
        }

        if excludes.len() > MAX_EXCLUDE_PATTERNS {
            return Err(ZombiescanError::invalid_argument(format!(
                "too many exclude patterns ({}, max {MAX_EXCLUDE_PATTERNS})",
                excludes.len()
            )));
        }
        for pattern in &excludes {
            if pattern.is_empty() || pattern.len() > MAX_PATTERN_LEN {
                return Err(ZombiescanError::invalid_argument(format!(
                    "exclude pattern '{pattern}' must be 1-{MAX_PATTERN_LEN} characters"
                )));
            }
            if pattern.contains("..") {
                return Err(ZombiescanError::invalid_argument(format!(
                    "exclude pattern '{pattern}' may not contain '..'"
                )));
            }
        }

        if max_depth == 0 || max_depth > MAX_DEPTH_LIMIT {
            return Err(ZombiescanError::invalid_argument(format!(
                "max depth {max_depth} must be within 1-{MAX_DEPTH_LIMIT}"
            )));
        }

        Ok(Self {
            file_types,
            exclude_patterns: excludes,
            max_depth,
        })
    }

    /// Normalized file extensions, without leading dots.
    pub fn file_types(&self) -> &BTreeSet<String> {
        &self.file_types
    }

    /// Validated exclusion patterns.
    pub fn exclude_patterns(&self) -> &[String] {
        &self.exclude_patterns
    }

    /// Maximum directory depth below the scan root.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// True when the extension (already lowercased) is configured.
    pub fn matches_extension(&self, ext: &str) -> bool {
        self.file_types.contains(ext)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            file_types: SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            exclude_patterns: DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
            max_depth: 10,
        }
    }
}

/// Main configuration structure for zombiescan.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ZombiescanConfig {
    /// File extensions to scan for zombies.
    pub types: Option<Vec<String>>,
    /// Directory name patterns to exclude.
    pub exclude: Option<Vec<String>>,
    /// Maximum traversal depth.
    pub depth: Option<usize>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from zombiescan.toml if it exists.
pub fn load_config(root: &Path) -> ZombiescanResult<Option<ZombiescanConfig>> {
    let path = root.join("zombiescan.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).with_path(&path)?;
    let cfg = toml::from_str(&content)
        .map_err(|e| ZombiescanError::config(&path, format!("invalid zombiescan.toml: {e}")))?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_normalizes_types() {
        let cfg = ScanConfig::new(strings(&[".JS", "ts"]), strings(&[]), 5).unwrap();
        assert!(cfg.matches_extension("js"));
        assert!(cfg.matches_extension("ts"));
        assert!(!cfg.matches_extension("JS"));
    }

    #[test]
    fn test_rejects_bad_types() {
        assert!(ScanConfig::new(strings(&[""]), strings(&[]), 5).is_err());
        assert!(ScanConfig::new(strings(&["j s"]), strings(&[]), 5).is_err());
        assert!(ScanConfig::new(strings(&["a/b"]), strings(&[]), 5).is_err());
        let long = "x".repeat(21);
        assert!(ScanConfig::new(vec![long], strings(&[]), 5).is_err());
    }

    #[test]
    fn test_requires_at_least_one_type() {
        assert!(ScanConfig::new(vec![], vec![], 5).is_err());
    }

    #[test]
    fn test_rejects_bad_excludes() {
        let too_many: Vec<String> = (0..101).map(|i| format!("dir{i}")).collect();
        assert!(ScanConfig::new(strings(&["js"]), too_many, 5).is_err());
        assert!(ScanConfig::new(strings(&["js"]), strings(&["../etc"]), 5).is_err());
        assert!(ScanConfig::new(strings(&["js"]), strings(&[""]), 5).is_err());
    }

    #[test]
    fn test_rejects_depth_out_of_range() {
        assert!(ScanConfig::new(strings(&["js"]), vec![], 0).is_err());
        assert!(ScanConfig::new(strings(&["js"]), vec![], 51).is_err());
        assert!(ScanConfig::new(strings(&["js"]), vec![], 50).is_ok());
    }

    #[test]
    fn test_default_is_valid() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.max_depth(), 10);
        assert!(cfg.matches_extension("js"));
        assert!(cfg
            .exclude_patterns()
            .iter()
            .any(|p| p == "node_modules"));
    }
}
