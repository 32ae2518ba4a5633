//! Reference harvesting.
//!
//! Scans every source file under the root and collects the string literals of
//! import/require-like expressions into a [`ReferenceSet`]. This is a textual
//! heuristic: nothing is resolved against the tree, and over-collection is
//! acceptable because unmatched references only keep files alive.

use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::warn;

use crate::config::{ScanConfig, DEFAULT_EXCLUDED_DIRS, SOURCE_EXTENSIONS};
use crate::error::ZombiescanResult;
use crate::walk::walk;

/// Every literal that keeps a file alive.
#[derive(Debug, Default, Clone)]
pub struct ReferenceSet {
    refs: HashSet<String>,
}

impl ReferenceSet {
    pub fn insert(&mut self, reference: String) {
        self.refs.insert(reference);
    }

    /// Exact-match lookup.
    pub fn contains(&self, reference: &str) -> bool {
        self.refs.contains(reference)
    }

    /// True when any collected reference contains `needle` as a substring.
    pub fn any_contains(&self, needle: &str) -> bool {
        self.refs.iter().any(|r| r.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.refs.iter()
    }
}

/// Pre-compiled regex patterns for import extraction.
/// Uses OnceLock for thread-safe lazy initialization.
struct ImportPatterns {
    es_import: Regex,
    export_from: Regex,
    dynamic_import: Regex,
    require_call: Regex,
    py_from_import: Regex,
    py_import: Regex,
}

impl ImportPatterns {
    fn get() -> &'static Self {
        static PATTERNS: OnceLock<ImportPatterns> = OnceLock::new();
        PATTERNS.get_or_init(|| Self {
            es_import: Regex::new(r#"(?m)import\s+(?:[\w$*\s{},]+?\s+from\s+)?["']([^"']+)["']"#)
                .expect("Hardcoded regex pattern is valid"),
            export_from: Regex::new(r#"(?m)export\s+[\w$*\s{},]+?\s+from\s+["']([^"']+)["']"#)
                .expect("Hardcoded regex pattern is valid"),
            dynamic_import: Regex::new(r#"import\s*\(\s*["']([^"']+)["']\s*\)"#)
                .expect("Hardcoded regex pattern is valid"),
            require_call: Regex::new(r#"require\s*\(\s*["']([^"']+)["']\s*\)"#)
                .expect("Hardcoded regex pattern is valid"),
            py_from_import: Regex::new(r"(?m)^\s*from\s+([\w.]+)\s+import\b")
                .expect("Hardcoded regex pattern is valid"),
            py_import: Regex::new(r"(?m)^\s*import\s+([\w.]+)")
                .expect("Hardcoded regex pattern is valid"),
        })
    }

    fn all(&self) -> [&Regex; 6] {
        [
            &self.es_import,
            &self.export_from,
            &self.dynamic_import,
            &self.require_call,
            &self.py_from_import,
            &self.py_import,
        ]
    }
}

/// Extracts import/require string literals from one file's content, verbatim.
pub fn extract_import_literals(content: &str) -> Vec<String> {
    let mut literals = Vec::new();
    for pattern in ImportPatterns::get().all() {
        for caps in pattern.captures_iter(content) {
            if let Some(m) = caps.get(1) {
                literals.push(m.as_str().to_string());
            }
        }
    }
    literals
}

/// Builds the reference set for the tree under `root`.
///
/// Walks with a fixed source-extension allowlist and the built-in excludes,
/// independent of the caller's scan config. A file that declares at least one
/// import also contributes its own basename and stem, keeping entry points
/// with no inbound references out of the zombie list while import-free
/// orphans stay detectable.
pub fn build_references(root: &Path) -> ZombiescanResult<ReferenceSet> {
    let config = reference_config();
    let records = walk(root, &config)?;

    let mut refs = ReferenceSet::default();
    for record in &records {
        let content = match fs::read_to_string(&record.absolute_path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %record.absolute_path.display(), error = %e, "unreadable source, skipping");
                continue;
            }
        };

        let literals = extract_import_literals(&content);
        if literals.is_empty() {
            continue;
        }
        for literal in literals {
            refs.insert(literal);
        }
        if let Some(name) = record.absolute_path.file_name() {
            refs.insert(name.to_string_lossy().into_owned());
        }
        if let Some(stem) = record.absolute_path.file_stem() {
            refs.insert(stem.to_string_lossy().into_owned());
        }
    }
    Ok(refs)
}

fn reference_config() -> ScanConfig {
    ScanConfig::new(
        SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect(),
        50,
    )
    .expect("built-in reference config is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "zombiescan_refs_{}_{}",
            std::process::id(),
            id
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_file(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_extracts_es_imports() {
        let literals = extract_import_literals(
            "import foo from './foo';\nimport { a, b } from \"../lib/bar\";\nimport './side-effect';",
        );
        assert!(literals.contains(&"./foo".to_string()));
        assert!(literals.contains(&"../lib/bar".to_string()));
        assert!(literals.contains(&"./side-effect".to_string()));
    }

    #[test]
    fn test_extracts_export_from() {
        let literals = extract_import_literals("export { thing } from './things';");
        assert!(literals.contains(&"./things".to_string()));
    }

    #[test]
    fn test_extracts_dynamic_import_and_require() {
        let literals = extract_import_literals(
            "const m = await import('./lazy');\nconst fs = require(\"fs-extra\");",
        );
        assert!(literals.contains(&"./lazy".to_string()));
        assert!(literals.contains(&"fs-extra".to_string()));
    }

    #[test]
    fn test_extracts_python_imports() {
        let literals = extract_import_literals("import os.path\nfrom utils.helpers import run\n");
        assert!(literals.contains(&"os.path".to_string()));
        assert!(literals.contains(&"utils.helpers".to_string()));
    }

    #[test]
    fn test_ignores_plain_strings() {
        let literals = extract_import_literals("const s = 'not an import';\n");
        assert!(literals.is_empty());
    }

    #[test]
    fn test_build_collects_imports_and_importer_names() {
        let dir = create_temp_dir();
        write_file(&dir.join("index.js"), "import './utils';\n");
        write_file(&dir.join("utils.js"), "const x = 1;\n");

        let refs = build_references(&dir).unwrap();
        assert!(refs.contains("./utils"));
        assert!(refs.contains("index.js"));
        assert!(refs.contains("index"));
        // utils.js declares nothing, so its own name is not self-inserted
        assert!(!refs.contains("utils.js"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_build_skips_excluded_dirs() {
        let dir = create_temp_dir();
        write_file(&dir.join("node_modules/pkg/index.js"), "import './dep';\n");

        let refs = build_references(&dir).unwrap();
        assert!(refs.is_empty());
        fs::remove_dir_all(&dir).ok();
    }
}
