//! Bounded filesystem traversal.
//!
//! Depth-first, synchronous, single-threaded. Every entry passes through the
//! path safety validator before it is read, a canonical visited set stops
//! symlink cycles, and per-entry failures are logged and skipped so one
//! unreadable directory never aborts a scan.

use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::config::ScanConfig;
use crate::error::{ZombiescanError, ZombiescanResult};
use crate::safety::validate_path;

/// Files larger than this are skipped as scan candidates.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// One file discovered by the walker. Never mutated after the walk.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Canonical-root-based absolute path.
    pub absolute_path: PathBuf,
    /// Forward-slash path relative to the scan root.
    pub relative_path: String,
    pub size_bytes: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Walks `root` depth-first and returns matching file records.
///
/// The root itself is depth 0; a directory at exactly `max_depth` is the
/// deepest one whose entries are read.
pub fn walk(root: &Path, config: &ScanConfig) -> ZombiescanResult<Vec<FileRecord>> {
    let canonical_root = fs::canonicalize(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ZombiescanError::NotFound {
            path: root.to_path_buf(),
        },
        std::io::ErrorKind::PermissionDenied => ZombiescanError::PermissionDenied {
            path: root.to_path_buf(),
        },
        _ => ZombiescanError::io(root, e),
    })?;
    if !canonical_root.is_dir() {
        return Err(ZombiescanError::NotADirectory {
            path: canonical_root,
        });
    }

    let mut visited = HashSet::new();
    visited.insert(canonical_root.clone());
    let mut records = Vec::new();
    walk_dir(
        &canonical_root,
        0,
        &canonical_root,
        config,
        &mut visited,
        &mut records,
    );
    Ok(records)
}

fn walk_dir(
    dir: &Path,
    depth: usize,
    root: &Path,
    config: &ScanConfig,
    visited: &mut HashSet<PathBuf>,
    records: &mut Vec<FileRecord>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            classify_read_failure(dir, &e);
            return;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                classify_read_failure(dir, &e);
                continue;
            }
        };
        let path = entry.path();

        if let Err(e) = validate_path(&path, root) {
            warn!(path = %path.display(), error = %e, "skipping unsafe entry");
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        let relative = relative_forward_slash(&path, root);
        if is_excluded(&name, &relative, config) {
            debug!(path = %path.display(), "skipping excluded entry");
            continue;
        }

        if path.is_dir() {
            if depth + 1 > config.max_depth() {
                debug!(path = %path.display(), "depth limit reached");
                continue;
            }
            let canonical = match fs::canonicalize(&path) {
                Ok(c) => c,
                Err(e) => {
                    classify_read_failure(&path, &e);
                    continue;
                }
            };
            if visited.insert(canonical) {
                walk_dir(&path, depth + 1, root, config, visited, records);
            } else {
                debug!(path = %path.display(), "already visited, cycle broken");
            }
            continue;
        }

        if !path.is_file() {
            continue;
        }

        let ext = match path.extension() {
            Some(ext) => ext.to_string_lossy().to_lowercase(),
            None => continue,
        };
        if !config.matches_extension(&ext) {
            continue;
        }

        let (size_bytes, modified) = match fs::metadata(&path) {
            Ok(md) => {
                if md.len() > MAX_FILE_SIZE_BYTES {
                    warn!(path = %path.display(), size = md.len(), "file exceeds size limit, skipping");
                    continue;
                }
                (md.len(), md.modified().ok().map(DateTime::<Utc>::from))
            }
            Err(e) => {
                classify_read_failure(&path, &e);
                (0, None)
            }
        };

        records.push(FileRecord {
            relative_path: relative,
            absolute_path: path,
            size_bytes,
            modified,
        });
    }
}

/// Pattern matches when the entry name equals it, the root-relative path
/// contains it, or (for `*`-prefixed patterns) the name ends with or
/// contains the suffix.
pub fn is_excluded(name: &str, relative: &str, config: &ScanConfig) -> bool {
    config.exclude_patterns().iter().any(|pattern| {
        if let Some(suffix) = pattern.strip_prefix('*') {
            name.ends_with(suffix) || name.contains(suffix)
        } else {
            name == pattern || relative.contains(pattern.as_str())
        }
    })
}

fn classify_read_failure(path: &Path, e: &std::io::Error) {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            warn!(path = %path.display(), "permission denied, skipping");
        }
        std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "entry vanished, skipping");
        }
        _ => {
            error!(path = %path.display(), error = %e, "read failure, skipping");
        }
    }
}

/// Root-relative path with forward slashes, regardless of platform.
pub fn relative_forward_slash(path: &Path, root: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "zombiescan_walk_{}_{}",
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

    fn js_config(depth: usize) -> ScanConfig {
        ScanConfig::new(
            vec!["js".to_string()],
            vec!["node_modules".to_string()],
            depth,
        )
        .unwrap()
    }

    #[test]
    fn test_finds_matching_files() {
        let dir = create_temp_dir();
        write_file(&dir.join("a.js"), "x");
        write_file(&dir.join("b.txt"), "x");
        write_file(&dir.join("sub/c.js"), "x");

        let records = walk(&dir, &js_config(10)).unwrap();
        let mut paths: Vec<_> = records.iter().map(|r| r.relative_path.clone()).collect();
        paths.sort();
        assert_eq!(paths, vec!["a.js", "sub/c.js"]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_depth_bound() {
        let dir = create_temp_dir();
        write_file(&dir.join("root.js"), "x");
        write_file(&dir.join("level1/one.js"), "x");
        write_file(&dir.join("level1/level2/two.js"), "x");
        write_file(&dir.join("level1/level2/level3/three.js"), "x");

        let records = walk(&dir, &js_config(2)).unwrap();
        let paths: Vec<_> = records.iter().map(|r| r.relative_path.clone()).collect();
        assert!(paths.contains(&"root.js".to_string()));
        assert!(paths.contains(&"level1/one.js".to_string()));
        assert!(paths.contains(&"level1/level2/two.js".to_string()));
        assert!(!paths.iter().any(|p| p.contains("level3")));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_excluded_dirs_never_entered() {
        let dir = create_temp_dir();
        write_file(&dir.join("keep.js"), "x");
        write_file(&dir.join("node_modules/lib/index.js"), "x");

        let records = walk(&dir, &js_config(10)).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records
            .iter()
            .any(|r| r.relative_path.contains("node_modules")));
        fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() {
        let dir = create_temp_dir();
        write_file(&dir.join("sub/a.js"), "x");
        std::os::unix::fs::symlink(&dir, dir.join("sub/loop")).unwrap();

        let records = walk(&dir, &js_config(10)).unwrap();
        assert!(records.iter().any(|r| r.relative_path == "sub/a.js"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = create_temp_dir();
        let missing = dir.join("nope");
        assert!(matches!(
            walk(&missing, &js_config(10)),
            Err(ZombiescanError::NotFound { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let dir = create_temp_dir();
        let file = dir.join("plain.js");
        write_file(&file, "x");
        assert!(matches!(
            walk(&file, &js_config(10)),
            Err(ZombiescanError::NotADirectory { .. })
        ));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_record_metadata_populated() {
        let dir = create_temp_dir();
        write_file(&dir.join("sized.js"), "12345");

        let records = walk(&dir, &js_config(10)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].size_bytes, 5);
        assert!(records[0].modified.is_some());
        assert!(records[0].absolute_path.is_absolute());
        fs::remove_dir_all(&dir).ok();
    }
}
