//! Safe deletion workflow.
//!
//! Removal refuses symlinks and non-regular files, honors dry-run, and
//! collects per-file errors instead of aborting, so one locked file never
//! strands a half-finished cleanup without a report.

use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::backup::BACKUP_DIR_NAME;
use crate::detect::ZombieFile;
use crate::error::{ZombiescanError, ZombiescanResult};
use crate::safety::validate_path;

/// Maximum recursion depth to prevent stack overflow on deeply nested directories.
const MAX_RECURSION_DEPTH: usize = 128;

/// Outcome of one removal run.
#[derive(Debug, Default)]
pub struct RemovalResult {
    /// Root-relative paths actually removed (or that would be, in dry-run).
    pub files_removed: Vec<String>,
    /// Directories pruned after they became empty.
    pub dirs_removed: Vec<String>,
    /// Per-file failures, collected rather than fatal.
    pub errors: Vec<String>,
}

impl RemovalResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Safely remove a single file.
///
/// Refuses symlinks and anything that is not a regular file. An
/// already-absent file is a no-op. In dry-run mode nothing is touched.
/// Returns whether the file was (or would be) removed.
pub fn remove_file(path: &Path, dry_run: bool) -> ZombiescanResult<bool> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(ZombiescanError::io(path, e)),
    };

    if metadata.file_type().is_symlink() {
        warn!(path = %path.display(), "refusing to delete symlink");
        return Ok(false);
    }

    if !metadata.is_file() {
        warn!(path = %path.display(), "not a regular file, refusing");
        return Ok(false);
    }

    if dry_run {
        info!(path = %path.display(), "dry-run, would remove");
        return Ok(true);
    }

    fs::remove_file(path).map_err(|e| ZombiescanError::io(path, e))?;
    info!(path = %path.display(), "removed");
    Ok(true)
}

/// Recursively clean up directories left empty by removal.
///
/// Never removes `root` itself and never touches the backup directory.
/// Limited to MAX_RECURSION_DEPTH levels to prevent stack overflow.
pub fn clean_empty_dirs(root: &Path, dry_run: bool) -> ZombiescanResult<Vec<String>> {
    let mut removed = Vec::new();
    if let Ok(entries) = fs::read_dir(root) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && entry.file_name() != BACKUP_DIR_NAME {
                clean_empty_dirs_recursive(&path, dry_run, &mut removed, 0);
            }
        }
    }
    Ok(removed)
}

fn clean_empty_dirs_recursive(dir: &Path, dry_run: bool, removed: &mut Vec<String>, depth: usize) {
    if !dir.is_dir() {
        return;
    }

    if depth >= MAX_RECURSION_DEPTH {
        warn!(path = %dir.display(), limit = MAX_RECURSION_DEPTH, "max recursion depth reached");
        return;
    }

    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() && entry.file_name() != BACKUP_DIR_NAME {
                clean_empty_dirs_recursive(&path, dry_run, removed, depth + 1);
            }
        }
    }

    let is_empty = fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);

    if is_empty {
        if dry_run {
            info!(path = %dir.display(), "dry-run, would remove empty dir");
        } else if let Err(e) = fs::remove_dir(dir) {
            warn!(path = %dir.display(), error = %e, "failed to remove empty dir");
            return;
        } else {
            info!(path = %dir.display(), "removed empty dir");
        }
        removed.push(dir.display().to_string());
    }
}

/// Removes every zombie under `root`, then prunes emptied directories.
///
/// Per-file failures land in `RemovalResult::errors`; the run always
/// completes and reports what actually happened.
pub fn remove_zombies(
    root: &Path,
    zombies: &[ZombieFile],
    dry_run: bool,
) -> ZombiescanResult<RemovalResult> {
    let canonical_root = fs::canonicalize(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ZombiescanError::NotFound {
            path: root.to_path_buf(),
        },
        _ => ZombiescanError::io(root, e),
    })?;

    let mut result = RemovalResult::new();
    for zombie in zombies {
        let relative = Path::new(&zombie.relative_path);
        if let Err(e) = validate_path(relative, &canonical_root) {
            result
                .errors
                .push(format!("{}: {e}", zombie.relative_path));
            continue;
        }

        match remove_file(&canonical_root.join(relative), dry_run) {
            Ok(true) => result.files_removed.push(zombie.relative_path.clone()),
            Ok(false) => {}
            Err(e) => result.errors.push(format!("{}: {e}", zombie.relative_path)),
        }
    }

    result.dirs_removed = clean_empty_dirs(&canonical_root, dry_run)?;
    Ok(result)
}
