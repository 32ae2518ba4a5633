//! Backup restoration.
//!
//! Replays a backup manifest onto the scan root. The id is gated against the
//! 32-hex shape before any filesystem access, restores overwrite whatever is
//! at the target path, and the backup itself is never mutated, so a restore
//! can be repeated safely.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

use crate::backup::{BackupMetadata, BACKUP_DIR_NAME};
use crate::error::{ZombiescanError, ZombiescanResult};
use crate::safety::validate_path;

/// Pre-compiled regex for the on-disk backup id shape.
fn backup_id_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"^[0-9a-f]{32}$").expect("Hardcoded regex pattern is valid"))
}

/// Restores backed-up files into one scan root.
#[derive(Debug, Clone)]
pub struct RestoreManager {
    root: PathBuf,
}

impl RestoreManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copies every file listed in the backup's manifest back to its
    /// original relative location, overwriting existing files.
    ///
    /// Returns the number of files restored. Per-file failures are logged
    /// and skipped.
    pub fn restore(&self, id: &str) -> ZombiescanResult<usize> {
        if !backup_id_regex().is_match(id) {
            return Err(ZombiescanError::InvalidBackupId { id: id.to_string() });
        }

        let backup_dir = self.root.join(BACKUP_DIR_NAME).join(id);
        if !backup_dir.is_dir() {
            return Err(ZombiescanError::BackupNotFound { id: id.to_string() });
        }

        let manifest_path = backup_dir.join("metadata.json");
        let content = fs::read_to_string(&manifest_path)
            .map_err(|_| ZombiescanError::BackupNotFound { id: id.to_string() })?;
        let metadata: BackupMetadata = serde_json::from_str(&content)
            .map_err(|e| ZombiescanError::config(&manifest_path, format!("corrupt manifest: {e}")))?;

        let canonical_root = fs::canonicalize(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ZombiescanError::NotFound {
                path: self.root.clone(),
            },
            _ => ZombiescanError::io(&self.root, e),
        })?;

        let mut restored = 0usize;
        for relative in &metadata.files {
            if let Err(e) = validate_path(Path::new(relative), &canonical_root) {
                warn!(path = %relative, error = %e, "unsafe manifest entry, skipping");
                continue;
            }

            let source = backup_dir.join(relative);
            let target = canonical_root.join(relative);
            if let Some(parent) = target.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!(path = %target.display(), error = %e, "cannot recreate parent, skipping");
                    continue;
                }
            }
            match fs::copy(&source, &target) {
                Ok(_) => {
                    info!(path = %relative, "restored");
                    restored += 1;
                }
                Err(e) => {
                    warn!(path = %relative, error = %e, "restore copy failed, skipping");
                }
            }
        }

        info!(id = %id, restored, total = metadata.total_count, "restore finished");
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::BackupManager;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn create_temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "zombiescan_restore_{}_{}",
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
    fn test_malformed_id_rejected_before_fs() {
        // Root does not exist, so any filesystem access would fail loudly.
        let manager = RestoreManager::new("/nonexistent/zombiescan/root");
        for bad in ["", "short", "UPPERCASE00000000000000000000000", "g".repeat(32).as_str()] {
            let err = manager.restore(bad).unwrap_err();
            assert!(
                matches!(err, ZombiescanError::InvalidBackupId { .. }),
                "id {bad:?} should be rejected by shape"
            );
        }
    }

    #[test]
    fn test_wellformed_missing_id_is_not_found() {
        let dir = create_temp_dir();
        let manager = RestoreManager::new(&dir);
        let err = manager.restore(&"a".repeat(32)).unwrap_err();
        assert!(matches!(err, ZombiescanError::BackupNotFound { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_round_trip_restores_bytes() {
        let dir = create_temp_dir();
        write_file(&dir.join("src/gone.js"), "original bytes");

        let metadata = BackupManager::new(&dir)
            .create_backup(&[PathBuf::from("src/gone.js")])
            .unwrap();
        fs::remove_file(dir.join("src/gone.js")).unwrap();

        let restored = RestoreManager::new(&dir).restore(&metadata.id).unwrap();
        assert_eq!(restored, 1);
        assert_eq!(
            fs::read_to_string(dir.join("src/gone.js")).unwrap(),
            "original bytes"
        );
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_restore_overwrites_and_is_idempotent() {
        let dir = create_temp_dir();
        write_file(&dir.join("app.js"), "v1");

        let metadata = BackupManager::new(&dir)
            .create_backup(&[PathBuf::from("app.js")])
            .unwrap();
        write_file(&dir.join("app.js"), "v2 overwritten");

        let manager = RestoreManager::new(&dir);
        assert_eq!(manager.restore(&metadata.id).unwrap(), 1);
        assert_eq!(fs::read_to_string(dir.join("app.js")).unwrap(), "v1");

        // Running again replays the same manifest with the same result.
        assert_eq!(manager.restore(&metadata.id).unwrap(), 1);
        assert_eq!(fs::read_to_string(dir.join("app.js")).unwrap(), "v1");
        fs::remove_dir_all(&dir).ok();
    }
}
