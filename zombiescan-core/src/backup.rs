//! Backup engine.
//!
//! Snapshots files into `.dead-code-backups/<id>/` under the scan root,
//! mirroring their relative paths, and records a `metadata.json` manifest.
//! The manifest is written last, so a directory without one is an aborted
//! backup and is ignored by listing.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{IoResultExt, ZombiescanError, ZombiescanResult};
use crate::safety::validate_path;
use crate::walk::relative_forward_slash;

/// Directory under the scan root that holds all backups.
pub const BACKUP_DIR_NAME: &str = ".dead-code-backups";

/// Manifest of one backup. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupMetadata {
    pub id: String,
    /// ISO-8601 with millisecond precision and a `Z` suffix.
    pub timestamp: String,
    /// Root-relative forward-slash paths actually copied.
    pub files: Vec<String>,
    #[serde(rename = "totalCount")]
    pub total_count: usize,
}

/// Creates and lists backups under one scan root.
#[derive(Debug, Clone)]
pub struct BackupManager {
    root: PathBuf,
}

impl BackupManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copies `files` (absolute, or relative to the scan root) into a fresh
    /// backup directory and returns its manifest.
    ///
    /// A path that fails safety validation aborts the whole backup; a copy
    /// that fails for environmental reasons is logged and omitted, so
    /// `total_count` reflects what actually landed on disk. Empty input
    /// produces a valid empty backup.
    pub fn create_backup(&self, files: &[PathBuf]) -> ZombiescanResult<BackupMetadata> {
        let canonical_root = fs::canonicalize(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ZombiescanError::NotFound {
                path: self.root.clone(),
            },
            _ => ZombiescanError::io(&self.root, e),
        })?;

        let id = Uuid::new_v4().simple().to_string();
        let backup_dir = canonical_root.join(BACKUP_DIR_NAME).join(&id);
        fs::create_dir_all(&backup_dir).with_path(&backup_dir)?;

        let mut copied = Vec::new();
        for file in files {
            validate_path(file, &canonical_root)?;

            let source = if file.is_absolute() {
                file.clone()
            } else {
                canonical_root.join(file)
            };
            let source = match fs::canonicalize(&source) {
                Ok(s) => s,
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "backup source unreadable, omitting");
                    continue;
                }
            };
            let relative = relative_forward_slash(&source, &canonical_root);

            let target = backup_dir.join(&relative);
            if let Some(parent) = target.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!(path = %target.display(), error = %e, "cannot mirror parent, omitting");
                    continue;
                }
            }
            match fs::copy(&source, &target) {
                Ok(_) => copied.push(relative),
                Err(e) => {
                    warn!(path = %source.display(), error = %e, "copy failed, omitting");
                }
            }
        }

        let metadata = BackupMetadata {
            id: id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            total_count: copied.len(),
            files: copied,
        };

        let manifest_path = backup_dir.join("metadata.json");
        let json = serde_json::to_string_pretty(&metadata)
            .map_err(|e| ZombiescanError::invalid_argument(format!("metadata encoding: {e}")))?;
        fs::write(&manifest_path, json).with_path(&manifest_path)?;

        info!(id = %metadata.id, count = metadata.total_count, "backup created");
        Ok(metadata)
    }

    /// Lists backup manifests, newest first.
    ///
    /// Directories without a readable manifest are skipped silently.
    pub fn list_backups(&self) -> ZombiescanResult<Vec<BackupMetadata>> {
        let backup_root = self.root.join(BACKUP_DIR_NAME);
        if !backup_root.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backup_root).with_path(&backup_root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(_) => continue,
            };
            let manifest_path = entry.path().join("metadata.json");
            let Ok(content) = fs::read_to_string(&manifest_path) else {
                continue;
            };
            match serde_json::from_str::<BackupMetadata>(&content) {
                Ok(metadata) => backups.push(metadata),
                Err(e) => {
                    warn!(path = %manifest_path.display(), error = %e, "unreadable manifest, skipping");
                }
            }
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Absolute path of one backup's directory.
    pub fn backup_dir(&self, id: &str) -> PathBuf {
        self.root.join(BACKUP_DIR_NAME).join(id)
    }
}
