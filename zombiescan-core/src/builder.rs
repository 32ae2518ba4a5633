//! Builder pattern API for zombie scanning.
//!
//! Provides a fluent interface for configuring and running a scan:
//!
//! ```rust,ignore
//! use zombiescan_core::prelude::*;
//!
//! let report = Zombiescan::new("/path/to/project")
//!     .with_config(ScanConfig::default())
//!     .scan()?;
//!
//! for zombie in &report.zombies {
//!     println!("Zombie: {}", zombie.relative_path);
//! }
//! ```

use serde::Serialize;
use std::path::PathBuf;

use crate::backup::{BackupManager, BackupMetadata};
use crate::config::ScanConfig;
use crate::detect::{detect_zombies, zombie_findings, Finding, ZombieFile};
use crate::error::{ZombiescanError, ZombiescanResult};
use crate::references::build_references;
use crate::remove::{remove_zombies, RemovalResult};
use crate::walk::walk;

/// Builder for configuring a zombie scan.
#[derive(Debug, Clone)]
pub struct Zombiescan {
    /// Root path of the tree to scan
    root: PathBuf,

    /// Scan parameters (extensions, excludes, depth)
    config: ScanConfig,

    /// Whether purge creates a backup before deleting
    backup: bool,

    /// Dry-run mode (don't modify files)
    dry_run: bool,
}

impl Zombiescan {
    /// Create a new scan builder for the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config: ScanConfig::default(),
            backup: true,
            dry_run: false,
        }
    }

    /// Replace the default scan configuration.
    pub fn with_config(mut self, config: ScanConfig) -> Self {
        self.config = config;
        self
    }

    /// Enable or disable the pre-deletion backup.
    pub fn backup(mut self, enabled: bool) -> Self {
        self.backup = enabled;
        self
    }

    /// Enable dry-run mode (no file modifications).
    pub fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Run the scan and return results.
    pub fn scan(&self) -> ZombiescanResult<ScanReport> {
        // 1. Gather candidate files
        let records = walk(&self.root, &self.config)?;

        // 2. Harvest references from all source files
        let references = build_references(&self.root)?;

        // 3. Classify
        let zombies = detect_zombies(&records, &references);
        let findings = zombie_findings(&zombies);

        Ok(ScanReport {
            root: self.root.clone(),
            total_candidates: records.len(),
            reference_count: references.len(),
            zombies,
            findings,
        })
    }

    /// Back up and then delete the report's zombies.
    ///
    /// With backup enabled, deletion proceeds only when the backup covered
    /// every zombie; a short backup aborts the purge with `PartialFailure`
    /// and nothing is deleted. Dry-run suppresses both the backup and the
    /// deletion.
    pub fn purge(&self, report: &ScanReport) -> ZombiescanResult<PurgeOutcome> {
        if report.zombies.is_empty() {
            return Ok(PurgeOutcome {
                backup: None,
                removal: RemovalResult::new(),
            });
        }

        let backup = if self.backup && !self.dry_run {
            let files: Vec<PathBuf> = report
                .zombies
                .iter()
                .map(|z| PathBuf::from(&z.relative_path))
                .collect();
            let metadata = BackupManager::new(&self.root).create_backup(&files)?;
            if metadata.total_count < report.zombies.len() {
                let missing: Vec<String> = report
                    .zombies
                    .iter()
                    .map(|z| z.relative_path.clone())
                    .filter(|p| !metadata.files.contains(p))
                    .map(|p| format!("{p}: not backed up"))
                    .collect();
                return Err(ZombiescanError::PartialFailure {
                    succeeded: metadata.total_count,
                    attempted: report.zombies.len(),
                    errors: missing,
                });
            }
            Some(metadata)
        } else {
            None
        };

        let removal = remove_zombies(&self.root, &report.zombies, self.dry_run)?;
        Ok(PurgeOutcome { backup, removal })
    }
}

/// Result of running a zombie scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// Root path that was scanned
    pub root: PathBuf,

    /// Number of candidate files examined
    pub total_candidates: usize,

    /// Number of distinct references harvested
    pub reference_count: usize,

    /// Files with no reference keeping them alive
    pub zombies: Vec<ZombieFile>,

    /// One finding per zombie
    pub findings: Vec<Finding>,
}

impl ScanReport {
    /// Check if any zombies were found.
    pub fn has_zombies(&self) -> bool {
        !self.zombies.is_empty()
    }

    /// Total bytes held by zombie files.
    pub fn zombie_bytes(&self) -> u64 {
        self.zombies.iter().map(|z| z.size_bytes).sum()
    }
}

/// What a purge did: the backup written (if any) and the removal outcome.
#[derive(Debug)]
pub struct PurgeOutcome {
    pub backup: Option<BackupMetadata>,
    pub removal: RemovalResult,
}
