//! zombiescan-core: zombie-file detection with a safe backup/restore engine
//!
//! This library scans a source tree for files that nothing references
//! anymore ("zombie" files) and offers a reversible deletion workflow:
//! every destructive step is preceded by path safety validation and an
//! on-disk backup that can be replayed at any time.
//!
//! # Features
//!
//! - **Bounded traversal**: depth-limited, symlink-cycle-safe file discovery
//! - **Reference harvesting**: regex extraction of import/require literals
//! - **Zombie detection**: set-difference classification with a loose keep bias
//! - **Backup/restore**: `.dead-code-backups/` snapshots with JSON manifests
//! - **Safe removal**: symlink-refusing deletion plus empty-dir cleanup
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use zombiescan_core::prelude::*;
//!
//! let scanner = Zombiescan::new("/path/to/project");
//! let report = scanner.scan()?;
//!
//! for zombie in &report.zombies {
//!     println!("Zombie: {}", zombie.relative_path);
//! }
//!
//! // Back up and delete in one guarded step.
//! let outcome = scanner.purge(&report)?;
//! ```
//!
//! # Module Organization
//!
//! - [`safety`]: Path validation chokepoint (traversal, NUL, cross-device)
//! - [`walk`]: Bounded depth-first file discovery
//! - [`references`]: Import/require literal harvesting
//! - [`detect`]: Zombie classification
//! - [`backup`]: Backup snapshots and manifests
//! - [`restore`]: Backup replay
//! - [`remove`]: Safe deletion and empty-dir pruning
//! - [`builder`]: Fluent scan/purge API
//! - [`error`]: Typed error handling

pub mod backup;
pub mod builder;
pub mod config;
pub mod detect;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod references;
pub mod remove;
pub mod report;
pub mod restore;
pub mod safety;
pub mod walk;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{IoResultExt, ZombiescanError, ZombiescanResult};

// Builder API
pub use builder::{PurgeOutcome, ScanReport, Zombiescan};

// Configuration
pub use config::{
    load_config, OutputConfig, ScanConfig, ZombiescanConfig, DEFAULT_EXCLUDED_DIRS,
    SOURCE_EXTENSIONS,
};

// Path safety
pub use safety::validate_path;

// Traversal
pub use walk::{walk, FileRecord, MAX_FILE_SIZE_BYTES};

// Reference harvesting
pub use references::{build_references, extract_import_literals, ReferenceSet};

// Detection
pub use detect::{detect_zombies, zombie_findings, Finding, ZombieFile};

// Backup and restore
pub use backup::{BackupManager, BackupMetadata, BACKUP_DIR_NAME};
pub use restore::RestoreManager;

// Removal
pub use remove::{clean_empty_dirs, remove_file, remove_zombies, RemovalResult};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{print_json, print_plain};
