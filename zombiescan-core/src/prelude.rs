//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use zombiescan_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for zombie-file scanning
//! without polluting the namespace with rarely-used items.

// Core types
pub use crate::error::{ZombiescanError, ZombiescanResult};

// Configuration
pub use crate::config::{load_config, ScanConfig, ZombiescanConfig};

// Traversal
pub use crate::walk::{walk, FileRecord};

// Reference harvesting
pub use crate::references::{build_references, ReferenceSet};

// Detection
pub use crate::detect::{detect_zombies, Finding, ZombieFile};

// Backup and restore
pub use crate::backup::{BackupManager, BackupMetadata};
pub use crate::restore::RestoreManager;

// Removal
pub use crate::remove::{clean_empty_dirs, remove_file, remove_zombies, RemovalResult};

// Builder API
pub use crate::builder::{PurgeOutcome, ScanReport, Zombiescan};
