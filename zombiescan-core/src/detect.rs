//! Zombie classification.
//!
//! Pure set arithmetic over the walker's candidates and the harvested
//! reference set. The matching rule is deliberately loose in the keep
//! direction: a stem appearing anywhere inside any reference keeps the file,
//! so the detector under-reports rather than flagging live code.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::references::ReferenceSet;
use crate::walk::FileRecord;

/// A candidate file with no reference keeping it alive.
#[derive(Debug, Clone, Serialize)]
pub struct ZombieFile {
    pub relative_path: String,
    pub size_bytes: u64,
    /// RFC 3339 timestamp, or "unknown" when stat failed.
    pub modified: String,
}

/// One reportable detection, append-only and serializable.
#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub matched: Option<String>,
    pub message: String,
}

/// Splits candidates into zombies by checking every alias a reference could
/// use: the relative path, basename, and stem, each bare or `./`-prefixed,
/// plus the substring keep-fallback on the stem.
pub fn detect_zombies(records: &[FileRecord], refs: &ReferenceSet) -> Vec<ZombieFile> {
    records
        .iter()
        .filter(|record| !is_referenced(record, refs))
        .map(|record| ZombieFile {
            relative_path: record.relative_path.clone(),
            size_bytes: record.size_bytes,
            modified: record
                .modified
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_else(|| "unknown".to_string()),
        })
        .collect()
}

/// One finding per zombie, for report output.
pub fn zombie_findings(zombies: &[ZombieFile]) -> Vec<Finding> {
    zombies
        .iter()
        .map(|z| Finding {
            file: z.relative_path.clone(),
            line: None,
            kind: "zombie-file".to_string(),
            matched: None,
            message: format!("{} is never referenced", z.relative_path),
        })
        .collect()
}

fn is_referenced(record: &FileRecord, refs: &ReferenceSet) -> bool {
    let path = record.relative_path.as_str();
    let basename = path.rsplit('/').next().unwrap_or(path);
    let stem = basename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(basename);

    for alias in [path, basename, stem] {
        if refs.contains(alias) || refs.contains(&format!("./{alias}")) {
            return true;
        }
    }
    refs.any_contains(stem)
}
