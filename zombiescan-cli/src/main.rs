//! zombiescan CLI - zombie-file scanner with safe auto-removal.
//!
//! Features:
//! - Depth-bounded, symlink-safe tree traversal
//! - Regex-based reference harvesting across common source languages
//! - Automatic backup before any deletion, with listable history
//! - Full restore of any backup by id
//! - Dry-run mode that never touches the tree

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use zombiescan_core::{
    init_structured_logging, load_config, print_json, print_plain, BackupManager, RestoreManager,
    ScanConfig, Zombiescan, DEFAULT_EXCLUDED_DIRS, SOURCE_EXTENSIONS,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Zombie-file scanner with safe auto-removal")]
pub struct Cli {
    /// Path to the root of the tree to scan
    #[arg(default_value = ".")]
    path: String,

    /// Comma-separated file extensions to scan (default: common source types)
    #[arg(long)]
    types: Option<String>,

    /// Comma-separated directory patterns to exclude
    #[arg(long)]
    exclude: Option<String>,

    /// Maximum directory depth below the scan root
    #[arg(long)]
    depth: Option<usize>,

    /// Print one line per finding in addition to the summary
    #[arg(long)]
    report: bool,

    /// Show what would happen without touching any file
    #[arg(long)]
    dry_run: bool,

    /// Delete detected zombie files (backed up first unless --no-backup)
    #[arg(long)]
    auto_remove: bool,

    /// Back up zombies before deletion (the default)
    #[arg(long, conflicts_with = "no_backup")]
    backup: bool,

    /// Skip the pre-deletion backup
    #[arg(long)]
    no_backup: bool,

    /// List existing backups, newest first
    #[arg(long)]
    list_backups: bool,

    /// Restore a backup by its 32-hex id
    #[arg(long, value_name = "ID")]
    restore: Option<String>,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,
}

/// Splits a comma-separated flag value into trimmed, non-empty entries.
fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn main() -> Result<()> {
    // Global panic guard
    std::panic::set_hook(Box::new(|info| {
        eprintln!("[PANIC] zombiescan internal error: {}", info);
        eprintln!("[PANIC] The process will exit safely with code 2.");
    }));

    // Initialize structured logging (JSON to stderr, respects RUST_LOG)
    init_structured_logging();

    let cli = Cli::parse();
    let root = Path::new(&cli.path);

    // Backup listing mode
    if cli.list_backups {
        let backups = BackupManager::new(root)
            .list_backups()
            .with_context(|| format!("Failed to list backups under: {}", cli.path))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&backups)?);
        } else if backups.is_empty() {
            println!("No backups found.");
        } else {
            println!("BACKUPS ({}):", backups.len());
            for backup in &backups {
                println!(
                    "- {}  {}  {} file(s)",
                    backup.id, backup.timestamp, backup.total_count
                );
            }
        }
        return Ok(());
    }

    // Restore mode
    if let Some(ref id) = cli.restore {
        let restored = RestoreManager::new(root)
            .restore(id)
            .with_context(|| format!("Failed to restore backup: {}", id))?;

        if cli.json {
            println!(
                "{}",
                serde_json::json!({ "restored": restored, "id": id })
            );
        } else {
            println!("Restored {} file(s) from backup {}.", restored, id);
        }
        return Ok(());
    }

    // Load config from zombiescan.toml if present (safe - don't fail on config errors)
    let file_config = match load_config(root) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("[WARN] config load failed: {}", e);
            None
        }
    };
    let file_config = file_config.unwrap_or_default();

    // CLI flags win over file config, which wins over built-in defaults.
    let types = cli
        .types
        .as_deref()
        .map(parse_csv)
        .or(file_config.types)
        .unwrap_or_else(|| SOURCE_EXTENSIONS.iter().map(|s| s.to_string()).collect());
    let excludes = cli
        .exclude
        .as_deref()
        .map(parse_csv)
        .or(file_config.exclude)
        .unwrap_or_else(|| DEFAULT_EXCLUDED_DIRS.iter().map(|s| s.to_string()).collect());
    let depth = cli.depth.or(file_config.depth).unwrap_or(10);

    let config = ScanConfig::new(types, excludes, depth).context("Invalid scan configuration")?;

    let json_output = cli.json
        || file_config
            .output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));

    let scanner = Zombiescan::new(root)
        .with_config(config)
        .backup(!cli.no_backup)
        .dry_run(cli.dry_run);

    let scan_report = scanner
        .scan()
        .with_context(|| format!("Scan failed for: {}", cli.path))?;

    if json_output {
        print_json(&scan_report);
    } else {
        print_plain(&scan_report);
        if cli.report {
            for finding in &scan_report.findings {
                println!("[{}] {}", finding.kind, finding.message);
            }
        }
    }

    // Removal pass (guarded by backup unless disabled, inert under dry-run)
    if cli.auto_remove && scan_report.has_zombies() {
        let outcome = scanner
            .purge(&scan_report)
            .context("Removal aborted, nothing was deleted")?;

        if let Some(ref backup) = outcome.backup {
            println!(
                "Backed up {} file(s) to backup {}.",
                backup.total_count, backup.id
            );
        }
        let verb = if cli.dry_run { "Would remove" } else { "Removed" };
        println!(
            "{} {} file(s), pruned {} empty dir(s).",
            verb,
            outcome.removal.files_removed.len(),
            outcome.removal.dirs_removed.len()
        );
        for error in &outcome.removal.errors {
            eprintln!("[WARN] {}", error);
        }
    }

    Ok(())
}
