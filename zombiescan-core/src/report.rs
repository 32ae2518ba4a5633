//! Output formatting - plaintext and JSON.

use crate::builder::ScanReport;

/// Prints a scan report in plain text format.
pub fn print_plain(report: &ScanReport) {
    if report.zombies.is_empty() {
        println!("No zombie files found.");
        return;
    }

    println!("ZOMBIE FILES ({}):", report.zombies.len());
    for zombie in &report.zombies {
        println!(
            "- {} ({} bytes, modified {})",
            zombie.relative_path, zombie.size_bytes, zombie.modified
        );
    }
    println!(
        "{} of {} candidates unreferenced, {} bytes total",
        report.zombies.len(),
        report.total_candidates,
        report.zombie_bytes()
    );
}

/// Prints a scan report in JSON format.
///
/// Falls back to a minimal listing if serialization fails.
pub fn print_json(report: &ScanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("[WARN] JSON serialization failed: {}", e);
            let paths: Vec<&str> = report
                .zombies
                .iter()
                .map(|z| z.relative_path.as_str())
                .collect();
            println!("{{\"zombies\": {:?}}}", paths);
        }
    }
}
