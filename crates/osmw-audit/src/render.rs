//! Renders the finished audit report as a human-readable log file.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use osmw_model::{AuditReport, TagStats};

const RULE: &str = "==========================================================";

/// Write the six labeled report sections to `<input-path>-auditing.log`.
///
/// Returns the path written so callers can surface it in their summary.
pub fn write_audit_log(
    input_path: &Path,
    report: &AuditReport,
    record_count: usize,
) -> Result<PathBuf> {
    let mut out = String::new();
    section(&mut out, "TAG / ATTRIBUTE FREQUENCY");
    for (name, stats) in &report.tag_stats {
        render_stats(&mut out, name, stats, 0);
    }

    section(&mut out, "KEY FREQUENCY");
    for (key, count) in &report.key_counts {
        let _ = writeln!(out, "{key}: {count}");
    }

    section(&mut out, "RESTRICTION-LIKE KEYS");
    for key in &report.restriction_keys {
        let _ = writeln!(out, "{key}");
    }

    section(&mut out, "OUT-OF-RANGE POSTAL CODES");
    for code in &report.suspect_postal_codes {
        let _ = writeln!(out, "{code}");
    }

    section(&mut out, "STREET TOKEN FREQUENCY");
    for (token, count) in &report.street_tokens {
        let _ = writeln!(out, "{token:?}: {count}");
    }

    section(&mut out, "RECORD COUNT");
    let _ = writeln!(out, "{record_count}");

    let log_path = audit_log_path(input_path);
    fs::write(&log_path, out)
        .with_context(|| format!("write audit log: {}", log_path.display()))?;
    info!(path = %log_path.display(), "audit log written");
    Ok(log_path)
}

/// The audit log lives next to whatever file the caller points at.
pub fn audit_log_path(input_path: &Path) -> PathBuf {
    let mut name = input_path.as_os_str().to_owned();
    name.push("-auditing.log");
    PathBuf::from(name)
}

fn section(out: &mut String, title: &str) {
    if !out.is_empty() {
        out.push('\n');
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "==========   {title:<42} =====");
    let _ = writeln!(out, "{RULE}\n");
}

fn render_stats(out: &mut String, name: &str, stats: &TagStats, depth: usize) {
    let pad = "  ".repeat(depth);
    let _ = writeln!(out, "{pad}{name}: {}", stats.count);
    for (attribute, count) in &stats.attributes {
        let _ = writeln!(out, "{pad}  @{attribute}: {count}");
    }
    for (child, child_stats) in &stats.children {
        render_stats(out, child, child_stats, depth + 1);
    }
}
