//! Output formatting utilities

use crate::application::{CheckReport, FileFailure, FileResiduals, StripReport};
use crate::domain::RewriteStats;

/// Format the result of a run for display
pub fn format_strip_report(report: &StripReport) -> String {
    let mut output = String::new();

    let count = report.changed.len();
    if report.dry_run {
        output.push_str(&format!("Dry run: {} file(s) would be updated.\n", count));
    } else {
        output.push_str(&format!("Updated {} file(s).\n", count));
    }

    for change in &report.changed {
        output.push_str(&format!(
            "  {} ({})\n",
            change.path,
            format_stats(&change.stats)
        ));
    }

    output.push_str(&format_failures(&report.failures));
    output.push('\n');
    output.push_str(&format_residuals(&report.residuals));
    output
}

/// Format the result of a check for display
pub fn format_check_report(report: &CheckReport) -> String {
    let mut output = format!("Checked {} file(s).\n", report.scanned_files);
    output.push_str(&format_failures(&report.failures));
    output.push_str(&format_residuals(&report.residuals));
    output
}

fn format_stats(stats: &RewriteStats) -> String {
    let mut parts = vec![
        format!("{} opening", stats.opening_tags),
        format!("{} closing", stats.closing_tags),
    ];
    if stats.imports_removed > 0 {
        parts.push(format!("{} import(s)", stats.imports_removed));
    }
    if stats.wrappers_removed > 0 {
        parts.push(format!("{} wrapper(s)", stats.wrappers_removed));
    }
    if let Some(malformed) = &stats.malformed {
        parts.push(format!(
            "unterminated <{}> at line {}",
            malformed.name, malformed.line
        ));
    }
    parts.join(", ")
}

fn format_failures(failures: &[FileFailure]) -> String {
    if failures.is_empty() {
        return String::new();
    }

    let mut output = format!("Failures ({}):\n", failures.len());
    for failure in failures {
        output.push_str(&format!("  {}: {}\n", failure.path, failure.reason));
    }
    output
}

/// Format remaining references, one `path:line: text` per line
pub fn format_residuals(files: &[FileResiduals]) -> String {
    if files.is_empty() {
        return "No remaining references.\n".to_string();
    }

    let total: usize = files.iter().map(|f| f.residuals.len()).sum();
    let mut output = format!("Remaining references ({}):\n", total);
    for file in files {
        for residual in &file.residuals {
            output.push_str(&format!(
                "  {}:{}: {}\n",
                file.path, residual.line, residual.excerpt
            ));
        }
    }
    output
}
