//! Strip use case: rewrite every candidate file under a root

use crate::domain::{find_residuals, Residual, RewriteStats, TagRewriter};
use crate::infrastructure::{ScanOptions, SourceFile, SourceRepository};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct StripOptions {
    pub scan: ScanOptions,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub stats: RewriteStats,
}

/// A file that could not be read or written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileResiduals {
    pub path: String,
    pub residuals: Vec<Residual>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StripReport {
    pub scanned_files: usize,
    pub dry_run: bool,
    pub changed: Vec<FileChange>,
    pub failures: Vec<FileFailure>,
    pub residuals: Vec<FileResiduals>,
}

impl StripReport {
    pub fn residual_count(&self) -> usize {
        self.residuals.iter().map(|f| f.residuals.len()).sum()
    }
}

/// Rewrite every candidate file, writing back the ones that changed.
///
/// Read and write failures are recorded in the report and do not stop the
/// batch.
pub fn strip_tree<R: SourceRepository>(
    repository: &R,
    rewriter: &TagRewriter,
    options: &StripOptions,
) -> StripReport {
    let files = repository.list_sources(&options.scan);

    let mut changed = Vec::new();
    let mut failures = Vec::new();
    let mut residuals = Vec::new();

    for file in &files {
        let content = match repository.read_source(file) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %file.relative, error = %e, "failed to read file");
                failures.push(failure(file, e.to_string()));
                continue;
            }
        };

        let result = rewriter.rewrite(&content);
        let final_content = if result.changed() {
            if !options.dry_run {
                if let Err(e) = repository.write_source(file, &result.content) {
                    warn!(path = %file.relative, error = %e, "failed to write file");
                    failures.push(failure(file, e.to_string()));
                    collect_residuals(file, &content, rewriter, &mut residuals);
                    continue;
                }
            }
            info!(
                path = %file.relative,
                replacements = result.stats.total(),
                dry_run = options.dry_run,
                "rewrote file"
            );
            changed.push(FileChange {
                path: file.relative.clone(),
                stats: result.stats,
            });
            result.content
        } else {
            debug!(path = %file.relative, "no changes");
            content
        };

        collect_residuals(file, &final_content, rewriter, &mut residuals);
    }

    StripReport {
        scanned_files: files.len(),
        dry_run: options.dry_run,
        changed,
        failures,
        residuals,
    }
}

pub(crate) fn failure(file: &SourceFile, reason: String) -> FileFailure {
    FileFailure {
        path: file.relative.clone(),
        reason,
    }
}

pub(crate) fn collect_residuals(
    file: &SourceFile,
    content: &str,
    rewriter: &TagRewriter,
    output: &mut Vec<FileResiduals>,
) {
    let found = find_residuals(content, rewriter.rule());
    if !found.is_empty() {
        output.push(FileResiduals {
            path: file.relative.clone(),
            residuals: found,
        });
    }
}
