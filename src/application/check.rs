//! Check use case: report remaining references without rewriting

use crate::application::strip::{collect_residuals, failure, FileFailure, FileResiduals};
use crate::domain::TagRewriter;
use crate::infrastructure::{ScanOptions, SourceRepository};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub scanned_files: usize,
    pub failures: Vec<FileFailure>,
    pub residuals: Vec<FileResiduals>,
}

impl CheckReport {
    pub fn residual_count(&self) -> usize {
        self.residuals.iter().map(|f| f.residuals.len()).sum()
    }

    pub fn is_clean(&self) -> bool {
        self.residuals.is_empty()
    }
}

pub fn check_tree<R: SourceRepository>(
    repository: &R,
    rewriter: &TagRewriter,
    scan: &ScanOptions,
) -> CheckReport {
    let files = repository.list_sources(scan);
    let mut failures = Vec::new();
    let mut residuals = Vec::new();

    for file in &files {
        match repository.read_source(file) {
            Ok(content) => collect_residuals(file, &content, rewriter, &mut residuals),
            Err(e) => {
                warn!(path = %file.relative, error = %e, "failed to read file");
                failures.push(failure(file, e.to_string()));
            }
        }
    }

    CheckReport {
        scanned_files: files.len(),
        failures,
        residuals,
    }
}
