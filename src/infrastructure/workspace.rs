//! File system access for the files being rewritten

use crate::error::{Result, TagstripError};
use crate::infrastructure::ScanOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// A candidate file, addressed relative to the workspace root
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SourceFile {
    /// Forward-slash separated path relative to the root
    pub relative: String,
}

impl SourceFile {
    pub fn new(relative: impl Into<String>) -> Self {
        SourceFile {
            relative: relative.into(),
        }
    }
}

/// Abstract access to the files of one project
pub trait SourceRepository {
    /// Get the root directory of this repository
    fn root(&self) -> &Path;

    /// Candidate files matching the scan options, sorted by path
    fn list_sources(&self, options: &ScanOptions) -> Vec<SourceFile>;

    /// Read a file as UTF-8
    fn read_source(&self, file: &SourceFile) -> Result<String>;

    /// Replace a file's content
    fn write_source(&self, file: &SourceFile, content: &str) -> Result<()>;
}

/// File system implementation of SourceRepository
#[derive(Debug, Clone)]
pub struct FileSystemWorkspace {
    pub root: PathBuf,
}

impl FileSystemWorkspace {
    /// Open a workspace rooted at an existing directory
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(TagstripError::NotADirectory(root.to_path_buf()));
        }
        Ok(FileSystemWorkspace {
            root: root.to_path_buf(),
        })
    }

    fn normalize_relative_path(path: &Path) -> Option<String> {
        let parts: Vec<&str> = path
            .iter()
            .map(|part| part.to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }

    fn has_extension(path: &Path, extensions: &[String]) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|wanted| wanted == ext))
    }

    /// Write using a best-effort atomic replace: write to a temp file in the
    /// same directory, then rename into place. The replaced file's
    /// permissions carry over to the new one.
    ///
    /// On Windows, `rename` does not overwrite existing files, so the
    /// destination is removed first.
    fn write_atomic(path: &Path, content: &str) -> Result<()> {
        let tmp_name = format!(
            "{}.tagstrip-tmp-{}",
            path.file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("source"),
            std::process::id()
        );
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, content)?;

        if let Ok(metadata) = fs::metadata(path) {
            if let Err(e) = fs::set_permissions(&tmp_path, metadata.permissions()) {
                let _ = fs::remove_file(&tmp_path);
                return Err(TagstripError::Io(e));
            }
        }

        if cfg!(windows) && path.exists() {
            fs::remove_file(path)?;
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(TagstripError::Io(e));
        }
        Ok(())
    }
}

impl SourceRepository for FileSystemWorkspace {
    fn root(&self) -> &Path {
        &self.root
    }

    fn list_sources(&self, options: &ScanOptions) -> Vec<SourceFile> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root).into_iter().filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            entry
                .file_name()
                .to_str()
                .is_none_or(|name| !options.skip_dirs.iter().any(|skip| skip == name))
        });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            if !Self::has_extension(entry.path(), &options.extensions) {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if let Some(relative) = Self::normalize_relative_path(rel) {
                files.push(SourceFile::new(relative));
            }
        }

        files.sort();
        files
    }

    fn read_source(&self, file: &SourceFile) -> Result<String> {
        let path = self.root.join(&file.relative);
        fs::read_to_string(path).map_err(TagstripError::Io)
    }

    fn write_source(&self, file: &SourceFile, content: &str) -> Result<()> {
        let path = self.root.join(&file.relative);
        Self::write_atomic(&path, content)
    }
}
