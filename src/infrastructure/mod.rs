//! Infrastructure layer - External I/O and persistence

pub mod config;
pub mod workspace;

pub use config::{Config, ScanOptions, CONFIG_FILE};
pub use workspace::{FileSystemWorkspace, SourceFile, SourceRepository};
