//! Error types for tagstrip

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tagstrip
#[derive(Debug, Error)]
pub enum TagstripError {
    #[error("Invalid rewrite rule: {0}")]
    InvalidRule(String),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("{0} file(s) could not be processed")]
    PartialFailure(usize),

    #[error("{0} remaining reference(s) found")]
    ResidualReferences(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TagstripError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            TagstripError::PartialFailure(_) => 2,
            TagstripError::ResidualReferences(_) => 3,
            TagstripError::InvalidRule(_) => 4,
            _ => 1,
        }
    }

    /// Get a user-friendly error message with suggestions
    pub fn display_with_suggestions(&self) -> String {
        match self {
            TagstripError::InvalidRule(msg) => {
                format!(
                    "Invalid rewrite rule: {}\n\n\
                    Suggestions:\n\
                    • Namespaces are identifiers (e.g., motion)\n\
                    • Tag names are letters and digits (e.g., div, AnimatePresence)\n\
                    • Module specifiers are written without quotes (e.g., framer-motion)",
                    msg
                )
            }
            TagstripError::NotADirectory(path) => {
                format!(
                    "Not a directory: {}\n\n\
                    Suggestions:\n\
                    • Pass the project root, not a single file\n\
                    • Run 'tagstrip run' from inside the project",
                    path.display()
                )
            }
            TagstripError::ResidualReferences(count) => {
                format!(
                    "{} remaining reference(s) found\n\n\
                    Suggestions:\n\
                    • Run 'tagstrip run' to rewrite them\n\
                    • References inside malformed tags must be fixed by hand",
                    count
                )
            }
            TagstripError::Config(msg) => {
                if msg.contains("already exists") {
                    format!(
                        "{}\n\n\
                        Edit the existing file or remove it before running 'tagstrip init'",
                        msg
                    )
                } else {
                    msg.clone()
                }
            }
            _ => self.to_string(),
        }
    }
}

/// Result type using TagstripError
pub type Result<T> = std::result::Result<T, TagstripError>;
