//! Application layer - Use cases and orchestration

pub mod check;
pub mod init;
pub mod strip;

pub use check::{check_tree, CheckReport};
pub use init::init;
pub use strip::{strip_tree, FileChange, FileFailure, FileResiduals, StripOptions, StripReport};
