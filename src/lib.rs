//! tagstrip - Strip a namespaced tag library out of JSX/TSX sources
//!
//! Rewrites `<motion.div ...>` style tags to their bare form, removes wrapper
//! components and the library's import lines, and reports anything it could
//! not rewrite.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod telemetry;

pub use domain::{rewrite, RewriteRule, TagRewriter};
pub use error::TagstripError;
