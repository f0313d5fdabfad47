//! Domain layer - Rewrite rules and the tag rewriter

pub mod residual;
pub mod rewriter;
pub mod rule;
pub mod scanner;

pub use residual::{find_residuals, Residual, ResidualKind};
pub use rewriter::{rewrite, MalformedTag, RewriteResult, RewriteStats, TagRewriter};
pub use rule::{ClosingTags, CompiledRule, RewriteRule};
