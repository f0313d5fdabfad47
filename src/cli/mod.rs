//! CLI layer - Command-line interface

pub mod commands;
pub mod output;

pub use commands::{Cli, Commands, OutputFormat, RuleOverrides};
pub use output::{format_check_report, format_residuals, format_strip_report};
