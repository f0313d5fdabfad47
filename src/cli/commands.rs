//! CLI command definitions

use crate::domain::ClosingTags;
use crate::infrastructure::Config;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "tagstrip")]
#[command(about = "Strip a namespaced tag library out of JSX/TSX sources", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log every file visited
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: <PATH>/tagstrip.toml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite files in place
    Run {
        /// Project root to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        overrides: RuleOverrides,
    },

    /// Report remaining references without rewriting
    Check {
        /// Project root to scan
        #[arg(default_value = ".")]
        path: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        #[command(flatten)]
        overrides: RuleOverrides,
    },

    /// Write a default tagstrip.toml
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command-line settings that take precedence over tagstrip.toml
#[derive(Args, Debug, Default, Clone)]
pub struct RuleOverrides {
    /// Tag namespace to strip (e.g., motion)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Module whose imports are removed (repeatable)
    #[arg(long = "module", value_name = "SPEC")]
    pub modules: Vec<String>,

    /// Rewrite every matched tag to this tag name
    #[arg(long, value_name = "TAG")]
    pub replace_with: Option<String>,

    /// Wrapper tag removed while keeping its children (repeatable)
    #[arg(long = "wrapper", value_name = "TAG")]
    pub wrappers: Vec<String>,

    /// How closing tags follow a replacement tag (matched, original)
    #[arg(long, value_parser = ClosingTags::from_str)]
    pub closing_tags: Option<ClosingTags>,

    /// File extension to scan (repeatable)
    #[arg(long = "ext", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Directory name to skip (repeatable)
    #[arg(long = "skip-dir", value_name = "NAME")]
    pub skip_dirs: Vec<String>,
}

impl RuleOverrides {
    /// Apply the overrides on top of a loaded config
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(namespace) = &self.namespace {
            config.rule.namespace = namespace.clone();
        }
        if !self.modules.is_empty() {
            config.rule.import_modules = self.modules.clone();
        }
        if let Some(tag) = &self.replace_with {
            config.rule.replacement_tag = Some(tag.clone());
        }
        if !self.wrappers.is_empty() {
            config.rule.wrapper_tags = self.wrappers.clone();
        }
        if let Some(mode) = self.closing_tags {
            config.rule.closing_tags = mode;
        }
        if !self.extensions.is_empty() {
            config.scan.extensions = self
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect();
        }
        if !self.skip_dirs.is_empty() {
            config.scan.skip_dirs = self.skip_dirs.clone();
        }
        config
    }
}
