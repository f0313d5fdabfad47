use clap::Parser;
use serde::Serialize;
use std::path::Path;
use tagstrip::application::{check_tree, init, strip_tree, StripOptions};
use tagstrip::cli::{format_check_report, format_strip_report, Cli, Commands, OutputFormat};
use tagstrip::domain::TagRewriter;
use tagstrip::error::{Result, TagstripError};
use tagstrip::infrastructure::{Config, FileSystemWorkspace};
use tagstrip::telemetry;

fn main() {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {}", e.display_with_suggestions());
            std::process::exit(e.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        command,
        ..
    } = cli;

    match command {
        Commands::Run {
            path,
            dry_run,
            format,
            overrides,
        } => {
            let workspace = FileSystemWorkspace::open(&path)?;
            let config = overrides.apply(load_config(config_path.as_deref(), &path)?);
            let rewriter = TagRewriter::new(&config.rule)?;

            let options = StripOptions {
                scan: config.scan,
                dry_run,
            };
            let report = strip_tree(&workspace, &rewriter, &options);

            match format {
                OutputFormat::Text => print!("{}", format_strip_report(&report)),
                OutputFormat::Json => print_json(&report)?,
            }

            if !report.failures.is_empty() {
                return Err(TagstripError::PartialFailure(report.failures.len()));
            }
            Ok(())
        }
        Commands::Check {
            path,
            format,
            overrides,
        } => {
            let workspace = FileSystemWorkspace::open(&path)?;
            let config = overrides.apply(load_config(config_path.as_deref(), &path)?);
            let rewriter = TagRewriter::new(&config.rule)?;

            let report = check_tree(&workspace, &rewriter, &config.scan);

            match format {
                OutputFormat::Text => print!("{}", format_check_report(&report)),
                OutputFormat::Json => print_json(&report)?,
            }

            if !report.is_clean() {
                return Err(TagstripError::ResidualReferences(report.residual_count()));
            }
            if !report.failures.is_empty() {
                return Err(TagstripError::PartialFailure(report.failures.len()));
            }
            Ok(())
        }
        Commands::Init { path } => {
            let written = init(&path)?;
            println!("Initialized tagstrip config at {}", written.display());
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>, root: &Path) -> Result<Config> {
    match explicit {
        Some(path) => Config::load_from_path(path),
        None => Config::load_from_dir(root),
    }
}

fn print_json<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
