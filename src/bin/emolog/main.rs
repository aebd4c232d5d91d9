// emolog - emit and inspect emoji-marked log files

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use cli::{Cli, Commands, EmitArgs, ShowArgs};
use emolog::cfg::{expand_path, load_config};
use emolog::log::{registry, FileLine, Logger, LoggerConfig, MetadataValue};

/// Get default config path (~/.emolog/config.yaml)
fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to get home directory")?;
    Ok(home.join(".emolog").join("config.yaml"))
}

/// Load logger configuration, falling back to defaults when no file is present
fn logger_config(path: Option<&str>) -> Result<LoggerConfig> {
    let path = match path {
        Some(path) => expand_path(path),
        None => {
            let path = default_config_path()?;
            if !path.exists() {
                return Ok(LoggerConfig::default());
            }
            path
        }
    };
    load_config(&path)
}

fn apply_overrides(mut config: LoggerConfig, folder: &Option<String>, name: &Option<String>) -> LoggerConfig {
    if let Some(folder) = folder {
        config.log_folder = folder.clone();
    }
    if let Some(name) = name {
        config.name = name.clone();
    }
    config
}

fn execute_emit(args: &EmitArgs, config: LoggerConfig) -> Result<()> {
    let config = apply_overrides(config, &args.folder, &args.name);
    let logger = Logger::new(config)?;
    let values: Vec<MetadataValue> = args.args.iter().map(MetadataValue::from).collect();
    logger.log_from(args.level, Some("main"), args.message.clone(), values)?;
    logger.close();
    Ok(())
}

fn execute_show(args: &ShowArgs, config: LoggerConfig) -> Result<()> {
    let config = apply_overrides(config, &args.folder, &args.name);
    let date = args
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
    let path = expand_path(&config.log_folder)
        .join(&config.name)
        .join(date)
        .join(format!("{}.log", args.file.to_uppercase()));

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read log file: {}", path.display()))?;

    for line in content.lines() {
        if args.raw {
            println!("{}", line);
            continue;
        }
        match FileLine::parse(line) {
            Ok(parsed) => println!(
                "{} {} {:<8} {} {}",
                parsed.marker,
                parsed.time,
                registry::level_name(parsed.level.rank()),
                parsed.message,
                parsed.args
            ),
            Err(e) => eprintln!("skip malformed line: {:#}", e),
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = logger_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Emit(args) => execute_emit(args, config)?,
        Commands::Show(args) => execute_show(args, config)?,
    }

    Ok(())
}
