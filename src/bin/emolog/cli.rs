// CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use emolog::log::LogLevel;

#[derive(Parser, Debug)]
#[command(name = "emolog")]
#[command(author = "hatlonely <hatlonely@foxmail.com>")]
#[command(version = "0.1.0")]
#[command(about = "Emit and inspect emoji-marked log files", long_about = None)]
pub struct Cli {
    /// Path to logger config file (default: ~/.emolog/config.yaml, if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Emit one log line to the console and the level file
    Emit(EmitArgs),
    /// Print the lines of one level file
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Root folder of the log files
    #[arg(long)]
    pub folder: Option<String>,

    /// Logger name
    #[arg(long)]
    pub name: Option<String>,

    /// Level of the emitted line (debug, trace, info, warning, start, end, error, critical, done, unknown)
    #[arg(short, long, default_value = "info")]
    pub level: LogLevel,

    /// Message, `{}` placeholders are filled from ARGS
    pub message: String,

    /// Positional arguments of the message
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Root folder of the log files
    #[arg(long)]
    pub folder: Option<String>,

    /// Logger name
    #[arg(long)]
    pub name: Option<String>,

    /// Date directory, YYYY-MM-DD (default: today)
    #[arg(long)]
    pub date: Option<String>,

    /// Level file to read (PROCESS, INFO, WARNING, ERROR, UNKNOWN)
    #[arg(short, long, default_value = "PROCESS")]
    pub file: String,

    /// Print the raw lines without parsing
    #[arg(long)]
    pub raw: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_emit() {
        let cli = Cli::parse_from([
            "emolog", "emit", "--name", "app", "-l", "warning", "user {} failed", "alice",
        ]);
        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.name.as_deref(), Some("app"));
                assert_eq!(args.level, LogLevel::Warning);
                assert_eq!(args.message, "user {} failed");
                assert_eq!(args.args, vec!["alice".to_string()]);
                assert!(args.folder.is_none());
            }
            _ => panic!("expected emit"),
        }
    }

    #[test]
    fn test_parse_emit_default_level() {
        let cli = Cli::parse_from(["emolog", "--config", "~/emolog.yaml", "emit", "hello"]);
        assert_eq!(cli.config.as_deref(), Some("~/emolog.yaml"));
        match cli.command {
            Commands::Emit(args) => {
                assert_eq!(args.level, LogLevel::Info);
                assert!(args.args.is_empty());
            }
            _ => panic!("expected emit"),
        }
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::parse_from([
            "emolog", "show", "--folder", "/tmp/logs", "--date", "2024-01-02", "-f", "ERROR",
        ]);
        match cli.command {
            Commands::Show(args) => {
                assert_eq!(args.folder.as_deref(), Some("/tmp/logs"));
                assert_eq!(args.date.as_deref(), Some("2024-01-02"));
                assert_eq!(args.file, "ERROR");
                assert!(!args.raw);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_level() {
        assert!(Cli::try_parse_from(["emolog", "emit", "-l", "loud", "x"]).is_err());
    }
}
