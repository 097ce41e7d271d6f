use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use daylog::config::{self, Config, SinkKind};
use daylog::logging::{self, Level, Logger};

/// daylog - pipe lines from stdin into a leveled, day-rotating log
#[derive(Parser, Debug)]
#[command(name = "daylog", version, about)]
struct Cli {
    /// Config file (defaults to ~/.daylog/config.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Level selector: debug, info, warn, error, fatal, off, all
    #[arg(short, long, value_name = "NAME")]
    level: Option<String>,

    /// Write to this rotating log file instead of the console
    #[arg(short, long, value_name = "PATH", conflicts_with = "console")]
    file: Option<String>,

    /// Force console output even if the config selects a file
    #[arg(long)]
    console: bool,

    /// Disable colored console output
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_default()?,
        };

        if let Some(level) = &self.level {
            config.level = level.clone();
        }
        if let Some(file) = &self.file {
            config.file = file.clone();
            config.sink = SinkKind::File;
        }
        if self.console {
            config.sink = SinkKind::Console;
        }
        if self.no_color {
            config.color = false;
        }
        Ok(config)
    }
}

/// Split an optional `LEVEL:` prefix off an input line
fn classify(line: &str) -> (Level, &str) {
    for (prefix, level) in [
        ("DEBUG:", Level::Debug),
        ("WARN:", Level::Warn),
        ("ERROR:", Level::Error),
    ] {
        if let Some(rest) = line.strip_prefix(prefix) {
            return (level, rest.trim_start());
        }
    }
    (Level::Info, line)
}

fn log_line(logger: &Logger, line: &str) {
    let (level, message) = classify(line);
    match level {
        Level::Debug => daylog::log_debug!(logger, "{}", message),
        Level::Warn => daylog::log_warn!(logger, "{}", message),
        Level::Error | Level::Fatal => daylog::log_error!(logger, "{}", message),
        Level::Info => daylog::log_info!(logger, "{}", message),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    let logger = logging::init_logging(&config)?;

    match config.sink {
        SinkKind::File => tracing::info!("Logging to: {}", config.log_path().display()),
        SinkKind::Console => tracing::debug!(
            "Logging to console (config: {})",
            config::config_file_path().display()
        ),
    }

    let mut count = 0usize;
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        log_line(&logger, &line);
        count += 1;
    }

    tracing::debug!("Forwarded {} lines", count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_prefixes() {
        assert_eq!(classify("WARN: low disk"), (Level::Warn, "low disk"));
        assert_eq!(classify("ERROR:boom"), (Level::Error, "boom"));
        assert_eq!(classify("DEBUG: x=1"), (Level::Debug, "x=1"));
        assert_eq!(classify("plain line"), (Level::Info, "plain line"));
        assert_eq!(classify("warn: lowercase"), (Level::Info, "warn: lowercase"));
    }

    #[test]
    fn test_cli_overrides_config() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "level = \"debug\"\nkeep_days = 3\n").unwrap();

        let cli = Cli::parse_from([
            "daylog",
            "--config",
            config_path.to_str().unwrap(),
            "--file",
            "/tmp/x.log",
            "--level",
            "warn",
            "--no-color",
        ]);
        let config = cli.resolve_config().unwrap();

        assert_eq!(config.sink, SinkKind::File);
        assert_eq!(config.level, "warn");
        assert_eq!(config.keep_days, 3);
        assert!(!config.color);
        assert_eq!(config.log_path(), PathBuf::from("/tmp/x.log"));
    }

    #[test]
    fn test_cli_file_conflicts_with_console() {
        let result = Cli::try_parse_from(["daylog", "--file", "/tmp/x.log", "--console"]);
        assert!(result.is_err());
    }
}
