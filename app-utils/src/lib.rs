use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry, EnvFilter};

pub const MARKS_DIR_VAR: &str = "MARKS_DIR";
pub const OUTPUT_PATH_VAR: &str = "OUTPUT_PATH";

pub const DEFAULT_MARKS_DIR: &str = "marks";
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

/// Settings that can come from the environment (or a `.env` file) rather than the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub marks_dir: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// Loads `.env` if there is one, then reads the config variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        if let Err(err) = dotenv() {
            if !err.not_found() {
                return Err(err).context("could not load .env file");
            }
        }

        Ok(Self::from_lookup(|var| env::var(var).ok()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path_or = |var: &str, default: &str| -> PathBuf {
            lookup(var)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_owned())
                .into()
        };

        Self {
            marks_dir: path_or(MARKS_DIR_VAR, DEFAULT_MARKS_DIR),
            output_path: path_or(OUTPUT_PATH_VAR, DEFAULT_OUTPUT_PATH),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Logs to stderr so stdout stays free for report output. `RUST_LOG` overrides the default
/// `info` level.
pub fn init_tracing() -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .context("invalid RUST_LOG filter")?;

    registry()
        .with(
            fmt::layer()
                .event_format(format().compact())
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init()
        .context("could not install tracing subscriber")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset_or_empty() {
        assert_eq!(
            Config::default(),
            Config {
                marks_dir: "marks".into(),
                output_path: "output.txt".into(),
            }
        );

        let config = Config::from_lookup(|_| Some(String::new()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn reads_variables() {
        let config = Config::from_lookup(|var| match var {
            MARKS_DIR_VAR => Some("/srv/marks".to_owned()),
            OUTPUT_PATH_VAR => Some("leaderboard.txt".to_owned()),
            _ => None,
        });
        assert_eq!(config.marks_dir, PathBuf::from("/srv/marks"));
        assert_eq!(config.output_path, PathBuf::from("leaderboard.txt"));
    }
}
