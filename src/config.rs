use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use serde::Deserialize;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Parser)]
#[command(name = "tripitcalb0t")]
#[command(about = "Bot to automatically add flights from TripIt to Google Calendar")]
pub struct Cli {
    /// Path to the Google service account keyfile [default: ~/.tripitcalb0t/google.json]
    #[arg(long, env = "GOOGLE_KEYFILE")]
    pub google_keyfile: Option<PathBuf>,

    /// Calendar ID to add events to
    #[arg(long, env = "GOOGLE_CALENDAR_ID")]
    pub calendar: Option<String>,

    /// TripIt username
    #[arg(long, env = "TRIPIT_USERNAME")]
    pub tripit_username: Option<String>,

    /// TripIt password
    #[arg(long, env = "TRIPIT_PASSWORD", hide_env_values = true)]
    pub tripit_password: Option<String>,

    /// Update interval (e.g. "1m", "1h30m") [default: 1m]
    #[arg(long, value_parser = humantime::parse_duration)]
    pub interval: Option<Duration>,

    /// Run once and exit
    #[arg(long)]
    pub once: bool,

    /// Also sync past trips
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub past: bool,

    /// Config file [default: ~/.tripitcalb0t/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// Print version and exit
    #[arg(short = 'v', long)]
    pub version: bool,
}

/// Optional settings from the config file. Flags and environment win.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub calendar: Option<String>,
    pub tripit_username: Option<String>,
    pub tripit_password: Option<String>,
    pub google_keyfile: Option<PathBuf>,
    /// humantime string, e.g. "5m"
    pub interval: Option<String>,
}

/// Validated runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_keyfile: PathBuf,
    pub calendar_id: String,
    pub tripit_username: String,
    pub tripit_password: String,
    pub interval: Duration,
    pub once: bool,
    pub include_past: bool,
}

/// Get the bot's directory (~/.tripitcalb0t)
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".tripitcalb0t"))
}

/// Load a config file. A missing default file is not an error.
pub fn load_file_config(path: &Path, explicit: bool) -> Result<FileConfig> {
    if !path.exists() {
        if explicit {
            bail!("Config file not found at {}", path.display());
        }
        return Ok(FileConfig::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: FileConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

impl Config {
    /// Merge flags, environment and the config file, then validate.
    pub fn load(cli: &Cli) -> Result<Config> {
        let dir = config_dir()?;

        let file = match &cli.config {
            Some(path) => load_file_config(path, true)?,
            None => load_file_config(&dir.join("config.toml"), false)?,
        };

        Config::resolve(cli, file, dir.join("google.json"))
    }

    fn resolve(cli: &Cli, file: FileConfig, default_keyfile: PathBuf) -> Result<Config> {
        let tripit_username = non_empty(cli.tripit_username.clone().or(file.tripit_username));
        let tripit_password = non_empty(cli.tripit_password.clone().or(file.tripit_password));
        let (Some(tripit_username), Some(tripit_password)) = (tripit_username, tripit_password)
        else {
            bail!("TripIt username and password cannot be empty");
        };

        let Some(calendar_id) = non_empty(cli.calendar.clone().or(file.calendar)) else {
            bail!("Calendar ID cannot be empty");
        };

        let google_keyfile = cli
            .google_keyfile
            .clone()
            .or(file.google_keyfile)
            .unwrap_or(default_keyfile);
        if !google_keyfile.is_file() {
            bail!(
                "Google keyfile not found at {}",
                google_keyfile.display()
            );
        }

        let interval = match (cli.interval, file.interval) {
            (Some(interval), _) => interval,
            (None, Some(raw)) => humantime::parse_duration(&raw)
                .with_context(|| format!("Invalid interval {:?} in config file", raw))?,
            (None, None) => DEFAULT_INTERVAL,
        };
        if interval.is_zero() {
            bail!("Interval must be greater than zero");
        }

        Ok(Config {
            google_keyfile,
            calendar_id,
            tripit_username,
            tripit_password,
            interval,
            once: cli.once,
            include_past: cli.past,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
