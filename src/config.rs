use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use directories::ProjectDirs;
use clap::Parser;
use std::fs;
use thiserror::Error;
use tracing::{info, warn};

/// Port the server listens on when nothing else is configured
pub const DEFAULT_PORT: u16 = 3000;

/// Name of the SQLite file created when no database URL is configured
const DEFAULT_DATABASE_FILE: &str = "flashdeck.db";

/// Configuration for the flashdeck server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// URL for the database connection
    pub database_url: String,
    /// TCP port for the HTTP server
    pub port: u16,
    /// Directory for JSON log files; stdout only when unset
    pub log_dir: Option<PathBuf>,
    /// Server URL the CLI talks to
    pub server_url: Option<String>,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the port
    #[serde(default)]
    pub port: Option<u16>,
    /// Optional update for the log directory
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Optional update for the CLI's server URL
    #[serde(default)]
    pub server_url: Option<String>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Command line arguments for the server
#[derive(Parser, Debug)]
#[clap(name = "flashdeck", about = "Flashcard study server with SM-2 scheduling")]
pub struct CliArgs {
    /// Database URL
    #[clap(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Port to listen on
    #[clap(long, env = "FLASHDECK_PORT")]
    pub port: Option<u16>,

    /// Directory for rolling JSON log files
    #[clap(long, env = "FLASHDECK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug mode
    #[clap(long, env = "FLASHDECK_DEBUG", default_value_t = false)]
    pub debug: bool,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            port: update.port.unwrap_or(self.port),
            log_dir: update.log_dir.or(self.log_dir),
            server_url: update.server_url.or(self.server_url),
        }
    }
}

/// Returns the base (default) configuration
///
/// The database lives in the config directory when there is one, otherwise
/// in the working directory.
pub fn base_config(config_path: Option<PathBuf>) -> Config {
    let database_url = config_path.map_or(DEFAULT_DATABASE_FILE.to_string(), |path| {
        path.join(DEFAULT_DATABASE_FILE).to_string_lossy().to_string()
    });

    Config {
        database_url,
        port: DEFAULT_PORT,
        log_dir: None,
        server_url: None,
    }
}

/// Loads configuration from a TOML file
///
/// A missing path or a missing file is not an error; both yield an empty update.
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, ConfigError> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    let content = fs::read_to_string(&config_path).inspect_err(|e| warn!("Failed to read config file: {}", e))?;
    let update = toml::from_str::<ConfigUpdate>(&content).inspect_err(|e| warn!("Failed to parse config file: {}", e))?;

    info!("Loaded configuration from {:?}", config_path);
    Ok(update)
}

/// Loads configuration from command line arguments
pub fn config_from_args(args: CliArgs) -> ConfigUpdate {
    ConfigUpdate {
        database_url: args.database_url,
        port: args.port,
        log_dir: args.log_dir,
        server_url: None,
    }
}

/// Returns the platform config directory, if it exists
pub fn get_config_dir_path() -> Option<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("com", "flashdeck", "flashdeck") else {
        warn!("Could not determine XDG config directory, skipping config file");
        return None;
    };

    let path = PathBuf::from(proj_dirs.config_dir());
    if !path.exists() {
        info!("Config path not found at {:?}, using defaults", path);
        return None;
    }
    Some(path)
}

/// Gets the complete configuration by combining defaults with
/// values from config file, environment variables, and command line arguments
/// in order of increasing precedence
///
/// An unreadable config file is logged and skipped.
pub fn get_config(args: CliArgs) -> Config {
    let config_dir = get_config_dir_path();
    let config_file = config_dir.as_ref().map(|dir| dir.join("config.toml"));

    let config = base_config(config_dir)
        .apply_update(config_from_file(config_file).unwrap_or_default())
        .apply_update(config_from_args(args));

    info!("Final configuration: database_url={}, port={}, log_dir={:?}",
          config.database_url, config.port, config.log_dir);

    config
}
