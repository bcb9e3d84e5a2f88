use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const DEFAULT_MAX_CV_SIZE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub uploads_dir: PathBuf,
    pub max_cv_size_bytes: usize,
    pub environment: String,
    pub log_format: LogFormat,
    pub seed_demo_data: bool,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3010".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            max_cv_size_bytes: DEFAULT_MAX_CV_SIZE_BYTES,
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
            seed_demo_data: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_address: get_env_or("SERVER_ADDRESS", defaults.server_address),
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            max_cv_size_bytes: get_env_parse_or("MAX_CV_SIZE_BYTES", defaults.max_cv_size_bytes)?,
            environment: get_env_or("APP_ENV", defaults.environment),
            log_format: parse_log_format(&get_env_or("LOG_FORMAT", "pretty".to_string()))?,
            seed_demo_data: get_env_parse_or("SEED_DEMO_DATA", defaults.seed_demo_data)?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

fn get_env_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "text" | "" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(Error::Config(format!("Invalid value for LOG_FORMAT: {}", other))),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| Error::Config("Configuration has not been initialized".to_string()))
}
