//! Service Configuration
//!
//! Settings come from the environment first, then command-line flags override
//! them:
//!
//! | Variable               | Flag        | Default   |
//! |------------------------|-------------|-----------|
//! | `REDIS_TARGET_DB_HOST` |             | `redis`   |
//! | `REDIS_TARGET_DB_PORT` |             | `12000`   |
//! | `APP_BIND`             | `--bind`    | `0.0.0.0` |
//! | `APP_PORT`             | `--bind`    | `8081`    |
//! | `SEARCH_BACKEND`       | `--backend` | `redis`   |
//! | `SEED_FILE`            | `--seed`    | none      |
//!
//! `--bind` takes a full `addr:port`.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;


pub const DEFAULT_REDIS_HOST: &str = "redis";
pub const DEFAULT_REDIS_PORT: u16 = 12000;
pub const DEFAULT_APP_PORT: u16 = 8081;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    Invalid { name: String, value: String },
    #[error("missing value after {0}")]
    MissingValue(String),
    #[error("unknown argument {0}")]
    UnknownArgument(String),
}

/// Which search backend the binary talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Redis,
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(BackendKind::Redis),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(ConfigError::Invalid {
                name: "backend".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub redis_host: String,
    pub redis_port: u16,
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    pub seed_file: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let redis_host = lookup("REDIS_TARGET_DB_HOST")
            .filter(|h| !h.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REDIS_HOST.to_string());
        let redis_port = parse_var(&lookup, "REDIS_TARGET_DB_PORT", DEFAULT_REDIS_PORT)?;
        let app_port = parse_var(&lookup, "APP_PORT", DEFAULT_APP_PORT)?;
        let bind_ip = parse_var(&lookup, "APP_BIND", IpAddr::from([0, 0, 0, 0]))?;
        let backend = parse_var(&lookup, "SEARCH_BACKEND", BackendKind::Redis)?;
        let seed_file = lookup("SEED_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            redis_host,
            redis_port,
            bind_addr: SocketAddr::new(bind_ip, app_port),
            backend,
            seed_file,
        })
    }

    /// Applies `--bind`, `--backend` and `--seed` (program name excluded).
    pub fn apply_args(mut self, args: &[String]) -> Result<Self, ConfigError> {
        let mut i = 0;
        while i < args.len() {
            let flag = args[i].as_str();
            let value = || {
                args.get(i + 1)
                    .ok_or_else(|| ConfigError::MissingValue(flag.to_string()))
            };

            match flag {
                "--bind" => {
                    let raw = value()?;
                    self.bind_addr = raw.parse().map_err(|_| ConfigError::Invalid {
                        name: flag.to_string(),
                        value: raw.clone(),
                    })?;
                }
                "--backend" => {
                    self.backend = value()?.parse()?;
                }
                "--seed" => {
                    self.seed_file = Some(PathBuf::from(value()?));
                }
                other => return Err(ConfigError::UnknownArgument(other.to_string())),
            }
            i += 2;
        }
        Ok(self)
    }

    pub fn redis_url(&self) -> String {
        format!("redis://{}:{}", self.redis_host, self.redis_port)
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name: name.to_string(),
            value: raw,
        }),
    }
}
