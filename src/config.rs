use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "localhost:8080";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid listen address '{0}', expected HOST:PORT")]
    InvalidAddr(String),
}

/// Server settings. Missing fields in a config file fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
    pub verbosity: usize,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            addr: DEFAULT_ADDR.to_owned(),
            verbosity: 2,
        }
    }
}

impl ServerConfig {
    pub fn load(path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
        let path = path.into();
        let value = std::fs::read_to_string(&path)?;
        let config: ServerConfig = serde_json::from_str(&value)?;
        debug!("Loaded config from {}", path.display());
        config.validate()?;
        Ok(config)
    }

    /// Applies command line overrides on top of the current settings.
    pub fn merge(mut self, addr: Option<&String>, verbosity: Option<usize>) -> Self {
        if let Some(addr) = addr {
            self.addr = addr.to_owned();
        }
        if let Some(v) = verbosity {
            self.verbosity = v;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.addr.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
            _ => Err(ConfigError::InvalidAddr(self.addr.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: ServerConfig = serde_json::from_str(r#"{"verbosity": 4}"#).unwrap();
        assert_eq!(config.addr, DEFAULT_ADDR);
        assert_eq!(config.verbosity, 4);
    }

    #[test]
    fn cli_overrides_file() {
        let addr = "127.0.0.1:9000".to_owned();
        let config = ServerConfig::default().merge(Some(&addr), None);
        assert_eq!(config.addr, addr);
        assert_eq!(config.verbosity, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_addr() {
        for addr in ["", "localhost", ":8080", "localhost:http", "localhost:70000"] {
            let config = ServerConfig::default().merge(Some(&addr.to_owned()), None);
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidAddr(_))),
                "{addr}"
            );
        }
        let v6 = ServerConfig::default().merge(Some(&"[::1]:8080".to_owned()), None);
        assert!(v6.validate().is_ok());
    }

    #[test]
    fn missing_file() {
        let err = ServerConfig::load("/nonexistent/kvhttp.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
