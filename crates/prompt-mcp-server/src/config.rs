//! Environment configuration.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROMPT_DIR: &str = "prompts";

/// Configuration error. Always fatal at startup.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid PORT value: {0:?}")]
    InvalidPort(String),
    #[error("Invalid HOST value: {0:?}")]
    InvalidHost(String),
}

/// Server settings read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Bearer allow-list; empty disables authentication.
    pub auth_tokens: Vec<String>,
    /// Directory holding the instruction texts.
    pub prompt_dir: PathBuf,
}

impl ServerConfig {
    /// Read `HOST`, `PORT`, `MCP_AUTH_TOKENS` and `PROMPT_DIR`.
    ///
    /// # Errors
    /// Returns error if `HOST` or `PORT` is set but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    /// Returns error if `HOST` or `PORT` is set but unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let host = match var("HOST") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let auth_tokens = var("MCP_AUTH_TOKENS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let prompt_dir = var("PROMPT_DIR").map_or_else(|| PathBuf::from(DEFAULT_PROMPT_DIR), PathBuf::from);

        Ok(Self {
            host,
            port,
            auth_tokens,
            prompt_dir,
        })
    }

    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.addr(), SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert!(cfg.auth_tokens.is_empty());
        assert_eq!(cfg.prompt_dir, PathBuf::from("prompts"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("PORT", "8080"),
            ("HOST", "127.0.0.1"),
            ("MCP_AUTH_TOKENS", " a, b ,,c "),
            ("PROMPT_DIR", "/srv/prompts"),
        ])
        .unwrap();
        assert_eq!(cfg.addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));
        assert_eq!(cfg.auth_tokens, vec!["a", "b", "c"]);
        assert_eq!(cfg.prompt_dir, PathBuf::from("/srv/prompts"));
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let cfg = config(&[("PORT", "  "), ("MCP_AUTH_TOKENS", " , ")]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert!(cfg.auth_tokens.is_empty());
    }

    #[test]
    fn test_invalid_port_is_fatal() {
        assert_eq!(
            config(&[("PORT", "http")]),
            Err(ConfigError::InvalidPort("http".into()))
        );
        assert_eq!(
            config(&[("PORT", "70000")]),
            Err(ConfigError::InvalidPort("70000".into()))
        );
    }

    #[test]
    fn test_invalid_host_is_fatal() {
        assert_eq!(
            config(&[("HOST", "localhost:1")]),
            Err(ConfigError::InvalidHost("localhost:1".into()))
        );
    }
}
