//! # config
//!
//! Service configuration, read once from the environment at startup.
//!
//! | Variable         | Default        | Description                               |
//! |------------------|----------------|-------------------------------------------|
//! | `BIND_ADDR`      | `0.0.0.0:3000` | Address Axum listens on                   |
//! | `API_KEY`        | *(empty)*      | Required `X-API-Key`; empty = dev mode    |
//! | `MAX_BODY_BYTES` | `65536`        | Request body limit for strategy endpoints |
//! | `RUST_LOG`       | `strategist=debug` | Tracing filter                        |

use std::net::SocketAddr;

use anyhow::{Context, Result};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr:      SocketAddr,
    /// `None` disables authentication.
    pub api_key:        Option<String>,
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000")?;

        let api_key = lookup("API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let max_body_bytes: usize = match lookup("MAX_BODY_BYTES") {
            Some(raw) => raw
                .trim()
                .parse()
                .context("MAX_BODY_BYTES must be a positive integer")?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self { bind_addr, api_key, max_body_bytes })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr:      SocketAddr::from(([0, 0, 0, 0], 3000)),
            api_key:        None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let env: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServerConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.max_body_bytes, 65536);
    }

    #[test]
    fn test_blank_api_key_is_dev_mode() {
        assert_eq!(config(&[("API_KEY", "   ")]).unwrap().api_key, None);
        assert_eq!(
            config(&[("API_KEY", "secret")]).unwrap().api_key.as_deref(),
            Some("secret")
        );
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(config(&[("BIND_ADDR", "not-an-addr")]).is_err());
        assert!(config(&[("MAX_BODY_BYTES", "lots")]).is_err());
        assert_eq!(
            config(&[("MAX_BODY_BYTES", "1024")]).unwrap().max_body_bytes,
            1024
        );
    }
}
