//! Environment-driven server configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::network::service::DEFAULT_LEADERBOARD_SIZE;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_address: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Entries returned by `GET /api/leaderboard`
    pub leaderboard_size: usize,
    /// Largest accepted request body
    pub max_body_bytes: usize,
    /// JSON-lines file for score records (in-memory only if unset)
    pub score_store_path: Option<PathBuf>,
    /// Best score file for the headless demo (in-memory only if unset)
    pub best_score_path: Option<PathBuf>,
    /// Server version string
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3000,
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            max_body_bytes: 100 * 1024,
            score_store_path: None,
            best_score_path: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ServerConfig {
    /// Load config from environment or use defaults
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDRESS") {
            if let Ok(parsed) = addr.parse() {
                config.bind_address = parsed;
            } else {
                tracing::warn!("Invalid BIND_ADDRESS '{}', using default", addr);
            }
        }

        if let Some(port) = lookup("PORT") {
            if let Ok(parsed) = port.parse::<u16>() {
                config.port = parsed;
            } else {
                tracing::warn!("Invalid PORT '{}', using default", port);
            }
        }

        if let Some(size) = lookup("LEADERBOARD_SIZE") {
            match size.parse::<usize>() {
                Ok(parsed) if (1..=1000).contains(&parsed) => config.leaderboard_size = parsed,
                Ok(_) => tracing::warn!("LEADERBOARD_SIZE must be 1-1000, using default"),
                Err(_) => tracing::warn!("Invalid LEADERBOARD_SIZE '{}', using default", size),
            }
        }

        if let Some(limit) = lookup("MAX_BODY_BYTES") {
            match limit.parse::<usize>() {
                Ok(parsed) if parsed > 0 => config.max_body_bytes = parsed,
                Ok(_) => tracing::warn!("MAX_BODY_BYTES must be > 0, using default"),
                Err(_) => tracing::warn!("Invalid MAX_BODY_BYTES '{}', using default", limit),
            }
        }

        if let Some(path) = lookup("SCORE_STORE_PATH").filter(|p| !p.is_empty()) {
            config.score_store_path = Some(PathBuf::from(path));
        }

        if let Some(path) = lookup("BEST_SCORE_PATH").filter(|p| !p.is_empty()) {
            config.best_score_path = Some(PathBuf::from(path));
        }

        config
    }

    /// Socket address to listen on.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_address, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[]));
        assert_eq!(config.port, 3000);
        assert_eq!(config.leaderboard_size, 25);
        assert_eq!(config.max_body_bytes, 102_400);
        assert!(config.score_store_path.is_none());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDRESS", "127.0.0.1"),
            ("PORT", "8080"),
            ("LEADERBOARD_SIZE", "10"),
            ("SCORE_STORE_PATH", "/tmp/scores.jsonl"),
        ]));
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.leaderboard_size, 10);
        assert_eq!(config.score_store_path, Some(PathBuf::from("/tmp/scores.jsonl")));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BIND_ADDRESS", "not-an-ip"),
            ("PORT", "99999"),
            ("LEADERBOARD_SIZE", "0"),
            ("MAX_BODY_BYTES", "-5"),
            ("BEST_SCORE_PATH", ""),
        ]));
        assert_eq!(config.bind_address, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.port, 3000);
        assert_eq!(config.leaderboard_size, 25);
        assert_eq!(config.max_body_bytes, 102_400);
        assert!(config.best_score_path.is_none());
    }
}
