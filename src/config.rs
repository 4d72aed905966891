//! Server configuration.
//!
//! Every option can be given on the command line or through an
//! `EMBERKV_*` environment variable. Command-line flags win.

use crate::storage::PolicyKind;
use clap::Parser;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[clap(author, version, about = "In-memory key-value cache with LRU/LFU eviction", long_about = None)]
pub struct Config {
    /// Host to bind to
    #[arg(long, env = "EMBERKV_HOST", default_value = crate::DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "EMBERKV_PORT", default_value_t = crate::DEFAULT_PORT)]
    pub port: u16,

    /// Maximum number of keys held before eviction kicks in
    #[arg(short, long, env = "EMBERKV_CAPACITY", default_value_t = crate::DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Eviction policy (LRU or LFU, case-insensitive)
    #[arg(long, env = "EMBERKV_POLICY", default_value = "lru", value_parser = PolicyKind::from_str)]
    pub policy: PolicyKind,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: crate::DEFAULT_HOST.to_string(),
            port: crate::DEFAULT_PORT,
            capacity: crate::DEFAULT_CAPACITY,
            policy: PolicyKind::default(),
        }
    }
}

impl Config {
    /// Returns the bind address as a string
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["emberkv"]).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.capacity, 1000);
        assert_eq!(config.policy, PolicyKind::Lru);
    }

    #[test]
    fn test_flags() {
        let config = Config::try_parse_from([
            "emberkv",
            "--host",
            "0.0.0.0",
            "-p",
            "7000",
            "--capacity",
            "3",
            "--policy",
            "LfU",
        ])
        .unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:7000");
        assert_eq!(config.capacity, 3);
        assert_eq!(config.policy, PolicyKind::Lfu);
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = Config::try_parse_from(["emberkv", "--policy", "fifo"]).unwrap_err();

        assert!(err.to_string().contains("unknown eviction policy 'fifo'"));
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        assert!(Config::try_parse_from(["emberkv", "--port", "99999"]).is_err());
        assert!(Config::try_parse_from(["emberkv", "--capacity", "-1"]).is_err());
    }
}
