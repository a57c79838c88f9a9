//! # Runtime Configuration
//!
//! Environment configuration read once at startup. Command line flags take
//! precedence over these values.
//!
//! ## `HMR_STACK_SIZE`
//!
//! Coroutine stack size for the HTTP transport, decimal (`16384`) or hex
//! (`0x4000`). Default `0x4000` (16 KB). Memory use grows with
//! `stack_size × concurrent connections`.
//!
//! ## `HMR_BASE_PATH`
//!
//! Prefix removed from incoming paths before route matching, e.g. `/api` turns
//! `/api/books` into `/books`. Default: none.
//!
//! ## `HMR_ROUTE_POLICY`
//!
//! `strict` (default) aborts on the first bad route line; `lenient` skips bad
//! lines and logs them.
//!
//! ```rust
//! use hmrouter::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use crate::router::LoadPolicy;
use std::env;
use tracing::warn;

/// Default coroutine stack size (16 KB).
pub const DEFAULT_STACK_SIZE: usize = 0x4000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
    /// Prefix stripped from request paths; empty for none
    pub base_path: String,
    pub route_policy: LoadPolicy,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            base_path: String::new(),
            route_policy: LoadPolicy::Strict,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`RuntimeConfig::from_env`], reading variables through `lookup`.
    /// Unparseable values fall back to their defaults with a warning.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(val) = lookup("HMR_STACK_SIZE") {
            match parse_size(&val) {
                Some(size) => config.stack_size = size,
                None => warn!(value = %val, "Ignoring invalid HMR_STACK_SIZE"),
            }
        }
        if let Some(val) = lookup("HMR_BASE_PATH") {
            config.base_path = val.trim().trim_end_matches('/').to_string();
        }
        if let Some(val) = lookup("HMR_ROUTE_POLICY") {
            match val.parse() {
                Ok(policy) => config.route_policy = policy,
                Err(_) => warn!(value = %val, "Ignoring invalid HMR_ROUTE_POLICY"),
            }
        }
        config
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(RuntimeConfig::from_lookup(lookup(&[])), RuntimeConfig::default());
    }

    #[test]
    fn test_stack_size_hex_and_decimal() {
        let hex = RuntimeConfig::from_lookup(lookup(&[("HMR_STACK_SIZE", "0x8000")]));
        assert_eq!(hex.stack_size, 0x8000);
        let dec = RuntimeConfig::from_lookup(lookup(&[("HMR_STACK_SIZE", "32768")]));
        assert_eq!(dec.stack_size, 32768);
        let bad = RuntimeConfig::from_lookup(lookup(&[("HMR_STACK_SIZE", "big")]));
        assert_eq!(bad.stack_size, DEFAULT_STACK_SIZE);
    }

    #[test]
    fn test_base_path_and_policy() {
        let config = RuntimeConfig::from_lookup(lookup(&[
            ("HMR_BASE_PATH", "/api/"),
            ("HMR_ROUTE_POLICY", "lenient"),
        ]));
        assert_eq!(config.base_path, "/api");
        assert_eq!(config.route_policy, LoadPolicy::Lenient);
    }

    #[test]
    fn test_invalid_policy_keeps_strict() {
        let config = RuntimeConfig::from_lookup(lookup(&[("HMR_ROUTE_POLICY", "sloppy")]));
        assert_eq!(config.route_policy, LoadPolicy::Strict);
    }
}
