//! Run-time configuration of the simulated system.
//!
//! Loaded from JSON; any missing field keeps its default, and CLI flags
//! override the result.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

mod defaults {
    /// The core fetches its first instruction from here.
    pub const RESET_ADDR: u32 = 0;

    pub const RAM_BASE: u32 = 0;

    /// 64 KiB, plenty for hand-assembled firmware.
    pub const RAM_BYTES: usize = 64 * 1024;
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub reset_addr: u32,
    pub ram_base: u32,
    pub ram_bytes: usize,
    /// Stop after this many ticks (0 = run until halted).
    pub max_cycles: u64,
    /// Stop when a system instruction executes. The core itself would
    /// re-execute it forever, since it never advances the PC past one.
    pub stop_on_system: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reset_addr: defaults::RESET_ADDR,
            ram_base: defaults::RAM_BASE,
            ram_bytes: defaults::RAM_BYTES,
            max_cycles: 0,
            stop_on_system: true,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = Config::from_json("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.ram_bytes, 64 * 1024);
        assert!(cfg.stop_on_system);
    }

    #[test]
    fn fields_override_defaults() {
        let cfg =
            Config::from_json(r#"{ "reset_addr": 256, "max_cycles": 100, "stop_on_system": false }"#)
                .unwrap();
        assert_eq!(cfg.reset_addr, 256);
        assert_eq!(cfg.max_cycles, 100);
        assert!(!cfg.stop_on_system);
        assert_eq!(cfg.ram_base, 0);
    }

    #[test]
    fn unknown_field_is_rejected() {
        assert!(matches!(
            Config::from_json(r#"{ "ram_size": 4 }"#),
            Err(ConfigError::Json(_))
        ));
    }
}
