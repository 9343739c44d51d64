//! Suite configuration read from the process environment.

use {
    crate::error::{Error, Result},
    std::env,
    tracing::Level,
};

pub const SEED_VAR: &str = "DYNSEQ_SEED";
pub const NEGATIVE_VAR: &str = "DYNSEQ_NEGATIVE";
pub const LOG_VAR: &str = "DYNSEQ_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteConfig {
    /// Fixed RNG seed, or None to derive one from the clock
    pub seed: Option<u64>,
    /// Also run the cases that fail on purpose
    pub include_negative: bool,
    pub log_level: Level,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            seed: None,
            include_negative: false,
            log_level: Level::INFO,
        }
    }
}

impl SuiteConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from any variable source, unset variables keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where F: Fn(&str) -> Option<String> {
        let mut config = SuiteConfig::default();

        if let Some(raw) = lookup(SEED_VAR) {
            let seed = raw.trim().parse::<u64>()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", SEED_VAR, raw, e)))?;
            config.seed = Some(seed);
        }

        if let Some(raw) = lookup(NEGATIVE_VAR) {
            config.include_negative = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => return Err(Error::Config(format!("{}={:?}: expected a boolean", NEGATIVE_VAR, raw))),
            };
        }

        if let Some(raw) = lookup(LOG_VAR) {
            config.log_level = raw.trim().parse::<Level>()
                .map_err(|e| Error::Config(format!("{}={:?}: {}", LOG_VAR, raw, e)))?;
        }

        Ok(config)
    }
}
