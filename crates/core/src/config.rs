//! Game configuration
//!
//! Defaults come from the constants in `jafris_types`; [`GameConfig::from_env`]
//! overrides them from `JAFRIS_*` environment variables.

use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::types::{MOVE_REPEAT_MS, SOFT_DROP_DIVISOR};

pub const ENV_SOFT_DROP_DIVISOR: &str = "JAFRIS_SOFT_DROP_DIVISOR";
pub const ENV_SEED: &str = "JAFRIS_SEED";
pub const ENV_GHOST: &str = "JAFRIS_GHOST";
pub const ENV_CONFIRM_QUIT: &str = "JAFRIS_CONFIRM_QUIT";
pub const ENV_EVENT_LOG: &str = "JAFRIS_EVENT_LOG";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}")]
    InvalidValue { var: &'static str, value: String },
    #[error("soft drop divisor must be at least 1")]
    ZeroDivisor,
}

/// Tunables for one [`GameMachine`](crate::machine::GameMachine)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Gravity interval is divided by this while soft drop is held.
    pub soft_drop_divisor: u32,
    /// Auto-repeat interval for a held horizontal direction.
    pub move_repeat: Duration,
    /// Shape source seed. `None` seeds from the system clock.
    pub seed: Option<u32>,
    /// Expose the landing row of the current piece in snapshots.
    pub ghost_piece: bool,
    /// Route quit requests through a confirmation step.
    pub confirm_quit: bool,
    /// Append cue events as JSON lines to this file.
    pub event_log: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            soft_drop_divisor: SOFT_DROP_DIVISOR,
            move_repeat: Duration::from_millis(MOVE_REPEAT_MS),
            seed: None,
            ghost_piece: true,
            confirm_quit: true,
            event_log: None,
        }
    }
}

impl GameConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |var: &str| {
            lookup(var)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        if let Some(value) = get(ENV_SOFT_DROP_DIVISOR) {
            let divisor: u32 = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_SOFT_DROP_DIVISOR,
                value: value.clone(),
            })?;
            config = config.with_soft_drop_divisor(divisor)?;
        }

        if let Some(value) = get(ENV_SEED) {
            let seed = value.parse().map_err(|_| ConfigError::InvalidValue {
                var: ENV_SEED,
                value: value.clone(),
            })?;
            config.seed = Some(seed);
        }

        if let Some(value) = get(ENV_GHOST) {
            config.ghost_piece = parse_flag(ENV_GHOST, &value)?;
        }

        if let Some(value) = get(ENV_CONFIRM_QUIT) {
            config.confirm_quit = parse_flag(ENV_CONFIRM_QUIT, &value)?;
        }

        config.event_log = get(ENV_EVENT_LOG).map(PathBuf::from);

        Ok(config)
    }

    pub fn with_soft_drop_divisor(mut self, divisor: u32) -> Result<Self, ConfigError> {
        if divisor == 0 {
            return Err(ConfigError::ZeroDivisor);
        }
        self.soft_drop_divisor = divisor;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_ghost_piece(mut self, enabled: bool) -> Self {
        self.ghost_piece = enabled;
        self
    }

    pub fn with_confirm_quit(mut self, enabled: bool) -> Self {
        self.confirm_quit = enabled;
        self
    }

    pub fn with_event_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.event_log = Some(path.into());
        self
    }

    /// The configured seed, or one derived from the system clock.
    pub fn resolved_seed(&self) -> u32 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
                .unwrap_or(1)
        })
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            var,
            value: value.to_string(),
        }),
    }
}
