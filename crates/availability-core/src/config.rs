//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::expander::{DEFAULT_HORIZON_DAYS, MAX_EXPANSION_HORIZON_DAYS};

/// What happens to earlier slots of a batch when a later slot is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Each slot commits as soon as it passes validation. A failure stops the
    /// batch but keeps what was already committed.
    #[default]
    PerSlot,
    /// Every slot is validated and expanded first; nothing commits unless all pass.
    AllOrNothing,
}

/// Tunables for [`AvailabilityService`](crate::service::AvailabilityService).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Days covered by recurrence expansion, counted from the base start.
    pub expansion_horizon_days: u16,
    pub batch_policy: BatchPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            expansion_horizon_days: DEFAULT_HORIZON_DAYS,
            batch_policy: BatchPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Check bounds, returning the config unchanged when valid.
    ///
    /// # Errors
    /// `HorizonOutOfRange` when the horizon is 0 or above
    /// [`MAX_EXPANSION_HORIZON_DAYS`].
    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.expansion_horizon_days == 0
            || self.expansion_horizon_days > MAX_EXPANSION_HORIZON_DAYS
        {
            return Err(ConfigError::HorizonOutOfRange {
                got: self.expansion_horizon_days,
                max: MAX_EXPANSION_HORIZON_DAYS,
            });
        }
        Ok(self)
    }
}
