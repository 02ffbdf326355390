//! Bot configuration.
//!
//! Constructed in code by the embedding surface (there is no persisted
//! configuration); validated once before a controller is built.

use std::time::Duration;

use serde::Serialize;

use crate::error::{LoiterError, Result};

/// Default lower bound for the inter-iteration delay, in milliseconds.
pub const DEFAULT_DELAY_MIN_MS: u64 = 15_000;

/// Default upper bound for the inter-iteration delay, in milliseconds.
pub const DEFAULT_DELAY_MAX_MS: u64 = 30_000;

/// Default number of discrete pointer animation steps.
pub const DEFAULT_POINTER_STEPS: u32 = 20;

/// Default delay between pointer animation steps, in milliseconds.
pub const DEFAULT_POINTER_STEP_DELAY_MS: u64 = 50;

/// Tunables for the loop controller and its strategies.
///
/// # Example
///
/// ```
/// use loiter::config::BotConfig;
///
/// let config = BotConfig::default().with_edit_enabled(true);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.delay_min_ms, 15_000);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct BotConfig {
    /// Lower bound of the random inter-iteration delay (inclusive).
    pub delay_min_ms: u64,
    /// Upper bound of the random inter-iteration delay (inclusive).
    pub delay_max_ms: u64,
    /// Number of discrete steps in one pointer animation.
    pub pointer_steps: u32,
    /// Delay between pointer animation steps.
    pub pointer_step_delay_ms: u64,
    /// Whether the reversible blank-line edit strategy is enabled.
    pub edit_enabled: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            delay_min_ms: DEFAULT_DELAY_MIN_MS,
            delay_max_ms: DEFAULT_DELAY_MAX_MS,
            pointer_steps: DEFAULT_POINTER_STEPS,
            pointer_step_delay_ms: DEFAULT_POINTER_STEP_DELAY_MS,
            edit_enabled: false,
        }
    }
}

impl BotConfig {
    /// Set the inter-iteration delay range in milliseconds.
    #[must_use]
    pub fn with_delay_range_ms(mut self, min: u64, max: u64) -> Self {
        self.delay_min_ms = min;
        self.delay_max_ms = max;
        self
    }

    /// Set the pointer animation step count.
    #[must_use]
    pub fn with_pointer_steps(mut self, steps: u32) -> Self {
        self.pointer_steps = steps;
        self
    }

    /// Set the delay between pointer animation steps.
    #[must_use]
    pub fn with_pointer_step_delay_ms(mut self, ms: u64) -> Self {
        self.pointer_step_delay_ms = ms;
        self
    }

    /// Enable or disable the reversible blank-line edit strategy.
    #[must_use]
    pub fn with_edit_enabled(mut self, enabled: bool) -> Self {
        self.edit_enabled = enabled;
        self
    }

    /// Delay between pointer steps as a [`Duration`].
    #[must_use]
    pub fn pointer_step_delay(&self) -> Duration {
        Duration::from_millis(self.pointer_step_delay_ms)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoiterError::InvalidConfig`] for an inverted delay range
    /// or a zero step count.
    pub fn validate(&self) -> Result<()> {
        if self.delay_min_ms > self.delay_max_ms {
            return Err(LoiterError::invalid_config(
                "delay_min_ms",
                format!(
                    "must not exceed delay_max_ms ({} > {})",
                    self.delay_min_ms, self.delay_max_ms
                ),
            ));
        }
        if self.pointer_steps == 0 {
            return Err(LoiterError::invalid_config(
                "pointer_steps",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
