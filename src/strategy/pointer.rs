//! Pointer movement strategy.
//!
//! Samples a uniformly random target inside the display bounds and walks
//! the pointer there in a fixed number of discrete steps with a fixed
//! inter-step delay, so the motion looks gradual rather than teleported.

use std::time::Duration;

use async_trait::async_trait;
use rand::thread_rng;
use tokio::sync::Mutex;
use tracing::debug;

use super::ActivityStrategy;
use crate::bot::sampling::sample_point;
use crate::error::Result;
use crate::host::{Document, HostBridge};
use crate::session::ReversibleEdit;

/// Gradual pointer movement to a random on-screen target.
#[derive(Debug)]
pub struct PointerWander {
    steps: u32,
    step_delay: Duration,
    // Last target we moved to; the host contract has no position query.
    last_position: Mutex<Option<(u32, u32)>>,
}

impl PointerWander {
    /// Create a strategy with the given step count and inter-step delay.
    #[must_use]
    pub fn new(steps: u32, step_delay: Duration) -> Self {
        Self {
            steps: steps.max(1),
            step_delay,
            last_position: Mutex::new(None),
        }
    }

    fn interpolate(start: (u32, u32), target: (u32, u32), step: u32, steps: u32) -> (u32, u32) {
        if step >= steps {
            return target;
        }
        let lerp = |a: u32, b: u32| -> u32 {
            let a = i64::from(a);
            let b = i64::from(b);
            let v = a + (b - a) * i64::from(step) / i64::from(steps);
            u32::try_from(v).unwrap_or(0)
        };
        (lerp(start.0, target.0), lerp(start.1, target.1))
    }
}

#[async_trait]
impl ActivityStrategy for PointerWander {
    fn name(&self) -> &'static str {
        "pointer-wander"
    }

    async fn perform(
        &self,
        host: &dyn HostBridge,
        _document: &mut Document,
    ) -> Result<Option<ReversibleEdit>> {
        let bounds = host.display_bounds().await?;
        let target = sample_point(&mut thread_rng(), bounds);

        let mut last = self.last_position.lock().await;
        let start = last.unwrap_or_else(|| bounds.center());
        debug!(
            "pointer wandering from ({}, {}) to ({}, {}) in {} steps",
            start.0, start.1, target.0, target.1, self.steps
        );

        // The final step lands exactly on the target.
        for step in 1..=self.steps {
            let (x, y) = Self::interpolate(start, target, step, self.steps);
            host.move_pointer(x, y).await?;
            if step < self.steps {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        *last = Some(target);
        Ok(None)
    }
}
