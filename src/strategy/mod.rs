//! Activity strategies.
//!
//! Each strategy is one self-contained "simulated activity" behavior,
//! executed once per loop iteration against the freshly focused document.
//! Strategies are interchangeable behind [`ActivityStrategy`] and selected
//! at controller construction time; a failing strategy never stops the
//! outer loop.

mod edit;
mod pointer;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::BotConfig;
use crate::error::Result;
use crate::host::{Document, HostBridge};
use crate::session::ReversibleEdit;

pub use edit::BlankLineEdit;
pub use pointer::PointerWander;

/// One simulated-activity behavior.
#[async_trait]
pub trait ActivityStrategy: Send + Sync {
    /// Stable name used in logs and error reports.
    fn name(&self) -> &'static str;

    /// Perform the activity against the focused document.
    ///
    /// May return a [`ReversibleEdit`] for the controller to record; the
    /// controller guarantees at most one is outstanding at a time.
    async fn perform(
        &self,
        host: &dyn HostBridge,
        document: &mut Document,
    ) -> Result<Option<ReversibleEdit>>;
}

/// Build the strategy set selected by the configuration.
///
/// Pointer movement is always on; the reversible blank-line edit is opt-in.
#[must_use]
pub fn strategies_for(config: &BotConfig) -> Vec<Arc<dyn ActivityStrategy>> {
    let mut strategies: Vec<Arc<dyn ActivityStrategy>> = vec![Arc::new(PointerWander::new(
        config.pointer_steps,
        config.pointer_step_delay(),
    ))];
    if config.edit_enabled {
        strategies.push(Arc::new(BlankLineEdit::new()));
    }
    strategies
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_is_pointer_only() {
        let config = BotConfig::default();
        let strategies = strategies_for(&config);
        assert_eq!(strategies.len(), 1);
        assert_eq!(strategies[0].name(), "pointer-wander");
    }

    #[test]
    fn test_edit_strategy_is_opt_in() {
        let config = BotConfig::default().with_edit_enabled(true);
        let strategies = strategies_for(&config);
        assert_eq!(strategies.len(), 2);
        assert_eq!(strategies[1].name(), "blank-line-edit");
    }
}
