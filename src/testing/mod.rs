//! Testing infrastructure.
//!
//! Provides a controllable [`MockHost`] so controller and strategy logic
//! can be tested without an editor, a display, or a real workspace.

mod mocks;

pub use mocks::MockHost;
