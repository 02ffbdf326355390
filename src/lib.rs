//! Loiter - presence simulation bot.
//!
//! Keeps an idle workstation looking busy: a single background task
//! periodically focuses a randomly chosen workspace file and performs
//! configurable "activity" strategies (gradual pointer movement, and
//! optionally a reversible blank-line edit that is undone on stop).
//!
//! # Architecture
//!
//! - [`bot`] - The randomized loop controller (start/stop, iteration task)
//! - [`session`] - Per-run state: active flag, extension filter,
//!   candidates, pending reversal, observable [`session::ContextFlags`]
//! - [`strategy`] - Interchangeable activity behaviors behind
//!   [`strategy::ActivityStrategy`]
//! - [`host`] - The [`host::HostBridge`] editor/OS seam plus the
//!   filesystem-backed [`host::LocalHost`]
//! - [`commands`] - Explicit command dispatch table for the two
//!   user-invocable commands
//! - [`config`] - Loop and strategy tunables
//! - [`error`] - Error taxonomy separating notices from failures
//! - [`testing`] - Mock host bridge for deterministic tests
//!
//! # Example
//!
//! ```rust,ignore
//! use loiter::{BotConfig, BotController, LocalHost};
//! use std::sync::Arc;
//!
//! let host = Arc::new(LocalHost::new(workspace));
//! let bot = BotController::new(BotConfig::default(), host)?;
//! bot.start(Some(hint.as_ref())).await?;
//! tokio::signal::ctrl_c().await?;
//! bot.stop().await?;
//! ```

pub mod bot;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod session;
pub mod strategy;
pub mod testing;

// Re-export commonly used types
pub use bot::BotController;
pub use commands::{CommandGuard, CommandHandler, CommandRegistry};
pub use config::BotConfig;
pub use error::{LoiterError, Result};
pub use host::{DisplayBounds, Document, HostBridge, LocalHost};
pub use session::{ContextFlags, ReversibleEdit, Session};
pub use strategy::{ActivityStrategy, BlankLineEdit, PointerWander};
pub use testing::MockHost;
