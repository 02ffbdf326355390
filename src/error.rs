//! Custom error types for Loiter.
//!
//! This module provides structured error types that separate user-facing
//! notices (start while running, stop while idle) from failures that
//! matter to the loop controller.

use thiserror::Error;

/// Main error type for Loiter operations
#[derive(Error, Debug)]
pub enum LoiterError {
    // =========================================================================
    // Session Lifecycle Errors
    // =========================================================================
    /// Start called while a session is already active
    #[error("Bot is already running")]
    AlreadyRunning,

    /// Stop called while no session is active
    #[error("Bot is not running")]
    NotRunning,

    /// Start called without a usable file hint
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Workspace enumeration matched nothing
    #[error("No files found matching {pattern}")]
    NoMatchingFiles { pattern: String },

    // =========================================================================
    // Host Bridge Errors
    // =========================================================================
    /// A host bridge call failed
    #[error("Host operation '{operation}' failed: {message}")]
    HostOperationFailed { operation: String, message: String },

    // =========================================================================
    // Strategy Errors
    // =========================================================================
    /// An activity strategy failed during one iteration
    #[error("Strategy '{name}' failed: {message}")]
    Strategy { name: String, message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig { field: String, reason: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LoiterError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create an invalid-input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a host operation error
    pub fn host(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HostOperationFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a strategy error
    pub fn strategy(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Strategy {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if this error is a user-facing notice that leaves state unchanged
    pub fn is_notice(&self) -> bool {
        matches!(
            self,
            Self::AlreadyRunning | Self::NotRunning | Self::InvalidInput { .. }
        )
    }

    /// Check if this error is recoverable inside the iteration loop
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::HostOperationFailed { .. } | Self::Strategy { .. }
        )
    }

    /// Get error code for exit status
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::AlreadyRunning | Self::NotRunning | Self::InvalidInput { .. } => 0,
            Self::InvalidConfig { .. } => 7,
            Self::NoMatchingFiles { .. } => 3,
            _ => 1,
        }
    }
}

/// Type alias for Loiter results
pub type Result<T> = std::result::Result<T, LoiterError>;
