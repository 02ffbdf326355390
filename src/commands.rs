//! Command dispatch table.
//!
//! An explicit registry mapping command name to async handler, replacing
//! the host editor's callback registration. Commands are registered once
//! at initialization; each registration returns a guard that unregisters
//! the command when dropped, so shutdown cannot leak handlers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tracing::debug;

use crate::error::{LoiterError, Result};

/// An async command handler taking an optional string argument.
pub type CommandHandler =
    Arc<dyn Fn(Option<String>) -> BoxFuture<'static, Result<()>> + Send + Sync>;

type HandlerMap = Arc<Mutex<HashMap<String, CommandHandler>>>;

/// Registry of user-invocable commands.
///
/// Cloning is cheap; clones share the same handler table.
///
/// # Example
///
/// ```rust,ignore
/// let registry = CommandRegistry::new();
/// let _guard = registry
///     .register("bot.stop", Arc::new(|_| Box::pin(async { Ok(()) })))?;
/// registry.dispatch("bot.stop", None).await?;
/// ```
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: HandlerMap,
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.handlers.lock().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("CommandRegistry")
            .field("registered", &count)
            .finish()
    }
}

impl CommandRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under `name`.
    ///
    /// Returns a [`CommandGuard`] that unregisters the command on drop.
    ///
    /// # Errors
    ///
    /// Returns [`LoiterError::InvalidInput`] if the name is already taken.
    pub fn register(&self, name: &str, handler: CommandHandler) -> Result<CommandGuard> {
        let mut handlers = self.handlers.lock().expect("registry lock");
        if handlers.contains_key(name) {
            return Err(LoiterError::invalid_input(format!(
                "command '{name}' is already registered"
            )));
        }
        handlers.insert(name.to_string(), handler);
        debug!("registered command '{name}'");
        Ok(CommandGuard {
            name: name.to_string(),
            handlers: Arc::clone(&self.handlers),
        })
    }

    /// Remove a handler by name. Returns true if one was present.
    pub fn unregister(&self, name: &str) -> bool {
        self.handlers
            .lock()
            .expect("registry lock")
            .remove(name)
            .is_some()
    }

    /// Whether a command is currently registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers
            .lock()
            .expect("registry lock")
            .contains_key(name)
    }

    /// Invoke the handler registered under `name`.
    ///
    /// The handler is cloned out of the table before invocation, so a
    /// long-running command never holds the registry lock.
    ///
    /// # Errors
    ///
    /// Returns [`LoiterError::InvalidInput`] for an unknown command, or
    /// whatever the handler itself returns.
    pub async fn dispatch(&self, name: &str, arg: Option<String>) -> Result<()> {
        let handler = {
            let handlers = self.handlers.lock().expect("registry lock");
            handlers.get(name).cloned()
        };
        let handler = handler.ok_or_else(|| {
            LoiterError::invalid_input(format!("unknown command '{name}'"))
        })?;
        debug!("dispatching command '{name}'");
        handler(arg).await
    }
}

/// Scoped registration: unregisters its command when dropped.
pub struct CommandGuard {
    name: String,
    handlers: HandlerMap,
}

impl CommandGuard {
    /// Name of the guarded command.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for CommandGuard {
    fn drop(&mut self) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.remove(&self.name);
            debug!("unregistered command '{}'", self.name);
        }
    }
}

impl std::fmt::Debug for CommandGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandGuard")
            .field("name", &self.name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_handler(counter: Arc<AtomicU32>) -> CommandHandler {
        Arc::new(move |_arg| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
        })
    }

    #[tokio::test]
    async fn test_register_and_dispatch() {
        let registry = CommandRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        let _guard = registry
            .register("bot.start", counting_handler(Arc::clone(&calls)))
            .unwrap();

        registry.dispatch("bot.start", None).await.unwrap();
        registry
            .dispatch("bot.start", Some("src/a.txt".to_string()))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_command() {
        let registry = CommandRegistry::new();
        let err = registry.dispatch("bot.start", None).await.unwrap_err();
        assert!(matches!(err, LoiterError::InvalidInput { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let registry = CommandRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        let _guard = registry
            .register("bot.stop", counting_handler(Arc::clone(&calls)))
            .unwrap();
        assert!(registry
            .register("bot.stop", counting_handler(calls))
            .is_err());
    }

    #[tokio::test]
    async fn test_guard_unregisters_on_drop() {
        let registry = CommandRegistry::new();
        let calls = Arc::new(AtomicU32::new(0));
        {
            let _guard = registry
                .register("bot.start", counting_handler(Arc::clone(&calls)))
                .unwrap();
            assert!(registry.contains("bot.start"));
        }
        assert!(!registry.contains("bot.start"));
        assert!(registry.dispatch("bot.start", None).await.is_err());
    }

    #[tokio::test]
    async fn test_handler_argument_is_forwarded() {
        let registry = CommandRegistry::new();
        let seen: Arc<Mutex<Option<String>>> = Arc::new(Mutex::new(None));
        let seen_clone = Arc::clone(&seen);
        let _guard = registry
            .register(
                "bot.start",
                Arc::new(move |arg| {
                    let seen = Arc::clone(&seen_clone);
                    Box::pin(async move {
                        *seen.lock().expect("test lock") = arg;
                        Ok(())
                    })
                }),
            )
            .unwrap();

        registry
            .dispatch("bot.start", Some("a.txt".to_string()))
            .await
            .unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("a.txt"));
    }
}
