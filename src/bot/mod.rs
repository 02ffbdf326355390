//! The randomized loop controller.
//!
//! [`BotController`] owns the [`Session`] and runs the presence loop as one
//! detached tokio task: sleep a random interval, swap the focused document
//! to a random candidate, run the configured activity strategies, repeat
//! until stopped. Cancellation is cooperative and polled only at the
//! designated check-points (after waking from sleep, before an iteration);
//! an iteration past the check-point runs to completion.
//!
//! Cleanup (revert the pending edit, reset the session, publish idle flags)
//! runs exactly once on every exit path, whether the loop was stopped,
//! errored, or exhausted its corpus.

pub mod sampling;

use std::path::Path;
use std::sync::Arc;

use rand::thread_rng;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::BotConfig;
use crate::error::{LoiterError, Result};
use crate::host::HostBridge;
use crate::session::{ContextFlags, Session};
use crate::strategy::{strategies_for, ActivityStrategy};

/// Consecutive failed iterations after which the corpus is considered
/// unusable and the loop exits on its own.
pub(crate) const MAX_CONSECUTIVE_FAILURES: u32 = 5;

struct RunHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Controller for one presence-simulation session.
///
/// # Example
///
/// ```rust,ignore
/// use loiter::bot::BotController;
/// use loiter::config::BotConfig;
/// use loiter::host::LocalHost;
/// use std::sync::Arc;
///
/// let host = Arc::new(LocalHost::new(".".into()));
/// let bot = BotController::new(BotConfig::default(), host)?;
/// bot.start(Some("src/main.rs".as_ref())).await?;
/// // ... later
/// bot.stop().await?;
/// ```
pub struct BotController {
    config: BotConfig,
    host: Arc<dyn HostBridge>,
    strategies: Vec<Arc<dyn ActivityStrategy>>,
    session: Arc<Mutex<Session>>,
    flags_tx: watch::Sender<ContextFlags>,
    run: Mutex<Option<RunHandle>>,
}

impl BotController {
    /// Create a controller with the strategy set selected by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`LoiterError::InvalidConfig`] if the configuration fails
    /// validation.
    pub fn new(config: BotConfig, host: Arc<dyn HostBridge>) -> Result<Self> {
        config.validate()?;
        let strategies = strategies_for(&config);
        let (flags_tx, _) = watch::channel(ContextFlags::idle());
        Ok(Self {
            config,
            host,
            strategies,
            session: Arc::new(Mutex::new(Session::new())),
            flags_tx,
            run: Mutex::new(None),
        })
    }

    /// Subscribe to observable state flags.
    ///
    /// The channel carries a new value on every start/stop/reset
    /// transition, for conditional UI enablement.
    #[must_use]
    pub fn flags(&self) -> watch::Receiver<ContextFlags> {
        self.flags_tx.subscribe()
    }

    /// Whether a loop task is currently scheduled or running.
    pub async fn is_active(&self) -> bool {
        self.session.lock().await.active
    }

    /// Identifier of the controller's session, stable across runs.
    pub async fn session_id(&self) -> String {
        self.session.lock().await.session_id.clone()
    }

    /// Start the presence loop for files sharing `hint`'s extension.
    ///
    /// Returns as soon as the loop task is spawned; the loop itself runs
    /// detached until [`stop`](Self::stop) or an unrecoverable error.
    ///
    /// # Errors
    ///
    /// - [`LoiterError::AlreadyRunning`] while a session is active (no
    ///   state change).
    /// - [`LoiterError::InvalidInput`] when the hint is missing or has no
    ///   extension (no state change).
    /// - [`LoiterError::NoMatchingFiles`] when enumeration comes back
    ///   empty (session reset to idle).
    /// - [`LoiterError::HostOperationFailed`] when enumeration itself
    ///   fails (session reset to idle).
    pub async fn start(&self, hint: Option<&Path>) -> Result<()> {
        let hint = hint.ok_or_else(|| {
            LoiterError::invalid_input("select a file to start the bot")
        })?;
        let extension = hint
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                LoiterError::invalid_input(format!(
                    "{} has no file extension",
                    hint.display()
                ))
            })?
            .to_string();

        // The session lock serializes start against stop and against the
        // loop's own check-points; a concurrent start sees `active` and is
        // rejected rather than queued.
        let mut session = self.session.lock().await;
        if session.active {
            return Err(LoiterError::AlreadyRunning);
        }

        let pattern = format!("**/*.{extension}");
        let candidates = match self.host.find_files(&pattern).await {
            Ok(files) => files,
            Err(e) => {
                session.reset();
                self.flags_tx.send_replace(session.flags());
                return Err(e);
            }
        };
        if candidates.is_empty() {
            session.reset();
            self.flags_tx.send_replace(session.flags());
            return Err(LoiterError::NoMatchingFiles { pattern });
        }

        info!(
            "Bot started for extension .{} ({} candidate file(s), session {})",
            extension,
            candidates.len(),
            session.session_id
        );
        session.begin(extension, candidates);
        self.flags_tx.send_replace(session.flags());

        // Install the run handle before releasing the session lock, so a
        // concurrent stop() can never observe `active` without a handle to
        // cancel. Lock order is session -> run here and in stop().
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run_loop(
            self.config.clone(),
            Arc::clone(&self.host),
            self.strategies.clone(),
            Arc::clone(&self.session),
            self.flags_tx.clone(),
            cancel.clone(),
        ));
        *self.run.lock().await = Some(RunHandle { cancel, task });
        Ok(())
    }

    /// Signal the loop to stop and wait for its cleanup to finish.
    ///
    /// Idempotent and always safe to call. Any pending reversible edit is
    /// resolved (reverted or skipped) before this returns.
    ///
    /// # Errors
    ///
    /// Returns [`LoiterError::NotRunning`] as a non-fatal notice when the
    /// bot was already idle.
    pub async fn stop(&self) -> Result<()> {
        // Lock order session -> run, matching start(): an active session
        // is never observed without its handle already installed.
        let (was_active, handle) = {
            let session = self.session.lock().await;
            let mut run = self.run.lock().await;
            (session.active, run.take())
        };
        match handle {
            Some(handle) => {
                handle.cancel.cancel();
                if let Err(e) = handle.task.await {
                    warn!("loop task ended abnormally: {e}");
                }
                if was_active {
                    info!("Bot stopped");
                    Ok(())
                } else {
                    // The loop already exited on its own; the handle was
                    // only left to reap.
                    Err(LoiterError::NotRunning)
                }
            }
            // A concurrent stop() took the handle; wait for its cleanup so
            // the pending edit is resolved before this call returns too.
            None if was_active => {
                let mut flags = self.flags_tx.subscribe();
                while flags.borrow_and_update().running {
                    if flags.changed().await.is_err() {
                        break;
                    }
                }
                info!("Bot stopped");
                Ok(())
            }
            None => Err(LoiterError::NotRunning),
        }
    }
}

/// The detached loop task. Owns no lock for longer than one check-point.
async fn run_loop(
    config: BotConfig,
    host: Arc<dyn HostBridge>,
    strategies: Vec<Arc<dyn ActivityStrategy>>,
    session: Arc<Mutex<Session>>,
    flags_tx: watch::Sender<ContextFlags>,
    cancel: CancellationToken,
) {
    let mut consecutive_failures = 0u32;

    loop {
        let delay = {
            let mut rng = thread_rng();
            sampling::sample_delay(&mut rng, config.delay_min_ms, config.delay_max_ms)
        };
        debug!("sleeping {}ms before next iteration", delay.as_millis());

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
        // Cancellation check-point after waking.
        if cancel.is_cancelled() {
            break;
        }

        match run_iteration(host.as_ref(), &strategies, &session).await {
            Ok(()) => consecutive_failures = 0,
            Err(e) => {
                warn!("iteration failed: {e}");
                consecutive_failures += 1;
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    warn!(
                        "{} consecutive failures, file corpus unusable; stopping",
                        consecutive_failures
                    );
                    break;
                }
            }
        }
    }

    // Single cleanup path for stop, error, and exhaustion alike.
    let mut session = session.lock().await;
    if let Some(undo) = session.take_undo() {
        match undo.revert(host.as_ref()).await {
            Ok(true) => debug!("pending edit reverted"),
            Ok(false) => debug!("pending edit skipped, document changed externally"),
            Err(e) => warn!("failed to revert pending edit: {e}"),
        }
    }
    if let Some(started_at) = session.started_at {
        let elapsed = chrono::Utc::now().signed_duration_since(started_at);
        info!(
            "session {} ran for {}s",
            session.session_id,
            elapsed.num_seconds()
        );
    }
    session.reset();
    flags_tx.send_replace(session.flags());
    info!("presence loop exited");
}

/// One iteration: close the focused document, focus a random candidate,
/// run the strategies. Strategy failures are isolated; an open failure
/// aborts only this iteration.
async fn run_iteration(
    host: &dyn HostBridge,
    strategies: &[Arc<dyn ActivityStrategy>],
    session: &Arc<Mutex<Session>>,
) -> Result<()> {
    if let Err(e) = host.close_focused().await {
        warn!("closeFocused failed: {e}");
    }

    let path = {
        let session = session.lock().await;
        let mut rng = thread_rng();
        let idx = sampling::sample_index(&mut rng, session.candidates.len());
        session.candidates[idx].clone()
    };

    let mut document = host.open_and_focus(&path).await?;
    for strategy in strategies {
        match strategy.perform(host, &mut document).await {
            Ok(Some(edit)) => {
                // At most one reversal stays outstanding.
                if let Some(displaced) = session.lock().await.record_undo(edit) {
                    debug!(
                        "displaced pending edit for {}",
                        displaced.path().display()
                    );
                }
            }
            Ok(None) => {}
            Err(e) => warn!("strategy '{}' failed: {e}", strategy.name()),
        }
    }
    Ok(())
}
