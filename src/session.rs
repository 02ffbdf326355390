//! Session state for one bot run.
//!
//! Exactly one [`Session`] exists per controller. It is created idle,
//! mutated only by the controller's start/stop/iterate paths, and reset to
//! idle on stop or unrecoverable error.
//!
//! # Invariants
//!
//! - `active` is true iff the loop task is scheduled or running.
//! - `candidates` is non-empty whenever `active` is true.
//! - At most one `pending_undo` is outstanding at a time; recording a new
//!   one consumes the previous.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::host::HostBridge;

/// Observable state flags, published on every start/stop/reset transition.
///
/// Intended for conditional UI enablement: a host surface can disable its
/// "start" entry while `running` is true and show the active filter.
///
/// # Example
///
/// ```
/// use loiter::session::ContextFlags;
///
/// let flags = ContextFlags::idle();
/// assert!(!flags.running);
/// assert!(flags.extension.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    /// Whether the loop is currently running.
    pub running: bool,
    /// The active file-extension filter, or None when idle.
    pub extension: Option<String>,
}

impl ContextFlags {
    /// Flags for the idle state.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Flags for a running session with the given extension filter.
    #[must_use]
    pub fn running(extension: &str) -> Self {
        Self {
            running: true,
            extension: Some(extension.to_string()),
        }
    }
}

/// A recorded reversal for one blank-line insertion.
///
/// Owned exclusively by the session until consumed or cleared. The reversal
/// only applies if the target document still starts with an empty line;
/// anything else means the user touched the file and we must not undo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReversibleEdit {
    path: PathBuf,
}

impl ReversibleEdit {
    /// Record a reversal for the document at `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the edited document.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Execute the reversal, best-effort.
    ///
    /// Returns true if the inserted line was removed, false if the document
    /// no longer matched the expected state and the reversal was skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the host bridge fails to open or save the
    /// document. Callers treat this as non-fatal.
    pub async fn revert(&self, host: &dyn HostBridge) -> Result<bool> {
        let mut doc = host.open_and_focus(&self.path).await?;
        if !doc.first_line_is_empty() {
            warn!(
                "skipping revert of {}: first line no longer empty",
                self.path.display()
            );
            return Ok(false);
        }
        doc.remove_blank_first_line();
        host.save(&doc).await?;
        debug!("reverted blank line in {}", self.path.display());
        Ok(true)
    }
}

/// State of one bot run.
#[derive(Debug)]
pub struct Session {
    /// Whether the loop task is scheduled or running.
    pub active: bool,
    /// The file-extension filter derived from the start hint (without dot).
    pub extension: Option<String>,
    /// Candidate files for this run, fixed at start.
    pub candidates: Vec<PathBuf>,
    /// At most one outstanding reversible edit.
    pub pending_undo: Option<ReversibleEdit>,
    /// Unique identifier for this session.
    pub session_id: String,
    /// When the current run started, if any.
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create an idle session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: false,
            extension: None,
            candidates: Vec::new(),
            pending_undo: None,
            session_id: Uuid::new_v4().to_string(),
            started_at: None,
        }
    }

    /// Mark the session active for a run over `candidates`.
    pub fn begin(&mut self, extension: String, candidates: Vec<PathBuf>) {
        debug_assert!(!candidates.is_empty());
        self.active = true;
        self.extension = Some(extension);
        self.candidates = candidates;
        self.started_at = Some(Utc::now());
    }

    /// Record a new reversible edit, consuming any previous one.
    ///
    /// Returns the displaced edit so the caller can decide whether to log
    /// it; the invariant is at most one outstanding reversal.
    pub fn record_undo(&mut self, edit: ReversibleEdit) -> Option<ReversibleEdit> {
        self.pending_undo.replace(edit)
    }

    /// Take the pending reversal, leaving none outstanding.
    pub fn take_undo(&mut self) -> Option<ReversibleEdit> {
        self.pending_undo.take()
    }

    /// Reset to idle: clear flag, filter, candidates, and pending undo.
    pub fn reset(&mut self) {
        self.active = false;
        self.extension = None;
        self.candidates.clear();
        self.pending_undo = None;
        self.started_at = None;
    }

    /// Current observable flags for this session.
    #[must_use]
    pub fn flags(&self) -> ContextFlags {
        ContextFlags {
            running: self.active,
            extension: self.extension.clone(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert!(!session.active);
        assert!(session.extension.is_none());
        assert!(session.candidates.is_empty());
        assert!(session.pending_undo.is_none());
        assert!(session.started_at.is_none());
        assert!(!session.session_id.is_empty());
    }

    #[test]
    fn test_begin_sets_run_state() {
        let mut session = Session::new();
        session.begin("txt".to_string(), vec!["a.txt".into(), "b.txt".into()]);
        assert!(session.active);
        assert_eq!(session.extension.as_deref(), Some("txt"));
        assert_eq!(session.candidates.len(), 2);
        assert!(session.started_at.is_some());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut session = Session::new();
        session.begin("rs".to_string(), vec!["lib.rs".into()]);
        session.record_undo(ReversibleEdit::new("lib.rs".into()));

        session.reset();
        assert!(!session.active);
        assert!(session.extension.is_none());
        assert!(session.candidates.is_empty());
        assert!(session.pending_undo.is_none());
    }

    #[test]
    fn test_at_most_one_pending_undo() {
        let mut session = Session::new();
        assert!(session.record_undo(ReversibleEdit::new("a.txt".into())).is_none());

        // Recording a second undo displaces the first
        let displaced = session.record_undo(ReversibleEdit::new("b.txt".into()));
        assert_eq!(displaced, Some(ReversibleEdit::new("a.txt".into())));
        assert_eq!(
            session.pending_undo,
            Some(ReversibleEdit::new("b.txt".into()))
        );

        let taken = session.take_undo();
        assert!(taken.is_some());
        assert!(session.pending_undo.is_none());
    }

    #[test]
    fn test_flags_reflect_session() {
        let mut session = Session::new();
        assert_eq!(session.flags(), ContextFlags::idle());

        session.begin("md".to_string(), vec!["README.md".into()]);
        assert_eq!(session.flags(), ContextFlags::running("md"));

        session.reset();
        assert_eq!(session.flags(), ContextFlags::idle());
    }

    #[test]
    fn test_context_flags_serialize() {
        let flags = ContextFlags::running("txt");
        let json = serde_json::to_string(&flags).unwrap();
        assert!(json.contains("\"running\":true"));
        assert!(json.contains("\"extension\":\"txt\""));
    }
}
