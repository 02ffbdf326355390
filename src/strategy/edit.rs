//! Reversible blank-line edit strategy.
//!
//! Inserts a single blank line at the top of the focused document and
//! saves it, handing the controller a [`ReversibleEdit`] so the change can
//! be undone on stop. The revert is guarded: it only runs while the first
//! line is still empty, so user edits made in the meantime are never
//! clobbered.

use async_trait::async_trait;
use tracing::debug;

use super::ActivityStrategy;
use crate::error::Result;
use crate::host::{Document, HostBridge};
use crate::session::ReversibleEdit;

/// Reversible one-line mutation of the focused document.
#[derive(Debug, Default)]
pub struct BlankLineEdit;

impl BlankLineEdit {
    /// Create the edit strategy.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ActivityStrategy for BlankLineEdit {
    fn name(&self) -> &'static str {
        "blank-line-edit"
    }

    async fn perform(
        &self,
        host: &dyn HostBridge,
        document: &mut Document,
    ) -> Result<Option<ReversibleEdit>> {
        // Already starts blank: inserting again would stack lines the
        // reversal cannot account for.
        if document.first_line_is_empty() {
            debug!(
                "skipping edit of {}: first line already empty",
                document.path().display()
            );
            return Ok(None);
        }

        document.insert_blank_first_line();
        host.save(document).await?;
        debug!("inserted blank line in {}", document.path().display());
        Ok(Some(ReversibleEdit::new(document.path().to_path_buf())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockHost;

    #[tokio::test]
    async fn test_inserts_and_records_reversal() {
        let host = MockHost::new();
        let strategy = BlankLineEdit::new();
        let mut doc = Document::new("a.txt".into(), "hello\n".to_string());

        let edit = strategy.perform(&host, &mut doc).await.unwrap();
        assert_eq!(doc.text(), "\nhello\n");
        let edit = edit.expect("edit should be recorded");
        assert_eq!(edit.path(), std::path::Path::new("a.txt"));
        assert_eq!(host.saved_text("a.txt"), Some("\nhello\n".to_string()));
    }

    #[tokio::test]
    async fn test_skips_already_blank_document() {
        let host = MockHost::new();
        let strategy = BlankLineEdit::new();
        let mut doc = Document::new("a.txt".into(), "\nhello\n".to_string());

        let edit = strategy.perform(&host, &mut doc).await.unwrap();
        assert!(edit.is_none());
        assert_eq!(doc.text(), "\nhello\n");
        assert_eq!(host.save_count(), 0);
    }

    #[tokio::test]
    async fn test_save_failure_is_recoverable() {
        let host = MockHost::new().with_save_error("read-only filesystem");
        let strategy = BlankLineEdit::new();
        let mut doc = Document::new("a.txt".into(), "hello\n".to_string());

        let err = strategy.perform(&host, &mut doc).await.unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_insert_then_revert_restores_content() {
        let host = MockHost::new().with_file("a.txt", "hello\nworld\n");
        let strategy = BlankLineEdit::new();
        let mut doc = host
            .open_and_focus(std::path::Path::new("a.txt"))
            .await
            .unwrap();

        let edit = strategy.perform(&host, &mut doc).await.unwrap().unwrap();
        assert_eq!(host.saved_text("a.txt"), Some("\nhello\nworld\n".to_string()));

        let reverted = edit.revert(&host).await.unwrap();
        assert!(reverted);
        assert_eq!(host.saved_text("a.txt"), Some("hello\nworld\n".to_string()));
    }

    #[tokio::test]
    async fn test_revert_skipped_after_external_mutation() {
        let host = MockHost::new().with_file("a.txt", "hello\n");
        let strategy = BlankLineEdit::new();
        let mut doc = host
            .open_and_focus(std::path::Path::new("a.txt"))
            .await
            .unwrap();
        let edit = strategy.perform(&host, &mut doc).await.unwrap().unwrap();

        // Someone typed over the inserted blank line
        host.overwrite_file("a.txt", "user edit\nhello\n");

        let reverted = edit.revert(&host).await.unwrap();
        assert!(!reverted);
        assert_eq!(host.saved_text("a.txt"), Some("user edit\nhello\n".to_string()));
    }
}
