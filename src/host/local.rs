//! Filesystem-backed host bridge for the standalone binary.
//!
//! `LocalHost` is the bridge implementation shipped with the CLI: files are
//! enumerated by walking the workspace, "focus" is a tracked path, and the
//! pointer is a virtual position logged through tracing. Editor and OS
//! pointer drivers are expected to provide their own [`HostBridge`] impl.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use globset::GlobBuilder;
use ignore::WalkBuilder;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::{DisplayBounds, Document, HostBridge};
use crate::error::{LoiterError, Result};

/// Default virtual display size when no real display is queried.
const DEFAULT_BOUNDS: DisplayBounds = DisplayBounds {
    width: 1920,
    height: 1080,
};

/// Host bridge operating directly on the local filesystem.
#[derive(Debug)]
pub struct LocalHost {
    root: PathBuf,
    bounds: DisplayBounds,
    focused: Mutex<Option<PathBuf>>,
    pointer: Mutex<(u32, u32)>,
}

impl LocalHost {
    /// Create a host rooted at the given workspace directory.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self::with_bounds(root, DEFAULT_BOUNDS)
    }

    /// Create a host with explicit display bounds.
    #[must_use]
    pub fn with_bounds(root: PathBuf, bounds: DisplayBounds) -> Self {
        let pointer = bounds.center();
        Self {
            root,
            bounds,
            focused: Mutex::new(None),
            pointer: Mutex::new(pointer),
        }
    }

    /// The workspace root this host walks.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Currently focused path, if any.
    pub async fn focused(&self) -> Option<PathBuf> {
        self.focused.lock().await.clone()
    }

    /// Current virtual pointer position.
    pub async fn pointer_position(&self) -> (u32, u32) {
        *self.pointer.lock().await
    }
}

#[async_trait]
impl HostBridge for LocalHost {
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| LoiterError::host("findFiles", e.to_string()))?
            .compile_matcher();

        // The walk respects .gitignore, same as the editor's file search.
        let mut matches = Vec::new();
        for entry in WalkBuilder::new(&self.root).hidden(true).build() {
            let entry = entry.map_err(|e| LoiterError::host("findFiles", e.to_string()))?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .unwrap_or_else(|_| entry.path());
            if glob.is_match(relative) {
                matches.push(entry.path().to_path_buf());
            }
        }
        matches.sort();

        debug!("findFiles({}) matched {} file(s)", pattern, matches.len());
        Ok(matches)
    }

    async fn open_and_focus(&self, path: &Path) -> Result<Document> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LoiterError::host("openAndFocus", e.to_string()))?;
        *self.focused.lock().await = Some(path.to_path_buf());
        debug!("focused {}", path.display());
        Ok(Document::new(path.to_path_buf(), text))
    }

    async fn close_focused(&self) -> Result<()> {
        if let Some(path) = self.focused.lock().await.take() {
            debug!("closed {}", path.display());
        }
        Ok(())
    }

    async fn save(&self, document: &Document) -> Result<()> {
        tokio::fs::write(document.path(), document.text())
            .await
            .map_err(|e| LoiterError::host("save", e.to_string()))
    }

    async fn display_bounds(&self) -> Result<DisplayBounds> {
        Ok(self.bounds)
    }

    async fn move_pointer(&self, x: u32, y: u32) -> Result<()> {
        *self.pointer.lock().await = (x, y);
        trace!("pointer -> ({}, {})", x, y);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn workspace_with(files: &[(&str, &str)]) -> TempDir {
        let temp = TempDir::new().unwrap();
        for (name, content) in files {
            let path = temp.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        temp
    }

    #[tokio::test]
    async fn test_find_files_by_extension() {
        let temp = workspace_with(&[
            ("a.txt", "a"),
            ("nested/b.txt", "b"),
            ("c.rs", "fn main() {}"),
        ]);
        let host = LocalHost::new(temp.path().to_path_buf());

        let found = host.find_files("**/*.txt").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "txt"));
    }

    #[tokio::test]
    async fn test_find_files_empty_workspace() {
        let temp = TempDir::new().unwrap();
        let host = LocalHost::new(temp.path().to_path_buf());
        let found = host.find_files("**/*.py").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_open_focus_close() {
        let temp = workspace_with(&[("a.txt", "hello\n")]);
        let host = LocalHost::new(temp.path().to_path_buf());
        let path = temp.path().join("a.txt");

        let doc = host.open_and_focus(&path).await.unwrap();
        assert_eq!(doc.text(), "hello\n");
        assert_eq!(host.focused().await, Some(path));

        host.close_focused().await.unwrap();
        assert_eq!(host.focused().await, None);

        // Closing with nothing focused is fine
        host.close_focused().await.unwrap();
    }

    #[tokio::test]
    async fn test_open_missing_file_is_host_error() {
        let temp = TempDir::new().unwrap();
        let host = LocalHost::new(temp.path().to_path_buf());
        let err = host
            .open_and_focus(&temp.path().join("gone.txt"))
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_save_roundtrip() {
        let temp = workspace_with(&[("a.txt", "hello\n")]);
        let host = LocalHost::new(temp.path().to_path_buf());
        let path = temp.path().join("a.txt");

        let mut doc = host.open_and_focus(&path).await.unwrap();
        doc.insert_blank_first_line();
        host.save(&doc).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\nhello\n");
    }

    #[tokio::test]
    async fn test_pointer_tracking() {
        let temp = TempDir::new().unwrap();
        let host =
            LocalHost::with_bounds(temp.path().to_path_buf(), DisplayBounds::new(800, 600));
        assert_eq!(host.pointer_position().await, (400, 300));

        host.move_pointer(13, 37).await.unwrap();
        assert_eq!(host.pointer_position().await, (13, 37));
    }
}
