//! Mock host bridge.
//!
//! A controllable test double for [`HostBridge`]: in-memory files, scripted
//! failures per operation, atomic call counters, and a recorded pointer
//! trail for asserting animation behavior.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{LoiterError, Result};
use crate::host::{DisplayBounds, Document, HostBridge};

/// Mock implementation of the host bridge.
///
/// # Example
///
/// ```rust,ignore
/// let host = MockHost::new()
///     .with_file("a.txt", "hello\n")
///     .with_bounds(DisplayBounds::new(800, 600));
///
/// let found = host.find_files("**/*.txt").await.unwrap();
/// assert_eq!(found.len(), 1);
/// ```
#[derive(Debug)]
pub struct MockHost {
    files: Mutex<BTreeMap<PathBuf, String>>,
    bounds: DisplayBounds,
    find_error: Option<String>,
    open_error: Option<String>,
    save_error: Option<String>,
    bounds_error: Option<String>,
    move_error: Option<String>,
    focused: Mutex<Option<PathBuf>>,
    pointer_trail: Mutex<Vec<(u32, u32)>>,
    open_calls: AtomicU32,
    close_calls: AtomicU32,
    save_calls: AtomicU32,
    find_calls: AtomicU32,
}

impl Default for MockHost {
    fn default() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            bounds: DisplayBounds::new(1920, 1080),
            find_error: None,
            open_error: None,
            save_error: None,
            bounds_error: None,
            move_error: None,
            focused: Mutex::new(None),
            pointer_trail: Mutex::new(Vec::new()),
            open_calls: AtomicU32::new(0),
            close_calls: AtomicU32::new(0),
            save_calls: AtomicU32::new(0),
            find_calls: AtomicU32::new(0),
        }
    }
}

impl MockHost {
    /// Create a mock with no files and a 1920x1080 display.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a workspace file with the given content.
    #[must_use]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .expect("mock lock")
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    /// Set the display bounds.
    #[must_use]
    pub fn with_bounds(mut self, bounds: DisplayBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Make `find_files` fail with the given message.
    #[must_use]
    pub fn with_find_error(mut self, error: &str) -> Self {
        self.find_error = Some(error.to_string());
        self
    }

    /// Make `open_and_focus` fail with the given message.
    #[must_use]
    pub fn with_open_error(mut self, error: &str) -> Self {
        self.open_error = Some(error.to_string());
        self
    }

    /// Make `save` fail with the given message.
    #[must_use]
    pub fn with_save_error(mut self, error: &str) -> Self {
        self.save_error = Some(error.to_string());
        self
    }

    /// Make `display_bounds` fail with the given message.
    #[must_use]
    pub fn with_bounds_error(mut self, error: &str) -> Self {
        self.bounds_error = Some(error.to_string());
        self
    }

    /// Make `move_pointer` fail with the given message.
    #[must_use]
    pub fn with_move_error(mut self, error: &str) -> Self {
        self.move_error = Some(error.to_string());
        self
    }

    /// Replace a file's content out-of-band, simulating a user edit.
    pub fn overwrite_file(&self, path: &str, content: &str) {
        self.files
            .lock()
            .expect("mock lock")
            .insert(PathBuf::from(path), content.to_string());
    }

    /// Current content of a file, as last saved.
    #[must_use]
    pub fn saved_text(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .expect("mock lock")
            .get(Path::new(path))
            .cloned()
    }

    /// All pointer positions in move order.
    #[must_use]
    pub fn pointer_trail(&self) -> Vec<(u32, u32)> {
        self.pointer_trail.lock().expect("mock lock").clone()
    }

    /// Number of `open_and_focus` calls.
    #[must_use]
    pub fn open_count(&self) -> u32 {
        self.open_calls.load(Ordering::SeqCst)
    }

    /// Number of `close_focused` calls.
    #[must_use]
    pub fn close_count(&self) -> u32 {
        self.close_calls.load(Ordering::SeqCst)
    }

    /// Number of `save` calls.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        self.save_calls.load(Ordering::SeqCst)
    }

    /// Number of `find_files` calls.
    #[must_use]
    pub fn find_count(&self) -> u32 {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Currently focused path, if any.
    #[must_use]
    pub fn focused(&self) -> Option<PathBuf> {
        self.focused.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl HostBridge for MockHost {
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.find_error {
            return Err(LoiterError::host("findFiles", error));
        }
        let glob = globset::GlobBuilder::new(pattern)
            .literal_separator(false)
            .build()
            .map_err(|e| LoiterError::host("findFiles", e.to_string()))?
            .compile_matcher();
        Ok(self
            .files
            .lock()
            .expect("mock lock")
            .keys()
            .filter(|p| glob.is_match(p))
            .cloned()
            .collect())
    }

    async fn open_and_focus(&self, path: &Path) -> Result<Document> {
        self.open_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.open_error {
            return Err(LoiterError::host("openAndFocus", error));
        }
        let text = self
            .files
            .lock()
            .expect("mock lock")
            .get(path)
            .cloned()
            .ok_or_else(|| LoiterError::host("openAndFocus", "no such file"))?;
        *self.focused.lock().expect("mock lock") = Some(path.to_path_buf());
        Ok(Document::new(path.to_path_buf(), text))
    }

    async fn close_focused(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.focused.lock().expect("mock lock").take();
        Ok(())
    }

    async fn save(&self, document: &Document) -> Result<()> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = &self.save_error {
            return Err(LoiterError::host("save", error));
        }
        self.files
            .lock()
            .expect("mock lock")
            .insert(document.path().to_path_buf(), document.text().to_string());
        Ok(())
    }

    async fn display_bounds(&self) -> Result<DisplayBounds> {
        if let Some(error) = &self.bounds_error {
            return Err(LoiterError::host("queryDisplayBounds", error));
        }
        Ok(self.bounds)
    }

    async fn move_pointer(&self, x: u32, y: u32) -> Result<()> {
        if let Some(error) = &self.move_error {
            return Err(LoiterError::host("movePointer", error));
        }
        self.pointer_trail.lock().expect("mock lock").push((x, y));
        Ok(())
    }
}
