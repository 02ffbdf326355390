//! Host bridge abstraction.
//!
//! The loop controller never talks to an editor or OS directly; everything
//! goes through [`HostBridge`]. This keeps the controller testable with
//! mocks and lets real editor/pointer drivers plug in behind one trait.

pub mod local;

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

pub use local::LocalHost;

/// Pixel dimensions of the primary display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayBounds {
    pub width: u32,
    pub height: u32,
}

impl DisplayBounds {
    /// Create bounds from width and height in pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The center point, used as the pointer's starting position.
    #[must_use]
    pub fn center(&self) -> (u32, u32) {
        (self.width / 2, self.height / 2)
    }
}

/// An open, focused document.
///
/// Holds the full text in memory; mutations go through the helpers below
/// and are persisted via [`HostBridge::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    path: PathBuf,
    text: String,
}

impl Document {
    /// Create a document from a path and its text content.
    #[must_use]
    pub fn new(path: PathBuf, text: String) -> Self {
        Self { path, text }
    }

    /// Path of the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full text content.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// First line of the document, or empty string for an empty document.
    #[must_use]
    pub fn first_line(&self) -> &str {
        self.text.lines().next().unwrap_or("")
    }

    /// Check whether the first line is empty.
    ///
    /// This is the guard the reversible edit uses both before inserting
    /// (skip documents that already start blank) and before reverting
    /// (skip documents the user touched in the meantime).
    #[must_use]
    pub fn first_line_is_empty(&self) -> bool {
        self.first_line().is_empty()
    }

    /// Insert a single blank line at the very top of the document.
    pub fn insert_blank_first_line(&mut self) {
        self.text.insert(0, '\n');
    }

    /// Remove a leading blank line, if present.
    ///
    /// Returns true if a line was removed. No-op when the first line is
    /// non-empty, so calling this on an untouched document is safe.
    pub fn remove_blank_first_line(&mut self) -> bool {
        if self.text.starts_with('\n') {
            self.text.remove(0);
            true
        } else {
            false
        }
    }
}

/// The external editor/OS surface the loop controller depends on.
///
/// Mirrors the host editor's integration surface: file search,
/// document open/close/save, display query, pointer move. Every call may
/// suspend and every call may fail; the controller treats each failure as
/// recoverable and keeps its session coherent regardless.
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Enumerate workspace files matching a glob pattern like `**/*.rs`.
    async fn find_files(&self, pattern: &str) -> Result<Vec<PathBuf>>;

    /// Open a file and make it the focused document.
    async fn open_and_focus(&self, path: &Path) -> Result<Document>;

    /// Close whatever document is currently focused.
    ///
    /// Closing when nothing is focused is not an error.
    async fn close_focused(&self) -> Result<()>;

    /// Persist a document's current text.
    async fn save(&self, document: &Document) -> Result<()>;

    /// Query the primary display's dimensions.
    async fn display_bounds(&self) -> Result<DisplayBounds>;

    /// Move the pointer to an absolute position.
    async fn move_pointer(&self, x: u32, y: u32) -> Result<()>;
}
