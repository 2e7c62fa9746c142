//! Centralized error handling for the metadata editor.
//!
//! Engine failures come in two flavours: a file could not be **loaded**
//! (missing, unreadable, not Parquet) or could not be **saved** (serialization
//! or write failure). Both carry the path and a human readable reason so the UI
//! can show them as a single message.
//!
//! ## Tagging lower-level errors
//!
//! The `ResultExt` trait turns any displayable error into a load or save
//! failure for a given path:
//!
//! ```no_run
//! use parquet_metadata_editor::error::{Result, ResultExt as _};
//! use std::path::Path;
//!
//! fn open(path: &Path) -> Result<std::fs::File> {
//!     std::fs::File::open(path).load_context(path)
//! }
//! ```
//!
//! ## UI surfaces
//!
//! `From<EditorError> for String` lets the GUI hand an error straight to a
//! toast or status line.

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for metadata editor operations.
#[derive(Debug)]
pub enum EditorError {
    /// Bad path, corrupt or unreadable file, unsupported format
    Load { path: PathBuf, reason: String },

    /// Serialization failure, write failure, permission denied
    Save { path: PathBuf, reason: String },

    /// A key that is already present was offered as a new key
    DuplicateKey(String),

    /// A key that cannot be stored (empty, reserved)
    InvalidKey(String),

    /// An action needs an open file but none is loaded
    NoOpenFile,
}

impl EditorError {
    pub fn load(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn save(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self::Save {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the two engine failure kinds, false for validation errors.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Load { .. } | Self::Save { .. })
    }
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load { path, reason } => {
                write!(f, "Failed to load {}: {reason}", path.display())
            }
            Self::Save { path, reason } => {
                write!(f, "Failed to save {}: {reason}", path.display())
            }
            Self::DuplicateKey(key) => write!(f, "The key '{key}' already exists"),
            Self::InvalidKey(reason) => write!(f, "Invalid key: {reason}"),
            Self::NoOpenFile => write!(f, "No Parquet file is open"),
        }
    }
}

impl std::error::Error for EditorError {}

impl From<EditorError> for String {
    fn from(err: EditorError) -> Self {
        err.to_string()
    }
}

/// Result type alias for metadata editor operations.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Extension trait to classify lower-level failures as load or save errors.
pub trait ResultExt<T> {
    /// Tag the error as a failure to load `path`.
    fn load_context(self, path: &Path) -> Result<T>;

    /// Tag the error as a failure to save `path`.
    fn save_context(self, path: &Path) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: fmt::Display,
{
    fn load_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| EditorError::load(path, e))
    }

    fn save_context(self, path: &Path) -> Result<T> {
        self.map_err(|e| EditorError::save(path, e))
    }
}
