use crate::editor::SaveOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MAX_RECENT_FILES: usize = 10;
pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 32.0;

/// User preferences, restored through eframe's app storage between runs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EditorSettings {
    /// Save through a temp file and rename instead of overwriting in place
    pub atomic_save: bool,
    /// Font size of the metadata value editor
    pub editor_font_size: f32,
    /// Ask before opening another file over unsaved edits
    pub confirm_discard: bool,
    /// Most recently opened files, newest first
    pub recent_files: Vec<PathBuf>,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            atomic_save: true,
            editor_font_size: 14.0,
            confirm_discard: true,
            recent_files: Vec::new(),
        }
    }
}

impl EditorSettings {
    pub fn save_options(&self) -> SaveOptions {
        SaveOptions {
            atomic: self.atomic_save,
        }
    }

    pub fn set_font_size(&mut self, size: f32) {
        self.editor_font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Moves `path` to the front of the recent list.
    pub fn push_recent(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
        self.recent_files.insert(0, path.to_path_buf());
        self.recent_files.truncate(MAX_RECENT_FILES);
    }

    pub fn forget_recent(&mut self, path: &Path) {
        self.recent_files.retain(|p| p != path);
    }

    /// Repairs values that may have been edited by hand or saved by an older
    /// build.
    pub fn sanitize(&mut self) {
        self.set_font_size(self.editor_font_size);
        let mut seen = Vec::with_capacity(self.recent_files.len());
        self.recent_files.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
        self.recent_files.truncate(MAX_RECENT_FILES);
    }
}
