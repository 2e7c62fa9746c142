//! The single editing session behind the GUI.
//!
//! One session owns everything about the file being edited: its path, the
//! metadata mapping, the table handle, which key's tab is selected, and the
//! text buffer bound to the editor widget. Opening another file replaces the
//! whole session, so nothing outlives it.

use super::metadata::{self, MetadataMap};
use super::storage::{self, SaveOptions, TableHandle};
use crate::error::Result;
use std::ops::Bound;
use std::path::{Path, PathBuf};

pub struct EditingSession {
    path: PathBuf,
    metadata: MetadataMap,
    /// Mapping as last loaded or saved, for dirty tracking.
    saved: MetadataMap,
    table: TableHandle,
    current_tab: Option<String>,
    buffer: String,
}

impl EditingSession {
    /// Loads `path` and selects the first key.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Load` if the file cannot be read. No session is
    /// built in that case, so a caller's existing session stays as it was.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (metadata, table) = storage::load(&path)?;
        Ok(Self::from_parts(path, metadata, table))
    }

    pub fn from_parts(path: PathBuf, metadata: MetadataMap, table: TableHandle) -> Self {
        let current_tab = metadata.keys().next().cloned();
        let buffer = current_tab
            .as_deref()
            .and_then(|key| metadata::get(&metadata, key))
            .unwrap_or_default()
            .to_owned();

        Self {
            path,
            saved: metadata.clone(),
            metadata,
            table,
            current_tab,
            buffer,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Committed mapping; excludes uncommitted edits in the buffer.
    pub fn metadata(&self) -> &MetadataMap {
        &self.metadata
    }

    pub fn table(&self) -> &TableHandle {
        &self.table
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.metadata.keys().map(String::as_str)
    }

    pub fn current_tab(&self) -> Option<&str> {
        self.current_tab.as_deref()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Text bound to the editor widget for the selected key.
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    /// Writes the buffer into the mapping under the selected key.
    pub fn commit_editor(&mut self) {
        if let Some(key) = &self.current_tab {
            metadata::put(&mut self.metadata, key.clone(), self.buffer.clone());
        }
    }

    /// Commits the current buffer, then shows `key` in the editor. Keys not
    /// in the mapping are ignored.
    pub fn select_tab(&mut self, key: &str) {
        if self.current_tab.as_deref() == Some(key) || !self.metadata.contains_key(key) {
            return;
        }
        self.commit_editor();
        self.show_tab(Some(key.to_owned()));
    }

    fn show_tab(&mut self, key: Option<String>) {
        self.buffer = key
            .as_deref()
            .and_then(|k| metadata::get(&self.metadata, k))
            .unwrap_or_default()
            .to_owned();
        self.current_tab = key;
    }

    /// Adds a new empty key and selects it.
    ///
    /// # Errors
    ///
    /// `InvalidKey` for blank or reserved keys, `DuplicateKey` if it exists.
    pub fn add_key(&mut self, key: &str) -> Result<String> {
        self.commit_editor();
        let key = metadata::validate_new_key(&self.metadata, key)?;
        metadata::add_key(&mut self.metadata, &key, "");
        self.show_tab(Some(key.clone()));
        tracing::debug!(key = %key, "Added metadata key");
        Ok(key)
    }

    /// Removes `key`. If it was selected, the next key (or the previous one
    /// when it was last) becomes selected.
    pub fn remove_key(&mut self, key: &str) -> Option<String> {
        let was_current = self.current_tab.as_deref() == Some(key);
        if !was_current {
            self.commit_editor();
        }

        let neighbour = if was_current {
            self.metadata
                .range::<str, _>((Bound::Excluded(key), Bound::Unbounded))
                .next()
                .or_else(|| {
                    self.metadata
                        .range::<str, _>((Bound::Unbounded, Bound::Excluded(key)))
                        .next_back()
                })
                .map(|(k, _)| k.clone())
        } else {
            None
        };

        let removed = metadata::remove_key(&mut self.metadata, key);
        if was_current {
            self.show_tab(neighbour);
        }
        if removed.is_some() {
            tracing::debug!(key = %key, "Removed metadata key");
        }
        removed
    }

    /// Mapping with the uncommitted buffer applied.
    pub fn pending_metadata(&self) -> MetadataMap {
        let mut pending = self.metadata.clone();
        if let Some(key) = &self.current_tab {
            metadata::put(&mut pending, key.clone(), self.buffer.clone());
        }
        pending
    }

    pub fn is_dirty(&self) -> bool {
        self.pending_metadata() != self.saved
    }

    /// Commits the buffer and writes the file back to its own path.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Save` if the write fails; the in-memory edits are
    /// kept so the user can retry.
    pub fn save(&mut self, options: SaveOptions) -> Result<()> {
        self.commit_editor();
        storage::save_with_options(&self.path, &self.metadata, &self.table, options)?;
        self.saved = self.metadata.clone();
        Ok(())
    }

    /// Writes to `path` and makes it the session's file.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Save` if the write fails; the session keeps its
    /// old path in that case.
    pub fn save_as(&mut self, path: impl Into<PathBuf>, options: SaveOptions) -> Result<()> {
        let path = path.into();
        self.commit_editor();
        storage::save_with_options(&path, &self.metadata, &self.table, options)?;
        self.path = path;
        self.saved = self.metadata.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::storage::tests::write_fixture;
    use crate::error::EditorError;
    use parquet::basic::Compression;
    use tempfile::tempdir;

    fn fixture_session(dir: &Path, pairs: &[(&str, &str)]) -> anyhow::Result<EditingSession> {
        let path = dir.join("session.parquet");
        write_fixture(&path, pairs, Compression::SNAPPY)?;
        Ok(EditingSession::open(path)?)
    }

    #[test]
    fn test_open_selects_first_key() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let session = fixture_session(dir.path(), &[("b", "two"), ("a", "one")])?;
        assert_eq!(session.current_tab(), Some("a"));
        assert_eq!(session.buffer(), "one");
        assert!(!session.is_dirty());
        Ok(())
    }

    #[test]
    fn test_open_empty_metadata_has_no_tab() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let session = fixture_session(dir.path(), &[])?;
        assert_eq!(session.current_tab(), None);
        assert_eq!(session.buffer(), "");
        assert_eq!(session.keys().count(), 0);
        Ok(())
    }

    #[test]
    fn test_switching_tabs_commits_buffer() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "one"), ("b", "two")])?;

        session.buffer_mut().push_str(" edited");
        session.select_tab("b");
        assert_eq!(session.buffer(), "two");
        assert_eq!(
            session.metadata().get("a").map(String::as_str),
            Some("one edited")
        );
        assert!(session.is_dirty());
        Ok(())
    }

    #[test]
    fn test_selecting_unknown_key_adds_nothing() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "1")])?;

        session.select_tab("ghost");
        assert_eq!(session.current_tab(), Some("a"));
        assert_eq!(session.buffer(), "1");

        session.save(SaveOptions::default())?;
        let on_disk = storage::read_metadata(session.path())?;
        assert_eq!(on_disk.keys().map(String::as_str).collect::<Vec<_>>(), ["a"]);
        Ok(())
    }

    #[test]
    fn test_buffer_keeps_surrounding_whitespace() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "  padded\n")])?;
        session.select_tab("a");
        session.commit_editor();
        assert_eq!(
            session.metadata().get("a").map(String::as_str),
            Some("  padded\n")
        );
        assert!(!session.is_dirty(), "unchanged text must not mark the session dirty");
        Ok(())
    }

    #[test]
    fn test_add_key_rejects_duplicates() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "one")])?;

        let err = session.add_key("a").expect_err("duplicate");
        assert!(matches!(err, EditorError::DuplicateKey(_)), "got {err:?}");

        let key = session.add_key("  owner ")?;
        assert_eq!(key, "owner");
        assert_eq!(session.current_tab(), Some("owner"));
        assert_eq!(session.buffer(), "");
        assert_eq!(session.keys().count(), 2);
        Ok(())
    }

    #[test]
    fn test_remove_current_key_selects_neighbour() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session =
            fixture_session(dir.path(), &[("a", "1"), ("b", "2"), ("c", "3")])?;

        session.select_tab("b");
        assert_eq!(session.remove_key("b").as_deref(), Some("2"));
        assert_eq!(session.current_tab(), Some("c"));
        assert_eq!(session.buffer(), "3");

        assert_eq!(session.remove_key("c").as_deref(), Some("3"));
        assert_eq!(session.current_tab(), Some("a"));

        assert_eq!(session.remove_key("a").as_deref(), Some("1"));
        assert_eq!(session.current_tab(), None);
        Ok(())
    }

    #[test]
    fn test_save_persists_buffer_and_clears_dirty() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "one")])?;

        *session.buffer_mut() = "rewritten".to_owned();
        assert!(session.is_dirty());
        session.save(SaveOptions::default())?;
        assert!(!session.is_dirty());

        let on_disk = storage::read_metadata(session.path())?;
        assert_eq!(on_disk.get("a").map(String::as_str), Some("rewritten"));
        Ok(())
    }

    #[test]
    fn test_save_as_retargets_session() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut session = fixture_session(dir.path(), &[("a", "one")])?;
        let original = session.path().to_path_buf();
        let copy = dir.path().join("copy.parquet");

        session.add_key("added")?;
        session.save_as(&copy, SaveOptions::default())?;

        assert_eq!(session.path(), copy.as_path());
        assert!(storage::read_metadata(&copy)?.contains_key("added"));
        assert!(!storage::read_metadata(&original)?.contains_key("added"));
        Ok(())
    }

    #[test]
    fn test_failed_open_leaves_previous_session() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let mut current = Some(fixture_session(dir.path(), &[("a", "one")])?);

        match EditingSession::open(dir.path().join("nope.parquet")) {
            Ok(session) => current = Some(session),
            Err(err) => assert!(matches!(err, EditorError::Load { .. }), "got {err:?}"),
        }

        let session = current.expect("previous session kept");
        assert_eq!(session.metadata().get("a").map(String::as_str), Some("one"));
        Ok(())
    }
}
