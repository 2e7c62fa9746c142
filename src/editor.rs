//! Metadata round-trip engine.
//!
//! Opens a Parquet file, exposes the key/value metadata stored in its schema
//! footer, and writes a new file that pairs the original column data with the
//! edited metadata.
//!
//! ## Usage
//!
//! ```no_run
//! use parquet_metadata_editor::editor::{self, metadata};
//! use std::path::Path;
//!
//! # fn example() -> parquet_metadata_editor::error::Result<()> {
//! let path = Path::new("measurements.parquet");
//! let (mut meta, table) = editor::load(path)?;
//!
//! metadata::put(&mut meta, "owner", "data-platform");
//! metadata::remove_key(&mut meta, "obsolete");
//!
//! // Nothing on disk changes until here
//! editor::save(path, &meta, &table)?;
//! # Ok(())
//! # }
//! ```
//!
//! The GUI works through [`EditingSession`], which adds tab selection, the
//! editor text buffer and unsaved-change tracking on top of these calls.

pub mod metadata;
pub mod session;
pub mod storage;

pub use metadata::MetadataMap;
pub use session::EditingSession;
pub use storage::{SaveOptions, TableHandle, load, read_metadata, save, save_with_options};
