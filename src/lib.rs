//! # Parquet Metadata Editor
//!
//! Reads, edits and writes back the free-form key/value metadata stored in the
//! schema footer of a Parquet file. Column data is carried through a save
//! unchanged; only the metadata mapping is replaced.
//!
//! ## Quick Start
//!
//! ```no_run
//! use parquet_metadata_editor::editor::{self, metadata};
//!
//! let (mut meta, table) = editor::load("data.parquet".as_ref())?;
//! println!("{} rows, {} keys", table.num_rows(), meta.len());
//!
//! metadata::put(&mut meta, "owner", "analytics");
//! editor::save("data.parquet".as_ref(), &meta, &table)?;
//! # Ok::<(), parquet_metadata_editor::error::EditorError>(())
//! ```
//!
//! ## Modules
//!
//! - [`editor`]: load/get/put/save plus the tab-based [`editor::EditingSession`]
//! - [`error`]: the [`error::EditorError`] type shared by every fallible operation
//! - [`config`]: persisted user settings
//! - [`gui`]: the egui desktop front end
//! - [`logging`]: file and console logging for the desktop app
//! - [`theme`]: colours, spacing and frames used by the GUI

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod editor;
pub mod error;
pub mod gui;
pub mod logging;
pub mod theme;
