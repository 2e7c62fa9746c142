use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use parquet_metadata_editor::editor::{self, MetadataMap, SaveOptions, metadata};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "parquet-metadata-editor",
    version,
    about = "View and edit the key/value metadata of Parquet files",
    long_about = "Without a subcommand the desktop editor is started."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print every metadata key and value
    Show {
        /// Parquet file to read
        file: PathBuf,

        /// Print a JSON object instead of `key = value` lines
        #[arg(long)]
        json: bool,
    },
    /// Print the value of one key
    Get {
        /// Parquet file to read
        file: PathBuf,

        /// Metadata key
        key: String,
    },
    /// Set one or more keys and save the file
    Set {
        /// Parquet file to update
        file: PathBuf,

        /// Entries to write, as KEY=VALUE
        #[arg(required = true, value_parser = parse_pair)]
        pairs: Vec<(String, String)>,

        /// Write to this path instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the target directly instead of writing a temp file and renaming it
        #[arg(long)]
        in_place: bool,
    },
    /// Remove one or more keys and save the file
    Remove {
        /// Parquet file to update
        file: PathBuf,

        /// Keys to remove
        #[arg(required = true)]
        keys: Vec<String>,

        /// Write to this path instead of overwriting FILE
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the target directly instead of writing a temp file and renaming it
        #[arg(long)]
        in_place: bool,
    },
    /// Start the desktop editor with FILE already open
    Open {
        /// Parquet file to open
        file: PathBuf,
    },
}

/// Runs a headless subcommand. `Open` is handled by the caller.
pub fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Show { file, json } => {
            let meta = editor::read_metadata(&file)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&meta).context("Failed to encode metadata")?
                );
            } else {
                print!("{}", format_listing(&meta));
            }
            Ok(())
        }
        Commands::Get { file, key } => {
            let meta = editor::read_metadata(&file)?;
            let value = metadata::get(&meta, &key).with_context(|| {
                format!("Key '{key}' not found in {}", file.display())
            })?;
            println!("{value}");
            Ok(())
        }
        Commands::Set {
            file,
            pairs,
            output,
            in_place,
        } => {
            let target = output.unwrap_or_else(|| file.clone());
            let changed = handle_set(&file, &target, &pairs, save_options(in_place))?;
            if changed == 0 && target == file {
                println!("All values already set; {} left unchanged", file.display());
            } else {
                println!("Updated {changed} key(s) in {}", target.display());
            }
            Ok(())
        }
        Commands::Remove {
            file,
            keys,
            output,
            in_place,
        } => {
            let target = output.unwrap_or_else(|| file.clone());
            let removed = handle_remove(&file, &target, &keys, save_options(in_place))?;
            if removed.is_empty() {
                println!("None of the keys were present; {} left unchanged", file.display());
            } else {
                println!("Removed {} from {}", removed.join(", "), target.display());
            }
            Ok(())
        }
        Commands::Open { file } => {
            anyhow::bail!("'open {}' must be handled by the GUI launcher", file.display())
        }
    }
}

fn save_options(in_place: bool) -> SaveOptions {
    SaveOptions { atomic: !in_place }
}

/// Applies `pairs` to the metadata of `source` and writes the result to `target`.
///
/// Returns how many keys were added or got a new value. Nothing is written
/// when that is zero and the target is the source.
fn handle_set(
    source: &std::path::Path,
    target: &std::path::Path,
    pairs: &[(String, String)],
    options: SaveOptions,
) -> Result<usize> {
    let (mut meta, table) = editor::load(source)?;
    let changed = pairs
        .iter()
        .filter(|(key, value)| {
            metadata::put(&mut meta, key.clone(), value.clone()).as_ref() != Some(value)
        })
        .count();

    if changed == 0 && source == target {
        return Ok(changed);
    }
    editor::save_with_options(target, &meta, &table, options)?;
    tracing::info!(changed, target = %target.display(), "Set metadata");
    Ok(changed)
}

/// Removes `keys` from `source` and writes the result to `target`.
///
/// Nothing is written when none of the keys exist and the target is the source.
fn handle_remove(
    source: &std::path::Path,
    target: &std::path::Path,
    keys: &[String],
    options: SaveOptions,
) -> Result<Vec<String>> {
    let (mut meta, table) = editor::load(source)?;
    let removed: Vec<String> = keys
        .iter()
        .filter(|key| metadata::remove_key(&mut meta, key).is_some())
        .cloned()
        .collect();

    if removed.is_empty() && source == target {
        return Ok(removed);
    }
    editor::save_with_options(target, &meta, &table, options)?;
    Ok(removed)
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key must not be empty".to_owned());
    }
    if metadata::is_reserved(key) {
        return Err(format!("'{key}' is reserved by the Parquet writer"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

fn format_listing(meta: &MetadataMap) -> String {
    if meta.is_empty() {
        return "(no metadata)\n".to_owned();
    }
    let mut out = String::new();
    for (key, value) in meta {
        let mut lines = value.lines();
        out.push_str(&format!("{key} = {}\n", lines.next().unwrap_or_default()));
        for line in lines {
            out.push_str(&format!("    {line}\n"));
        }
    }
    out
}
