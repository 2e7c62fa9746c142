//! Reading and rewriting Parquet files around their footer metadata.
//!
//! A load pulls the whole table into memory: schema, every record batch, and
//! the write settings the file was produced with. A save rebuilds the schema
//! with the edited metadata, reattaches the untouched column arrays, and writes
//! a complete new file.

use super::metadata::{self, MetadataMap};
use crate::error::{Result, ResultExt as _};
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};
use parquet::basic::Compression;
use parquet::errors::ParquetError;
use parquet::file::metadata::ParquetMetaData;
use parquet::file::properties::{DEFAULT_MAX_ROW_GROUP_SIZE, WriterProperties};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

/// Column data and schema of a loaded file, kept to rewrite it unchanged.
#[derive(Debug, Clone)]
pub struct TableHandle {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
    compression: Compression,
    max_row_group_size: usize,
}

impl TableHandle {
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    pub fn num_columns(&self) -> usize {
        self.schema.fields().len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect()
    }

    /// Codec of the source file's first column chunk.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    fn writer_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.max_row_group_size)
            .build()
    }
}

/// How [`save_with_options`] puts bytes on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOptions {
    /// Write a sibling temp file and rename it over the target.
    pub atomic: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self { atomic: true }
    }
}

/// Loads the metadata mapping and the full table from `path`.
///
/// A file without footer metadata yields an empty mapping.
///
/// # Errors
///
/// Returns `EditorError::Load` if the file is missing, unreadable, or not a
/// valid Parquet file.
pub fn load(path: &Path) -> Result<(MetadataMap, TableHandle)> {
    let file = File::open(path).load_context(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).load_context(path)?;

    let schema = Arc::clone(builder.schema());
    let (compression, max_row_group_size) = write_settings(builder.metadata());

    let batches = builder
        .build()
        .load_context(path)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .load_context(path)?;

    let metadata = metadata::from_schema_metadata(schema.metadata());

    tracing::info!(
        path = %path.display(),
        keys = metadata.len(),
        columns = schema.fields().len(),
        batches = batches.len(),
        "Loaded Parquet file"
    );

    Ok((
        metadata,
        TableHandle {
            schema,
            batches,
            compression,
            max_row_group_size,
        },
    ))
}

/// Reads only the footer metadata, without decoding any column data.
///
/// # Errors
///
/// Returns `EditorError::Load` under the same conditions as [`load`].
pub fn read_metadata(path: &Path) -> Result<MetadataMap> {
    let file = File::open(path).load_context(path)?;
    let reader_metadata =
        ArrowReaderMetadata::load(&file, ArrowReaderOptions::default()).load_context(path)?;
    Ok(metadata::from_schema_metadata(
        reader_metadata.schema().metadata(),
    ))
}

/// Writes `table` with `metadata` to `path` using the default [`SaveOptions`].
///
/// # Errors
///
/// Returns `EditorError::Save` if serialization or the write fails.
pub fn save(path: &Path, metadata: &MetadataMap, table: &TableHandle) -> Result<()> {
    save_with_options(path, metadata, table, SaveOptions::default())
}

/// Writes `table` with `metadata` to `path`.
///
/// With `atomic` set, a failed write leaves any existing file at `path` as it
/// was. Without it the target is truncated first, so a failure midway leaves a
/// damaged file.
///
/// # Errors
///
/// Returns `EditorError::Save` if serialization or the write fails.
pub fn save_with_options(
    path: &Path,
    metadata: &MetadataMap,
    table: &TableHandle,
    options: SaveOptions,
) -> Result<()> {
    let schema = Arc::new(Schema::new_with_metadata(
        table.schema.fields().clone(),
        metadata::to_schema_metadata(metadata),
    ));

    if options.atomic {
        save_atomic(path, &schema, table)?;
    } else {
        let file = File::create(path).save_context(path)?;
        write_table(file, &schema, table).save_context(path)?;
    }

    tracing::info!(
        path = %path.display(),
        keys = metadata.len(),
        atomic = options.atomic,
        "Saved Parquet file"
    );
    Ok(())
}

fn save_atomic(path: &Path, schema: &SchemaRef, table: &TableHandle) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".parquet-meta-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .save_context(path)?;

    write_table(tmp.as_file_mut(), schema, table).save_context(path)?;
    tmp.as_file().sync_all().save_context(path)?;

    // Temp files are created owner-only; keep the target's mode.
    if let Ok(existing) = fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .save_context(path)?;
    }

    tmp.persist(path).save_context(path)?;
    Ok(())
}

fn write_table<W: Write + Send>(
    writer: W,
    schema: &SchemaRef,
    table: &TableHandle,
) -> std::result::Result<(), ParquetError> {
    let mut writer = ArrowWriter::try_new(
        writer,
        Arc::clone(schema),
        Some(table.writer_properties()),
    )?;

    for batch in &table.batches {
        let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
        let batch =
            RecordBatch::try_new_with_options(Arc::clone(schema), batch.columns().to_vec(), &options)?;
        writer.write(&batch)?;
    }

    writer.close()?;
    Ok(())
}

/// Compression and row-group size to reuse when rewriting the file.
fn write_settings(parquet_metadata: &ParquetMetaData) -> (Compression, usize) {
    let row_groups = parquet_metadata.row_groups();

    let compression = row_groups
        .first()
        .and_then(|rg| rg.columns().first())
        .map(|column| column.compression())
        .unwrap_or(Compression::SNAPPY);

    let max_row_group_size = row_groups
        .iter()
        .filter_map(|rg| usize::try_from(rg.num_rows()).ok())
        .max()
        .filter(|rows| *rows > 0)
        .unwrap_or(DEFAULT_MAX_ROW_GROUP_SIZE);

    (compression, max_row_group_size)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::EditorError;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::compute::concat_batches;
    use arrow::datatypes::{DataType, Field};
    use std::collections::HashMap;
    use tempfile::tempdir;

    /// Writes a small two-column file with the given footer metadata.
    pub(crate) fn write_fixture(
        path: &Path,
        pairs: &[(&str, &str)],
        compression: Compression,
    ) -> anyhow::Result<()> {
        let metadata: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        let schema = Arc::new(Schema::new_with_metadata(
            vec![
                Field::new("id", DataType::Int64, false),
                Field::new("name", DataType::Utf8, true),
            ],
            metadata,
        ));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(Int64Array::from(vec![1, 2, 3, 4])),
            Arc::new(StringArray::from(vec![Some("a"), None, Some("c"), Some("d")])),
        ];
        let batch = RecordBatch::try_new(Arc::clone(&schema), columns)?;

        let props = WriterProperties::builder()
            .set_compression(compression)
            .build();
        let mut writer = ArrowWriter::try_new(File::create(path)?, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }

    fn single_batch(table: &TableHandle) -> RecordBatch {
        concat_batches(table.schema(), table.batches()).expect("batches share one schema")
    }

    #[test]
    fn test_load_reads_metadata_and_columns() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("author", "ada"), ("version", "3")], Compression::SNAPPY)?;

        let (metadata, table) = load(&path)?;
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("author").map(String::as_str), Some("ada"));
        assert_eq!(table.num_rows(), 4);
        assert_eq!(table.column_names(), ["id", "name"]);
        assert!(
            !metadata.contains_key(metadata::ARROW_SCHEMA_KEY),
            "internal schema key must stay hidden"
        );
        Ok(())
    }

    #[test]
    fn test_load_without_metadata_is_empty() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bare.parquet");
        write_fixture(&path, &[], Compression::UNCOMPRESSED)?;

        let (metadata, _) = load(&path)?;
        assert!(metadata.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_load_error() {
        let err = load(Path::new("/definitely/not/here.parquet")).expect_err("missing file");
        assert!(matches!(err, EditorError::Load { .. }), "got {err:?}");
    }

    #[test]
    fn test_load_garbage_is_load_error() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("notes.parquet");
        fs::write(&path, "this is plain text, not parquet")?;

        let err = load(&path).expect_err("garbage file");
        assert!(matches!(err, EditorError::Load { .. }), "got {err:?}");
        Ok(())
    }

    #[test]
    fn test_save_round_trip_preserves_columns() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("author", "ada")], Compression::SNAPPY)?;

        let (mut metadata, table) = load(&path)?;
        metadata::put(&mut metadata, "author", "grace");
        metadata::put(&mut metadata, "description", "weekly export\nsecond line");
        save(&path, &metadata, &table)?;

        let (reloaded, reloaded_table) = load(&path)?;
        assert_eq!(reloaded, metadata);

        let before = single_batch(&table);
        let after = single_batch(&reloaded_table);
        assert_eq!(before.num_rows(), after.num_rows());
        assert_eq!(before.columns(), after.columns(), "column data must be untouched");
        assert_eq!(table.schema().fields(), reloaded_table.schema().fields());
        Ok(())
    }

    #[test]
    fn test_save_removes_deleted_keys() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("keep", "1"), ("drop", "2")], Compression::SNAPPY)?;

        let (mut metadata, table) = load(&path)?;
        metadata::remove_key(&mut metadata, "drop");
        save(&path, &metadata, &table)?;

        let reloaded = read_metadata(&path)?;
        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.contains_key("keep"));
        Ok(())
    }

    #[test]
    fn test_save_twice_is_idempotent() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let first = dir.path().join("first.parquet");
        let second = dir.path().join("second.parquet");
        write_fixture(&first, &[("a", "1")], Compression::SNAPPY)?;

        let (metadata, table) = load(&first)?;
        save(&first, &metadata, &table)?;
        save(&second, &metadata, &table)?;
        save(&second, &metadata, &table)?;

        assert_eq!(read_metadata(&first)?, read_metadata(&second)?);
        Ok(())
    }

    #[test]
    fn test_mutation_does_not_touch_disk_until_save() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("author", "ada")], Compression::SNAPPY)?;

        let (mut metadata, _table) = load(&path)?;
        metadata::put(&mut metadata, "author", "changed");
        metadata::put(&mut metadata, "extra", "x");

        let on_disk = read_metadata(&path)?;
        assert_eq!(on_disk.get("author").map(String::as_str), Some("ada"));
        assert!(!on_disk.contains_key("extra"));
        Ok(())
    }

    #[test]
    fn test_save_keeps_source_compression() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("plain.parquet");
        write_fixture(&path, &[("a", "1")], Compression::UNCOMPRESSED)?;

        let (metadata, table) = load(&path)?;
        assert_eq!(table.compression(), Compression::UNCOMPRESSED);
        save(&path, &metadata, &table)?;

        let (_, reloaded) = load(&path)?;
        assert_eq!(reloaded.compression(), Compression::UNCOMPRESSED);
        Ok(())
    }

    #[test]
    fn test_atomic_save_into_missing_dir_fails_cleanly() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("a", "1")], Compression::SNAPPY)?;
        let (metadata, table) = load(&path)?;

        let target = dir.path().join("missing").join("out.parquet");
        let err = save(&target, &metadata, &table).expect_err("parent does not exist");
        assert!(matches!(err, EditorError::Save { .. }), "got {err:?}");
        assert!(!target.exists());
        Ok(())
    }

    fn leftover_temp_files(dir: &Path) -> anyhow::Result<usize> {
        Ok(fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".parquet-meta-"))
            .count())
    }

    #[test]
    fn test_failed_rename_keeps_existing_target() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let source = dir.path().join("data.parquet");
        write_fixture(&source, &[("a", "1")], Compression::SNAPPY)?;
        let (mut metadata, table) = load(&source)?;
        metadata::put(&mut metadata, "a", "2");

        // A non-empty directory cannot be replaced by a file rename.
        let target = dir.path().join("occupied.parquet");
        fs::create_dir(&target)?;
        fs::write(target.join("keep.txt"), b"untouched")?;

        let err = save(&target, &metadata, &table).expect_err("target is a directory");
        assert!(matches!(err, EditorError::Save { .. }), "got {err:?}");
        assert!(target.is_dir());
        assert_eq!(fs::read(target.join("keep.txt"))?, b"untouched");
        assert_eq!(leftover_temp_files(dir.path())?, 0);
        Ok(())
    }

    #[test]
    fn test_failed_write_keeps_original_bytes() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("a", "1")], Compression::SNAPPY)?;
        let before = fs::read(&path)?;

        // Batches that no longer match the schema make the writer fail midway.
        let (mut metadata, mut table) = load(&path)?;
        let id_only = Arc::new(Schema::new(vec![Field::new("id", DataType::Int64, false)]));
        let id_column: ArrayRef = Arc::new(Int64Array::from(vec![1, 2]));
        table.batches = vec![RecordBatch::try_new(id_only, vec![id_column])?];
        metadata::put(&mut metadata, "a", "2");

        let err = save(&path, &metadata, &table).expect_err("batch does not match schema");
        assert!(matches!(err, EditorError::Save { .. }), "got {err:?}");
        assert_eq!(fs::read(&path)?, before);
        assert_eq!(leftover_temp_files(dir.path())?, 0);
        Ok(())
    }

    #[test]
    fn test_in_place_save_writes_same_content() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("data.parquet");
        write_fixture(&path, &[("a", "1")], Compression::SNAPPY)?;

        let (mut metadata, table) = load(&path)?;
        metadata::put(&mut metadata, "b", "2");
        save_with_options(&path, &metadata, &table, SaveOptions { atomic: false })?;

        assert_eq!(read_metadata(&path)?, metadata);
        let leftovers = fs::read_dir(dir.path())?
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0, "no temp files should remain");
        Ok(())
    }
}
