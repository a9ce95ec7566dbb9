//! Tantivy index construction and access for the gazetteer.
//!
//! The index stores every scalar field of a gazetteer row for retrieval, and
//! additionally keeps feature class, feature code and population as sortable
//! fast fields independent of their text-searchable representation. Those
//! fast fields are the hook the taxonomy ranks attach to at query time.
//!
//! Building is one-shot and idempotent: if a valid index already exists at
//! the target path the build is skipped entirely. Construction failures on
//! the index directory itself are fatal; malformed source rows are not.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

pub use error::IndexError;
use error::Result;
use tantivy::{
    Index, IndexReader, IndexWriter, TantivyDocument,
    schema::{
        FAST, Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, SchemaBuilder,
        TextFieldIndexing, TextOptions,
    },
};
use tracing::{info, instrument, warn};

use crate::gazetteer::GazetteerRecord;

pub(crate) const FIELD_GEONAME_ID: &str = "geoname_id";
pub(crate) const FIELD_NAME: &str = "name";
pub(crate) const FIELD_ALTERNATE_NAMES: &str = "alternatenames";
pub(crate) const FIELD_LATITUDE: &str = "latitude";
pub(crate) const FIELD_LONGITUDE: &str = "longitude";
pub(crate) const FIELD_FEATURE_CLASS: &str = "feature_class";
pub(crate) const FIELD_FEATURE_CODE: &str = "feature_code";
pub(crate) const FIELD_COUNTRY_CODE: &str = "country_code";
pub(crate) const FIELD_ADMIN1_CODE: &str = "admin1_code";
pub(crate) const FIELD_ADMIN2_CODE: &str = "admin2_code";
pub(crate) const FIELD_POPULATION: &str = "population";

const WRITER_HEAP_BYTES: usize = 50_000_000;
const PROGRESS_LOG_INTERVAL: u64 = 100_000;

/// Tantivy schema for gazetteer documents.
///
/// `name` and `alternatenames` are tokenized with positions so whole-name
/// phrase queries work; the code fields are raw (untokenized) and fast so
/// they can serve as sort keys; population is a fast field used as the
/// engine-side retrieval order.
fn schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    let text_indexing = TextFieldIndexing::default()
        .set_tokenizer("default")
        .set_index_option(IndexRecordOption::WithFreqsAndPositions);
    let text_options = TextOptions::default()
        .set_indexing_options(text_indexing)
        .set_stored();

    builder.add_u64_field(FIELD_GEONAME_ID, STORED | INDEXED);
    builder.add_text_field(FIELD_NAME, text_options.clone());
    builder.add_text_field(FIELD_ALTERNATE_NAMES, text_options);
    builder.add_f64_field(FIELD_LATITUDE, STORED);
    builder.add_f64_field(FIELD_LONGITUDE, STORED);
    builder.add_text_field(FIELD_FEATURE_CLASS, STRING | STORED | FAST);
    builder.add_text_field(FIELD_FEATURE_CODE, STRING | STORED | FAST);
    builder.add_text_field(FIELD_COUNTRY_CODE, STORED);
    builder.add_text_field(FIELD_ADMIN1_CODE, STORED);
    builder.add_text_field(FIELD_ADMIN2_CODE, STORED);
    builder.add_u64_field(FIELD_POPULATION, STORED | FAST);
    builder.build()
}

/// Resolved field handles, looked up once per index.
#[derive(Debug, Clone, Copy)]
pub(crate) struct GazetteerFields {
    pub geoname_id: Field,
    pub name: Field,
    pub alternate_names: Field,
    pub latitude: Field,
    pub longitude: Field,
    pub feature_class: Field,
    pub feature_code: Field,
    pub country_code: Field,
    pub admin1_code: Field,
    pub admin2_code: Field,
    pub population: Field,
}

impl GazetteerFields {
    fn resolve(schema: &Schema) -> Result<Self> {
        Ok(Self {
            geoname_id: schema.get_field(FIELD_GEONAME_ID)?,
            name: schema.get_field(FIELD_NAME)?,
            alternate_names: schema.get_field(FIELD_ALTERNATE_NAMES)?,
            latitude: schema.get_field(FIELD_LATITUDE)?,
            longitude: schema.get_field(FIELD_LONGITUDE)?,
            feature_class: schema.get_field(FIELD_FEATURE_CLASS)?,
            feature_code: schema.get_field(FIELD_FEATURE_CODE)?,
            country_code: schema.get_field(FIELD_COUNTRY_CODE)?,
            admin1_code: schema.get_field(FIELD_ADMIN1_CODE)?,
            admin2_code: schema.get_field(FIELD_ADMIN2_CODE)?,
            population: schema.get_field(FIELD_POPULATION)?,
        })
    }
}

fn index_exists(index_path: &Path) -> bool {
    index_path.join("meta.json").exists()
}

/// Build the gazetteer index line by line.
///
/// Skips entirely when a valid index already exists at `index_path`; the
/// build is all-or-nothing construction, never an incremental merge. Rows
/// that fail structural parsing are logged and skipped. Failures on the
/// index directory itself (create, write, commit) are propagated.
#[instrument(name = "Build Gazetteer Index", skip_all, fields(gazetteer = ?gazetteer_path.as_ref(), index = ?index_path.as_ref()))]
pub fn build_index(
    gazetteer_path: impl AsRef<Path>,
    index_path: impl AsRef<Path>,
) -> Result<()> {
    let gazetteer_path = gazetteer_path.as_ref();
    let index_path = index_path.as_ref();

    if index_exists(index_path) {
        info!(path = ?index_path, "Index already exists, skipping build");
        return Ok(());
    }

    std::fs::create_dir_all(index_path)?;
    let schema = schema();
    let index = Index::create_in_dir(index_path, schema.clone())?;
    let fields = GazetteerFields::resolve(&schema)?;
    let mut writer: IndexWriter = index.writer(WRITER_HEAP_BYTES)?;

    info!("Start building gazetteer index");
    let reader = BufReader::new(File::open(gazetteer_path)?);
    let mut indexed: u64 = 0;
    let mut skipped: u64 = 0;
    for (line_number, line) in reader.lines().enumerate() {
        let line = line?;
        match GazetteerRecord::parse_line(&line) {
            Ok(record) => {
                writer.add_document(document_from_record(&record, &fields))?;
                indexed += 1;
                if indexed % PROGRESS_LOG_INTERVAL == 0 {
                    info!(indexed, "Indexed row count");
                }
            }
            Err(error) => {
                warn!(line = line_number + 1, %error, "Skipping malformed gazetteer row");
                skipped += 1;
            }
        }
    }
    writer.commit()?;
    info!(indexed, skipped, "Index build finished");
    Ok(())
}

fn document_from_record(record: &GazetteerRecord, fields: &GazetteerFields) -> TantivyDocument {
    let mut doc = TantivyDocument::default();
    doc.add_u64(fields.geoname_id, record.id);
    doc.add_text(fields.name, &record.name);
    doc.add_text(fields.alternate_names, &record.alternate_names);
    doc.add_f64(fields.latitude, record.latitude);
    doc.add_f64(fields.longitude, record.longitude);
    doc.add_text(fields.feature_class, &record.feature_class);
    doc.add_text(fields.feature_code, &record.feature_code);
    doc.add_text(fields.country_code, &record.country_code);
    doc.add_text(fields.admin1_code, &record.admin1_code);
    doc.add_text(fields.admin2_code, &record.admin2_code);
    doc.add_u64(fields.population, record.population);
    doc
}

/// Read-only handle over a previously built gazetteer index.
///
/// Opened once per resolver instance; the underlying reader is safe for
/// concurrent searches from a surrounding service.
#[derive(Clone)]
pub struct GazetteerIndex {
    index: Index,
    reader: IndexReader,
    fields: GazetteerFields,
}

impl GazetteerIndex {
    /// Open the index at `index_path` for searching.
    ///
    /// Unlike row-level build failures this is fatal: searching without a
    /// previously built index is refused.
    #[instrument(name = "Open Gazetteer Index", skip_all, fields(index = ?index_path.as_ref()))]
    pub fn open(index_path: impl AsRef<Path>) -> Result<Self> {
        let index_path = index_path.as_ref();
        if !index_exists(index_path) {
            return Err(IndexError::IndexNotFound(index_path.to_path_buf()));
        }
        let index = Index::open_in_dir(index_path)?;
        let reader = index.reader()?;
        let fields = GazetteerFields::resolve(&index.schema())?;
        info!(num_docs = reader.searcher().num_docs(), "Opened gazetteer index");
        Ok(Self {
            index,
            reader,
            fields,
        })
    }

    /// Number of documents in the index.
    #[must_use]
    pub fn num_docs(&self) -> u64 {
        self.reader.searcher().num_docs()
    }

    pub(crate) const fn tantivy(&self) -> &Index {
        &self.index
    }

    pub(crate) const fn reader(&self) -> &IndexReader {
        &self.reader
    }

    pub(crate) const fn fields(&self) -> &GazetteerFields {
        &self.fields
    }
}

mod error {
    use std::path::PathBuf;

    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum IndexError {
        #[error("IO error: {0}")]
        Io(#[from] std::io::Error),
        #[error("Tantivy error: {0}")]
        Tantivy(#[from] tantivy::TantivyError),
        #[error("no index found at {0:?}; build one first")]
        IndexNotFound(PathBuf),
        #[error(transparent)]
        Other(#[from] anyhow::Error),
    }
    pub type Result<T> = std::result::Result<T, IndexError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_resolves_every_field() {
        let schema = schema();
        assert!(GazetteerFields::resolve(&schema).is_ok());
    }

    #[test]
    fn document_carries_every_stored_field() {
        use tantivy::schema::Value;

        let schema = schema();
        let fields = GazetteerFields::resolve(&schema).unwrap();
        let record = GazetteerRecord {
            id: 42,
            name: "Springfield".into(),
            alternate_names: String::new(),
            latitude: 39.80,
            longitude: -89.64,
            feature_class: "P".into(),
            feature_code: "PPL".into(),
            country_code: "US".into(),
            admin1_code: "IL".into(),
            admin2_code: "167".into(),
            population: 116_250,
        };
        let doc = document_from_record(&record, &fields);
        assert_eq!(doc.get_first(fields.geoname_id).and_then(|v| v.as_u64()), Some(42));
        assert_eq!(
            doc.get_first(fields.name).and_then(|v| v.as_str()),
            Some("Springfield")
        );
        // Empty alternate names are stored as-is; retrieval normalizes them.
        assert_eq!(
            doc.get_first(fields.alternate_names).and_then(|v| v.as_str()),
            Some("")
        );
        assert_eq!(
            doc.get_first(fields.population).and_then(|v| v.as_u64()),
            Some(116_250)
        );
    }
}
