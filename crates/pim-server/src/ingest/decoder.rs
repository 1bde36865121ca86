//! Streaming catalog decoder
//!
//! Decompresses and parses a gzip-compressed CSV byte source into a lazy,
//! single-pass sequence of raw rows. The header row is consumed at open
//! time and the required-column contract is enforced before any row is
//! yielded. The stream is not restartable; callers needing a second pass
//! open a fresh decoder.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;

use super::error::IngestError;

/// Required: the natural key column
pub const COLUMN_SKU: &str = "sku";
/// Required: the display name column
pub const COLUMN_NAME: &str = "name";
/// Optional
pub const COLUMN_DESCRIPTION: &str = "description";
/// Optional
pub const COLUMN_IS_ACTIVE: &str = "is_active";

/// Raw text of the recognized fields of one CSV row, untrimmed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub sku: String,
    pub name: String,
    /// `None` when the column is absent from the header
    pub description: Option<String>,
    /// `None` when the column is absent from the header
    pub is_active: Option<String>,
}

/// Header column positions resolved at open time
#[derive(Debug, Clone, Copy)]
struct Columns {
    sku: usize,
    name: usize,
    description: Option<usize>,
    is_active: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |column: &str| headers.iter().position(|h| h == column);

        match (find(COLUMN_SKU), find(COLUMN_NAME)) {
            (Some(sku), Some(name)) => Ok(Self {
                sku,
                name,
                description: find(COLUMN_DESCRIPTION),
                is_active: find(COLUMN_IS_ACTIVE),
            }),
            (sku, name) => {
                let mut missing: Vec<&str> = Vec::new();
                if sku.is_none() {
                    missing.push(COLUMN_SKU);
                }
                if name.is_none() {
                    missing.push(COLUMN_NAME);
                }
                missing.sort_unstable();
                Err(IngestError::Schema(missing.join(", ")))
            },
        }
    }

    fn project(&self, record: &csv::StringRecord) -> RawRow {
        let field = |idx: usize| record.get(idx).unwrap_or_default().to_string();
        RawRow {
            sku: field(self.sku),
            name: field(self.name),
            description: self.description.map(field),
            is_active: self.is_active.map(field),
        }
    }
}

/// Lazy row stream over a gzip-compressed CSV source
pub struct CatalogDecoder<R: Read> {
    records: csv::StringRecordsIntoIter<GzDecoder<R>>,
    columns: Columns,
}

impl<R: Read> std::fmt::Debug for CatalogDecoder<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogDecoder")
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl CatalogDecoder<BufReader<File>> {
    /// Open a decoder over a gzip-compressed CSV file on disk
    pub fn open(path: &Path) -> Result<Self, IngestError> {
        let file = File::open(path)
            .map_err(|_| IngestError::ArtifactMissing(path.to_path_buf()))?;
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read> CatalogDecoder<R> {
    /// Wrap a raw gzip-compressed byte source.
    ///
    /// Reads and validates the header row immediately: a stream that cannot
    /// be decompressed or decoded fails here with `InputFormat`, a header
    /// without the required columns with `Schema`.
    pub fn from_reader(input: R) -> Result<Self, IngestError> {
        let mut reader = csv::Reader::from_reader(GzDecoder::new(input));

        let headers = reader.headers().map_err(classify_csv_error)?.clone();
        let columns = Columns::resolve(&headers)?;

        tracing::debug!(columns = ?headers, "catalog header validated");

        Ok(Self {
            records: reader.into_records(),
            columns,
        })
    }
}

impl<R: Read> Iterator for CatalogDecoder<R> {
    type Item = Result<RawRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => Some(Ok(self.columns.project(&record))),
            Err(e) => Some(Err(classify_csv_error(e))),
        }
    }
}

/// Map a csv-level failure onto the ingestion taxonomy.
///
/// IO and UTF-8 failures surface mid-decompression (corrupt gzip, bad
/// encoding) and are unrecoverable input problems; everything else is a
/// structural row defect.
fn classify_csv_error(e: csv::Error) -> IngestError {
    match e.kind() {
        csv::ErrorKind::Io(_) | csv::ErrorKind::Utf8 { .. } => {
            IngestError::InputFormat(e.to_string())
        },
        _ => IngestError::Parse(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};

    fn gzip_bytes(content: &str) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(content.as_bytes()).unwrap();
        encoder.finish().unwrap()
    }

    fn decoder_for(content: &str) -> Result<CatalogDecoder<Cursor<Vec<u8>>>, IngestError> {
        CatalogDecoder::from_reader(Cursor::new(gzip_bytes(content)))
    }

    #[test]
    fn test_yields_rows_with_recognized_fields() {
        let decoder = decoder_for(
            "sku,name,description,is_active\nABC-1,Widget,A widget,true\nDEF-2,Gadget,,false\n",
        )
        .unwrap();

        let rows: Vec<RawRow> = decoder.map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sku, "ABC-1");
        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].description.as_deref(), Some("A widget"));
        assert_eq!(rows[0].is_active.as_deref(), Some("true"));
        assert_eq!(rows[1].description.as_deref(), Some(""));
    }

    #[test]
    fn test_optional_columns_absent() {
        let decoder = decoder_for("sku,name\nABC-1,Widget\n").unwrap();
        let rows: Vec<RawRow> = decoder.map(|r| r.unwrap()).collect();
        assert_eq!(rows[0].description, None);
        assert_eq!(rows[0].is_active, None);
    }

    #[test]
    fn test_missing_required_column_fails_at_open() {
        let err = decoder_for("sku,description\nABC-1,hello\n").unwrap_err();
        match err {
            IngestError::Schema(missing) => assert_eq!(missing, "name"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_both_required_columns_sorted() {
        let err = decoder_for("id,label\n1,hello\n").unwrap_err();
        match err {
            IngestError::Schema(missing) => assert_eq!(missing, "name, sku"),
            other => panic!("expected Schema error, got {other:?}"),
        }
    }

    #[test]
    fn test_not_gzip_fails_with_input_format() {
        let err = CatalogDecoder::from_reader(Cursor::new(b"plain,csv\n1,2\n".to_vec()))
            .unwrap_err();
        assert!(matches!(err, IngestError::InputFormat(_)));
    }

    #[test]
    fn test_malformed_row_fails_with_parse_after_valid_rows() {
        let decoder =
            decoder_for("sku,name\nABC-1,Widget\nDEF-2,Gadget,extra-field\n").unwrap();
        let results: Vec<_> = decoder.collect();

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(IngestError::Parse(_))));
    }

    #[test]
    fn test_empty_stream_reports_missing_header() {
        let err = decoder_for("").unwrap_err();
        assert!(matches!(err, IngestError::Schema(_)));
    }

    #[test]
    fn test_header_only_stream_yields_no_rows() {
        let decoder = decoder_for("sku,name,description,is_active\n").unwrap();
        assert_eq!(decoder.count(), 0);
    }
}
