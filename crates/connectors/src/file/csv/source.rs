use crate::file::csv::error::FileError;
use model::records::row::SourceRow;
use std::{fs::File, io, path::Path};

/// One read step: either a parsed row or a per-row soft rejection.
#[derive(Debug)]
pub enum SourceItem {
    Row(SourceRow),
    Rejected { ordinal: usize, reason: String },
}

/// Forward-only reader over a delimited text file.
///
/// The first physical line is always consumed as a header and never
/// yielded as data. Quoted fields may contain the delimiter. The
/// source exclusively owns the file handle; dropping it releases the
/// handle even if the caller aborts mid-stream.
pub struct CsvSource {
    records: csv::StringRecordsIntoIter<File>,
    ordinal: usize,
}

impl std::fmt::Debug for CsvSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvSource")
            .field("ordinal", &self.ordinal)
            .finish_non_exhaustive()
    }
}

impl CsvSource {
    pub fn open(path: &Path, delimiter: u8) -> Result<Self, FileError> {
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => FileError::NotFound(path.display().to_string()),
            io::ErrorKind::PermissionDenied => {
                FileError::PermissionDenied(path.display().to_string())
            }
            _ => FileError::Io(err),
        })?;

        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(file);

        Ok(CsvSource {
            records: reader.into_records(),
            ordinal: 0,
        })
    }

    /// Ordinal of the next data row to be read.
    pub fn position(&self) -> usize {
        self.ordinal
    }

    /// Advances the read cursor by one logical row.
    ///
    /// Records the csv crate cannot decode (broken quoting, invalid
    /// UTF-8) surface as `SourceItem::Rejected`; underlying I/O
    /// failures abort the stream.
    pub fn next_item(&mut self) -> Result<Option<SourceItem>, FileError> {
        let Some(record) = self.records.next() else {
            return Ok(None);
        };
        let ordinal = self.ordinal;
        self.ordinal += 1;

        match record {
            Ok(record) => {
                let fields = record.iter().map(|f| f.to_string()).collect();
                Ok(Some(SourceItem::Row(SourceRow { ordinal, fields })))
            }
            Err(err) => {
                if matches!(err.kind(), csv::ErrorKind::Io(_)) {
                    return Err(FileError::Csv(err));
                }
                Ok(Some(SourceItem::Rejected {
                    ordinal,
                    reason: err.to_string(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    fn next_row(source: &mut CsvSource) -> SourceRow {
        match source.next_item().expect("read").expect("not eof") {
            SourceItem::Row(row) => row,
            SourceItem::Rejected { ordinal, reason } => {
                panic!("row {ordinal} unexpectedly rejected: {reason}")
            }
        }
    }

    #[test]
    fn skips_header_and_numbers_data_rows_from_zero() {
        let file = write_csv("id,name\n1,Alice\n2,Bob\n");
        let mut source = CsvSource::open(file.path(), b',').unwrap();

        let first = next_row(&mut source);
        assert_eq!(first.ordinal, 0);
        assert_eq!(first.fields, ["1", "Alice"]);

        let second = next_row(&mut source);
        assert_eq!(second.ordinal, 1);
        assert_eq!(second.fields, ["2", "Bob"]);

        assert!(source.next_item().unwrap().is_none());
        assert_eq!(source.position(), 2);
    }

    #[test]
    fn quoted_field_may_contain_the_delimiter() {
        let file = write_csv("id,company\n1,\"Acme, Inc.\"\n");
        let mut source = CsvSource::open(file.path(), b',').unwrap();

        let row = next_row(&mut source);
        assert_eq!(row.fields, ["1", "Acme, Inc."]);
    }

    #[test]
    fn supports_alternate_delimiters() {
        let file = write_csv("id;name\n1;Alice\n");
        let mut source = CsvSource::open(file.path(), b';').unwrap();

        let row = next_row(&mut source);
        assert_eq!(row.fields, ["1", "Alice"]);
    }

    #[test]
    fn invalid_utf8_is_a_soft_rejection() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"id,name\n1,\xff\xfe\n2,ok\n").unwrap();
        let mut source = CsvSource::open(file.path(), b',').unwrap();

        match source.next_item().unwrap().unwrap() {
            SourceItem::Rejected { ordinal, .. } => assert_eq!(ordinal, 0),
            SourceItem::Row(row) => panic!("expected rejection, got {row:?}"),
        }

        // The stream keeps going after a rejected record.
        let row = next_row(&mut source);
        assert_eq!(row.fields, ["2", "ok"]);
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = CsvSource::open(Path::new("/nonexistent/users.csv"), b',').unwrap_err();
        assert!(matches!(err, FileError::NotFound(_)));
    }
}
