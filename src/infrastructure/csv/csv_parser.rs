// ============================================================
// CSV PARSER
// ============================================================
// Streams CSV records and maps source headers onto an entity's fields

use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder, Trim};
use encoding_rs::WINDOWS_1252;

use crate::domain::entity::Entity;
use crate::domain::error::{AppError, Result};
use crate::domain::value::CellValue;

/// One CSV record already mapped and coerced to an entity's field order
#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    /// 1-based data row number (header excluded)
    pub number: u64,
    pub values: Vec<CellValue>,
}

/// CSV reader settings
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Open a file for streaming as rows of `entity`
    pub fn open(&self, path: &Path, entity: Entity) -> Result<MappedCsvReader<File>> {
        let file = File::open(path).map_err(|e| {
            AppError::IoError(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.from_reader(file, entity)
    }

    pub fn from_reader<R: Read>(&self, reader: R, entity: Entity) -> Result<MappedCsvReader<R>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::Headers)
            .flexible(true) // Allow rows with different lengths
            .from_reader(reader);

        let headers = reader
            .byte_headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| decode_field(h).trim_start_matches('\u{feff}').trim().to_string())
            .collect::<Vec<_>>();

        let mapping = headers
            .iter()
            .map(|h| entity.field_for_header(h))
            .collect::<Vec<_>>();

        Ok(MappedCsvReader {
            reader,
            entity,
            headers,
            mapping,
            record: ByteRecord::new(),
            rows_read: 0,
        })
    }
}

/// Streaming reader yielding [`MappedRow`]s.
///
/// Source columns without a mapping are dropped; mapped fields missing
/// from the file stay NULL.
pub struct MappedCsvReader<R> {
    reader: Reader<R>,
    entity: Entity,
    headers: Vec<String>,
    /// CSV column index -> entity field index
    mapping: Vec<Option<usize>>,
    record: ByteRecord,
    rows_read: u64,
}

impl<R: Read> MappedCsvReader<R> {
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Source headers that have no target field
    pub fn unmapped_headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .zip(&self.mapping)
            .filter(|(_, target)| target.is_none())
            .map(|(h, _)| h.as_str())
            .collect()
    }

    /// Target fields that no source header feeds
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.entity
            .fields()
            .iter()
            .enumerate()
            .filter(|(idx, _)| !self.mapping.contains(&Some(*idx)))
            .map(|(_, f)| f.name)
            .collect()
    }

    pub fn next_row(&mut self) -> Result<Option<MappedRow>> {
        let has_record = self.reader.read_byte_record(&mut self.record).map_err(|e| {
            AppError::ParseError(format!(
                "Failed to parse {} row {}: {}",
                self.entity.csv_file(),
                self.rows_read + 1,
                e
            ))
        })?;
        if !has_record {
            return Ok(None);
        }
        self.rows_read += 1;

        let fields = self.entity.fields();
        let mut values = vec![CellValue::Null; fields.len()];
        for (raw, target) in self.record.iter().zip(&self.mapping) {
            if let Some(idx) = *target {
                values[idx] = CellValue::coerce(&decode_field(raw), fields[idx].kind);
            }
        }

        Ok(Some(MappedRow {
            number: self.rows_read,
            values,
        }))
    }
}

impl<R: Read> Iterator for MappedCsvReader<R> {
    type Item = Result<MappedRow>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

/// UTF-8 when valid, Windows-1252 otherwise
fn decode_field(raw: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(raw) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(raw).0,
    }
}
