// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Streaming CSV reading with header mapping and encoding fallback

mod csv_parser;

pub use csv_parser::{CsvParser, MappedCsvReader, MappedRow};
