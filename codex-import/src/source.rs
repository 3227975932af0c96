//! Readers for pipe-delimited source tables.
//!
//! Two strategies are provided:
//!
//! - [`SourceRows`]: a lazy, schema-driven line parser built on `csv`. Used
//!   for every table whose cells never span lines.
//! - [`read_raw_rows`]: reads the whole file and splits it on a row separator
//!   chosen by the caller. Used for tables whose cells legitimately contain
//!   line breaks (the model profile table lists several profile names in one
//!   cell, separated by `\n`, while rows end in `\r\n`).
//!
//! Both yield [`Record`]s keyed by the schema's field names. Rows with fewer
//! cells than the schema needs are dropped with a warning and counted.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::error::SourceError;

/// Field delimiter of every source table.
pub const DELIMITER: u8 = b'|';

const BOM: char = '\u{feff}';
const BOM_BYTES: &[u8] = b"\xEF\xBB\xBF";

/// Ordered field names of one source table.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    /// Table name used in log messages.
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

impl Schema {
    /// Whether `first_cell` is this table's header cell.
    fn is_header_cell(&self, first_cell: &str) -> bool {
        let cell = first_cell.trim().trim_start_matches(BOM).trim();
        self.fields
            .first()
            .is_some_and(|f| cell.eq_ignore_ascii_case(f))
    }
}

/// One source row, keyed by schema field name. Values are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    values: HashMap<&'static str, String>,
    line: u64,
}

impl Record {
    /// Build a record from explicit field/value pairs.
    pub fn from_pairs(pairs: &[(&'static str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (*k, v.trim().to_string()))
                .collect(),
            line: 0,
        }
    }

    /// Value of `field`, or `""` if the record has no such field.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    /// 1-based source line the row started on (0 if unknown).
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Where each schema field lives in a row.
#[derive(Debug, Clone)]
struct ColumnMap {
    positions: Vec<Option<usize>>,
    min_len: usize,
}

impl ColumnMap {
    fn positional(schema: &Schema) -> Self {
        Self {
            positions: (0..schema.fields.len()).map(Some).collect(),
            min_len: schema.fields.len(),
        }
    }

    fn from_header(schema: &Schema, header: &StringRecord) -> Self {
        let names: Vec<String> = header
            .iter()
            .map(|h| h.trim_start_matches(BOM).trim().to_ascii_lowercase())
            .collect();

        let positions: Vec<Option<usize>> = schema
            .fields
            .iter()
            .map(|field| {
                let pos = names.iter().position(|n| n.eq_ignore_ascii_case(field));
                if pos.is_none() {
                    log::warn!(
                        "{}: header has no '{}' column; values will be empty",
                        schema.table,
                        field
                    );
                }
                pos
            })
            .collect();

        let min_len = positions.iter().flatten().max().map_or(0, |p| p + 1);
        Self { positions, min_len }
    }
}

/// Lazy schema-driven reader over a pipe-delimited table.
pub struct SourceRows<R: Read = File> {
    schema: Schema,
    records: csv::StringRecordsIntoIter<R>,
    columns: Option<ColumnMap>,
    malformed: usize,
}

impl SourceRows<File> {
    /// Open a table file.
    pub fn open(path: &Path, schema: Schema) -> Result<Self, SourceError> {
        let file = File::open(path).map_err(|e| SourceError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::from_reader(file, schema))
    }
}

impl<R: Read> SourceRows<R> {
    /// Read a table from any byte source.
    pub fn from_reader(reader: R, schema: Schema) -> Self {
        let records = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_records();

        Self {
            schema,
            records,
            columns: None,
            malformed: 0,
        }
    }

    /// Number of rows dropped so far because they were malformed.
    pub fn malformed(&self) -> usize {
        self.malformed
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl<R: Read> Iterator for SourceRows<R> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        loop {
            let row = match self.records.next()? {
                Ok(row) => row,
                Err(e) => {
                    log::warn!("{}: skipping unreadable row: {}", self.schema.table, e);
                    self.malformed += 1;
                    continue;
                }
            };
            let line = row.position().map_or(0, |p| p.line());

            if self.columns.is_none() {
                let is_header = self.schema.is_header_cell(row.get(0).unwrap_or(""));
                self.columns = Some(if is_header {
                    ColumnMap::from_header(&self.schema, &row)
                } else {
                    ColumnMap::positional(&self.schema)
                });
                if is_header {
                    continue;
                }
            }
            let Some(columns) = self.columns.as_ref() else {
                continue;
            };

            if row.len() < columns.min_len {
                log::warn!(
                    "{}: skipping malformed row at line {} ({} fields, expected {})",
                    self.schema.table,
                    line,
                    row.len(),
                    columns.min_len
                );
                self.malformed += 1;
                continue;
            }

            let values = self
                .schema
                .fields
                .iter()
                .zip(&columns.positions)
                .map(|(field, pos)| {
                    let value = pos.and_then(|p| row.get(p)).unwrap_or("");
                    (*field, value.trim().to_string())
                })
                .collect();

            return Some(Record { values, line });
        }
    }
}

/// Rows produced by the raw-buffer strategy.
#[derive(Debug)]
pub struct RawRows {
    records: std::vec::IntoIter<Record>,
    malformed: usize,
}

impl RawRows {
    pub fn malformed(&self) -> usize {
        self.malformed
    }
}

impl Iterator for RawRows {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.records.next()
    }
}

/// Read a whole table file and split it with [`parse_raw`].
pub fn read_raw_rows(
    path: &Path,
    schema: Schema,
    row_separator: &str,
) -> Result<RawRows, SourceError> {
    let contents = std::fs::read(path).map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(parse_raw(&contents, schema, row_separator))
}

/// Split `contents` on every occurrence of `separator`.
fn split_rows<'a>(contents: &'a [u8], separator: &[u8]) -> Vec<&'a [u8]> {
    if separator.is_empty() {
        return vec![contents];
    }
    let mut rows = Vec::new();
    let mut rest = contents;
    while let Some(at) = rest
        .windows(separator.len())
        .position(|window| window == separator)
    {
        rows.push(&rest[..at]);
        rest = &rest[at + separator.len()..];
    }
    rows.push(rest);
    rows
}

/// Split a buffered table into records.
///
/// Rows are separated by `row_separator`; anything else inside a cell,
/// including bare `\n`, is kept. Each row is decoded on its own, so a row
/// with invalid UTF-8 is dropped and counted without affecting its
/// neighbours. Mapping is positional, and a leading header row is dropped.
pub fn parse_raw(contents: &[u8], schema: Schema, row_separator: &str) -> RawRows {
    let contents = contents.strip_prefix(BOM_BYTES).unwrap_or(contents);
    let delimiter = char::from(DELIMITER);
    let mut records = Vec::new();
    let mut malformed = 0;

    for (index, bytes) in split_rows(contents, row_separator.as_bytes())
        .into_iter()
        .enumerate()
    {
        let line = index as u64 + 1;
        let row = match std::str::from_utf8(bytes) {
            Ok(row) => row,
            Err(e) => {
                log::warn!(
                    "{}: skipping undecodable row {}: {}",
                    schema.table,
                    line,
                    e
                );
                malformed += 1;
                continue;
            }
        };
        if row.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = row.split(delimiter).collect();
        if index == 0 && schema.is_header_cell(cells[0]) {
            continue;
        }
        if cells.len() < schema.fields.len() {
            log::warn!(
                "{}: skipping malformed row {} ({} fields, expected {})",
                schema.table,
                line,
                cells.len(),
                schema.fields.len()
            );
            malformed += 1;
            continue;
        }

        let values = schema
            .fields
            .iter()
            .zip(&cells)
            .map(|(field, cell)| (*field, cell.trim().to_string()))
            .collect();
        records.push(Record { values, line });
    }

    RawRows {
        records: records.into_iter(),
        malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAIRS: Schema = Schema {
        table: "Pairs",
        fields: &["leader_id", "attached_id"],
    };

    const MODELS: Schema = Schema {
        table: "Models",
        fields: &["datasheet_id", "line", "name", "M"],
    };

    fn rows(input: &str, schema: Schema) -> (Vec<Record>, usize) {
        let mut reader = SourceRows::from_reader(input.as_bytes(), schema);
        let records: Vec<Record> = reader.by_ref().collect();
        (records, reader.malformed())
    }

    #[test]
    fn positional_rows_without_header() {
        let (records, malformed) = rows("A|B|\r\nC|D|\r\n", PAIRS);
        assert_eq!(malformed, 0);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("leader_id"), "A");
        assert_eq!(records[1].get("attached_id"), "D");
    }

    #[test]
    fn header_row_is_skipped_and_reorders_columns() {
        let (records, _) = rows("\u{feff}attached_id|leader_id|\nX|Y|\n", PAIRS);
        // First cell "attached_id" is not the schema's first field, so this
        // is read positionally as data.
        assert_eq!(records.len(), 2);

        let (records, _) = rows("\u{feff}leader_id|note|attached_id|\nL1|hi|A1|\n", PAIRS);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("leader_id"), "L1");
        assert_eq!(records[0].get("attached_id"), "A1");
    }

    #[test]
    fn short_rows_are_dropped() {
        let (records, malformed) = rows("A|B\nlonely\nC|D\n", PAIRS);
        assert_eq!(records.len(), 2);
        assert_eq!(malformed, 1);
    }

    #[test]
    fn quotes_are_literal() {
        let (records, _) = rows("A|24\" range|\n", PAIRS);
        assert_eq!(records[0].get("attached_id"), "24\" range");
    }

    #[test]
    fn values_are_trimmed() {
        let (records, _) = rows("  A  |\tB \r\n", PAIRS);
        assert_eq!(records[0].get("leader_id"), "A");
        assert_eq!(records[0].get("attached_id"), "B");
    }

    #[test]
    fn raw_rows_keep_embedded_newlines() {
        let input = "datasheet_id|line|name|M|\r\nU1|1|Captain\nLieutenant|6\"|\r\nU2|1|Tyrant|8\"|\r\n";
        let raw = parse_raw(input.as_bytes(), MODELS, "\r\n");
        assert_eq!(raw.malformed(), 0);
        let records: Vec<Record> = raw.collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("name"), "Captain\nLieutenant");
        assert_eq!(records[1].get("M"), "8\"");
    }

    #[test]
    fn raw_rows_drop_short_rows() {
        let raw = parse_raw(b"U1|1|Captain|6\"\r\nU2|1\r\n", MODELS, "\r\n");
        assert_eq!(raw.malformed(), 1);
        assert_eq!(raw.count(), 1);
    }

    #[test]
    fn raw_rows_drop_undecodable_row_only() {
        let input = b"U1|1|Captain|6\"\r\nU2|1|Tyr\xffant|8\"\r\nU3|1|Warboss|5\"\r\n";
        let raw = parse_raw(input, MODELS, "\r\n");
        assert_eq!(raw.malformed(), 1);
        let ids: Vec<String> = raw.map(|r| r.get("datasheet_id").to_string()).collect();
        assert_eq!(ids, vec!["U1", "U3"]);
    }

    #[test]
    fn raw_rows_strip_byte_order_mark() {
        let raw = parse_raw(b"\xEF\xBB\xBFU1|1|Captain|6\"\r\n", MODELS, "\r\n");
        let records: Vec<Record> = raw.collect();
        assert_eq!(records[0].get("datasheet_id"), "U1");
    }

    #[test]
    fn missing_record_field_reads_empty() {
        let record = Record::from_pairs(&[("id", " X ")]);
        assert_eq!(record.get("id"), "X");
        assert_eq!(record.get("name"), "");
    }
}
