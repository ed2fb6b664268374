//! Reads the per-item sales report into [`Item`]s.
//!
//! Rows are read as raw bytes; only the four columns in use are decoded, so
//! stray non-UTF-8 bytes elsewhere (titles exported as Windows-1252, say) do
//! not block the report.

use std::{
    borrow::Cow,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use csv::{ByteRecord, ReaderBuilder, Trim};
use tracing::{debug, info, warn};

use crate::{
    config::ReportLayout,
    currency::{parse_amount, Cents},
    domain::Item,
    errors::ReportError,
};

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    id: usize,
    sales: usize,
    net: usize,
    invoice: usize,
}

/// Parses sales reports laid out according to a [`ReportLayout`].
pub struct ReportReader<'a> {
    layout: &'a ReportLayout,
}

impl<'a> ReportReader<'a> {
    pub fn new(layout: &'a ReportLayout) -> Self {
        Self { layout }
    }

    pub fn read_path(&self, path: &Path) -> Result<Vec<Item>, ReportError> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Skips the preamble lines, locates the columns by header name and turns
    /// every row with a usable identifier into an item.
    pub fn read<R: BufRead>(&self, mut reader: R) -> Result<Vec<Item>, ReportError> {
        let mut discard = Vec::new();
        for _ in 0..self.layout.header_row {
            discard.clear();
            if reader.read_until(b'\n', &mut discard)? == 0 {
                return Err(ReportError::MissingHeader(self.layout.header_row));
            }
        }
        self.read_table(reader)
    }

    fn read_table<R: Read>(&self, reader: R) -> Result<Vec<Item>, ReportError> {
        let mut csv = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .delimiter(self.layout.delimiter as u8)
            .from_reader(reader);

        let mut records = csv.byte_records();
        let header = match records.next() {
            Some(record) => record?,
            None => return Err(ReportError::MissingHeader(self.layout.header_row)),
        };
        let columns = self.resolve_columns(&header)?;

        let mut items = Vec::new();
        let mut skipped = 0usize;
        for (offset, record) in records.enumerate() {
            let record = record?;
            let row = self.layout.header_row + offset + 2;
            let raw_id = text_cell(&record, columns.id, row, &self.layout.id_column);
            let sales = numeric_cell(&record, columns.sales, row, &self.layout.sales_column);
            let net = numeric_cell(&record, columns.net, row, &self.layout.net_column);
            let invoice = numeric_cell(&record, columns.invoice, row, &self.layout.invoice_column);
            match Item::new(&raw_id, sales, net, invoice) {
                Some(item) => items.push(item),
                None => {
                    debug!(row, "row without identifier skipped");
                    skipped += 1;
                }
            }
        }

        info!(items = items.len(), skipped, "sales report read");
        Ok(items)
    }

    fn resolve_columns(&self, header: &ByteRecord) -> Result<Columns, ReportError> {
        let names: Vec<Cow<'_, str>> = header.iter().map(String::from_utf8_lossy).collect();
        let find = |name: &str| {
            let wanted = name.trim();
            names
                .iter()
                .position(|cell| cell.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
                .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
        };
        Ok(Columns {
            id: find(&self.layout.id_column)?,
            sales: find(&self.layout.sales_column)?,
            net: find(&self.layout.net_column)?,
            invoice: find(&self.layout.invoice_column)?,
        })
    }
}

/// Decodes one cell, replacing invalid UTF-8 sequences.
fn text_cell<'r>(record: &'r ByteRecord, index: usize, row: usize, column: &str) -> Cow<'r, str> {
    let raw = record.get(index).unwrap_or_default();
    let text = String::from_utf8_lossy(raw);
    if matches!(text, Cow::Owned(_)) {
        warn!(row, column, "invalid UTF-8 replaced in cell");
    }
    text
}

/// Reads a numeric cell; blanks and unparsable values count as zero so one
/// bad row never blocks the rest of the report.
fn numeric_cell(record: &ByteRecord, index: usize, row: usize, column: &str) -> Cents {
    let raw = text_cell(record, index, row, column);
    if raw.is_empty() {
        return Cents::ZERO;
    }
    match parse_amount(&raw) {
        Some(value) => value,
        None => {
            warn!(row, column, value = %raw, "non-numeric value replaced by 0.00");
            Cents::ZERO
        }
    }
}
