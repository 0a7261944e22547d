//! In-memory form of the backing CSV table

use std::collections::BTreeSet;

use thiserror::Error;

use super::models::{Record, COLUMNS};

#[derive(Error, Debug)]
pub enum TableParseError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Header has columns outside the submission schema: {0:?}")]
    UnrecognizedHeader(Vec<String>),
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Row position {position} is out of range for a table of {len} rows")]
pub struct PositionOutOfRange {
    pub position: usize,
    pub len: usize,
}

/// Ordered rows sharing the fixed column schema.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    rows: Vec<Record>,
}

impl Table {
    pub fn new(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, record: Record) {
        self.rows.push(record);
    }

    /// Parse CSV bytes with a header row.
    ///
    /// Blank input is an empty table. Columns are matched by header name,
    /// and missing ones read as empty. A header with any column outside
    /// [`COLUMNS`] is rejected, since rewriting it would drop that data.
    pub fn from_csv_slice(bytes: &[u8]) -> Result<Self, TableParseError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Headers)
            .from_reader(bytes);

        let unknown: Vec<String> = reader
            .headers()?
            .iter()
            .filter(|h| !COLUMNS.contains(h))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            return Err(TableParseError::UnrecognizedHeader(unknown));
        }

        let rows = reader
            .deserialize::<Record>()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Serialize as UTF-8 CSV: the fixed header, then one line per row.
    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, csv::Error> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());

        writer.write_record(COLUMNS)?;
        for record in &self.rows {
            writer.serialize(record)?;
        }

        writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))
    }

    /// Check that every position addresses a row of this table.
    pub fn check_positions(&self, positions: &BTreeSet<usize>) -> Result<(), PositionOutOfRange> {
        match positions.iter().next_back() {
            Some(&position) if position >= self.rows.len() => Err(PositionOutOfRange {
                position,
                len: self.rows.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Rows at `positions`, in table order.
    pub fn select(&self, positions: &BTreeSet<usize>) -> Result<Vec<&Record>, PositionOutOfRange> {
        self.check_positions(positions)?;
        Ok(positions.iter().map(|&p| &self.rows[p]).collect())
    }

    /// A copy without the rows at `positions`; the rest keep their order.
    pub fn without_positions(&self, positions: &BTreeSet<usize>) -> Result<Self, PositionOutOfRange> {
        self.check_positions(positions)?;
        let rows = self
            .rows
            .iter()
            .enumerate()
            .filter(|(i, _)| !positions.contains(i))
            .map(|(_, r)| r.clone())
            .collect();
        Ok(Self { rows })
    }

    /// Remove one row equal to each of `targets`, first match wins.
    ///
    /// Returns how many rows were removed.
    pub fn remove_matching(&mut self, targets: &[&Record]) -> usize {
        let mut removed = vec![false; self.rows.len()];
        let mut count = 0;
        for target in targets {
            let hit = self
                .rows
                .iter()
                .enumerate()
                .position(|(i, row)| !removed[i] && row == *target);
            if let Some(i) = hit {
                removed[i] = true;
                count += 1;
            }
        }

        let mut flags = removed.into_iter();
        self.rows.retain(|_| !flags.next().unwrap_or(false));
        count
    }
}
