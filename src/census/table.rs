use super::CensusError;
use std::io::Read;

/// The census sheet as it comes from the provider: a header row plus rows of
/// possibly-missing cells. Blank and whitespace-only cells are `None`.
#[derive(Debug, Clone, Default)]
pub struct RawCensusTable {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl RawCensusTable {
    /// Rows are padded or cut to the header width, like `from_reader` does.
    pub fn new(columns: Vec<String>, mut rows: Vec<Vec<Option<String>>>) -> Self {
        for row in rows.iter_mut() {
            row.resize(columns.len(), None);
        }
        RawCensusTable { columns, rows }
    }

    /// Reads a CSV table with a header row. Short rows are padded with missing
    /// cells, so a truncated line is repaired or dropped later rather than
    /// failing the whole load.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CensusError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_owned())
            .collect();

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let mut row: Vec<Option<String>> = record.iter().map(cell_value).collect();
            row.resize(columns.len(), None);
            rows.push(row);
        }

        Ok(RawCensusTable { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_value(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
