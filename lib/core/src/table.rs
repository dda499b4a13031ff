//! In-memory table of string cells
//!
//! Delimited text is read into column names plus rows. Every cell is a
//! string; absent values are coerced to the empty string so downstream
//! stages never see a null.

use crate::{Error, Result};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

/// A rectangular table with named columns
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from columns and rows, padding short rows with empty cells
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Build a single-column table from a list of texts
    pub fn from_texts<I, S>(column: &str, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: vec![column.to_string()],
            rows: texts.into_iter().map(|t| vec![t.into()]).collect(),
        }
    }

    /// Parse comma-delimited text with a header row
    pub fn read_csv<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.is_empty() {
            return Err(Error::Table("missing header row".to_string()));
        }

        let mut table = Self::new(columns);
        for record in csv_reader.records() {
            let record = record?;
            table.push_row(record.iter().map(str::to_string).collect())?;
        }
        Ok(table)
    }

    /// Parse a CSV file from disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::read_csv(std::io::BufReader::new(file))
    }

    /// Write the table as CSV with a header row
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.columns)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Serialize the table to a CSV string
    pub fn to_csv_string(&self) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Table(e.to_string()))
    }

    /// Write the table to a CSV file, creating parent directories as needed
    pub fn write_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        self.write_csv(std::io::BufWriter::new(file))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn last_column(&self) -> Option<&str> {
        self.columns.last().map(String::as_str)
    }

    /// Cell value, or the empty string when out of range
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> Option<&mut String> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(column))
    }

    /// All values of one column, in row order
    pub fn column_values(&self, column: usize) -> Vec<String> {
        (0..self.len()).map(|row| self.cell(row, column).to_string()).collect()
    }

    /// Values of a column looked up by name
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))?;
        Ok(self.column_values(idx))
    }

    /// Append a row, padding it to the column count
    pub fn push_row(&mut self, mut row: Vec<String>) -> Result<()> {
        if row.len() > self.columns.len() {
            return Err(Error::Table(format!(
                "row {} has {} cells but the header has {} columns",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
        Ok(())
    }

    /// Append a new column, or overwrite the column of the same name
    ///
    /// Returns the index of the column.
    pub fn set_column(&mut self, name: &str, values: Vec<String>) -> Result<usize> {
        if values.len() != self.rows.len() {
            return Err(Error::Table(format!(
                "column '{}' has {} values but the table has {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
                Ok(idx)
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
                Ok(self.columns.len() - 1)
            }
        }
    }

    /// Keep only the first `n` rows
    pub fn truncate(&mut self, n: usize) {
        self.rows.truncate(n);
    }

    /// Reorder rows so that row `i` of the result is row `order[i]` of `self`
    pub fn reorder_rows(&mut self, order: &[usize]) -> Result<()> {
        if order.len() != self.rows.len() {
            return Err(Error::Table(format!(
                "row order has {} entries but the table has {} rows",
                order.len(),
                self.rows.len()
            )));
        }
        let mut slots: Vec<Option<Vec<String>>> = self.rows.drain(..).map(Some).collect();
        let mut reordered = Vec::with_capacity(slots.len());
        for &idx in order {
            let row = slots
                .get_mut(idx)
                .and_then(Option::take)
                .ok_or_else(|| Error::Table(format!("row order is not a permutation at {}", idx)))?;
            reordered.push(row);
        }
        self.rows = reordered;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "id,name,resume\n1,Jane,\"Python developer\nwith SQL\"\n2,Bob,Painter\n";

    #[test]
    fn test_read_csv() {
        let table = Table::read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.columns(), &["id", "name", "resume"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.cell(0, 2), "Python developer\nwith SQL");
        assert_eq!(table.last_column(), Some("resume"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = Table::read_csv("a,b,c\n1,2\n".as_bytes()).unwrap();
        assert_eq!(table.cell(0, 2), "");
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let result = Table::read_csv("a,b\n1,2,3\n".as_bytes());
        assert!(matches!(result, Err(Error::Table(_))));
    }

    #[test]
    fn test_csv_round_trip_keeps_quoted_cells() {
        let table = Table::read_csv(SAMPLE.as_bytes()).unwrap();
        let text = table.to_csv_string().unwrap();
        let reread = Table::read_csv(text.as_bytes()).unwrap();
        assert_eq!(table, reread);
    }

    #[test]
    fn test_set_column() {
        let mut table = Table::from_texts("text", ["a", "b"]);
        let idx = table.set_column("score", vec!["1".into(), "2".into()]).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(table.column("score").unwrap(), vec!["1", "2"]);

        // Same name overwrites
        table.set_column("score", vec!["3".into(), "4".into()]).unwrap();
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(1, 1), "4");

        assert!(table.set_column("bad", vec!["x".into()]).is_err());
        assert!(matches!(table.column("missing"), Err(Error::UnknownColumn(_))));
    }

    #[test]
    fn test_reorder_rows() {
        let mut table = Table::from_texts("text", ["a", "b", "c"]);
        table.reorder_rows(&[2, 0, 1]).unwrap();
        assert_eq!(table.column_values(0), vec!["c", "a", "b"]);
        assert!(table.reorder_rows(&[0, 0, 1]).is_err());
    }

    #[test]
    fn test_write_path_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.csv");
        let table = Table::from_texts("text", ["hello"]);
        table.write_path(&path).unwrap();
        assert_eq!(Table::from_path(&path).unwrap(), table);
    }
}
