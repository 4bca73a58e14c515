//! In-memory CSV table of articles.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::ModelError;

/// Pipeline errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("The CSV file does not contain an '{0}' column.")]
    MissingColumn(String),
    #[error("Column '{column}' needs {expected} values, got {actual}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("Row {row} has {actual} fields, but the header has {expected}")]
    RowTooLong {
        /// 1-based row number, excluding the header.
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("Failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to summarize article {row}")]
    Summary {
        /// 1-based row number, excluding the header.
        row: usize,
        #[source]
        source: ModelError,
    },
}

/// A header row plus string records, all of the same width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ArticleTable {
    /// Build a table from headers and rows. Rows must match the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, PipelineError> {
        for row in &rows {
            if row.len() != headers.len() {
                return Err(PipelineError::LengthMismatch {
                    column: "<row>".to_string(),
                    expected: headers.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Read a CSV file with a header row.
    ///
    /// Rows shorter than the header are padded with empty cells; longer rows
    /// are rejected.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let reader = Self::reader_builder()
            .from_path(path).map_err(|source| PipelineError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_csv(reader).map_err(|e| match e {
            PipelineError::Csv(source) => PipelineError::Read {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Read CSV with a header row from any reader.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, PipelineError> {
        Self::from_csv(Self::reader_builder().from_reader(reader))
    }

    fn reader_builder() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.flexible(true);
        builder
    }

    fn from_csv<R: io::Read>(mut reader: csv::Reader<R>) -> Result<Self, PipelineError> {
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let width = headers.len();

        let mut rows = Vec::new();
        for (i, record) in reader.records().enumerate() {
            let mut row: Vec<String> = record?.iter().map(str::to_string).collect();
            if row.len() > width {
                return Err(PipelineError::RowTooLong {
                    row: i + 1,
                    expected: width,
                    actual: row.len(),
                });
            }
            row.resize(width, String::new());
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, or [`PipelineError::MissingColumn`].
    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Values of a column in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Set a column, appending it if absent and replacing it otherwise.
    pub fn with_column(
        mut self,
        name: &str,
        values: Vec<String>,
    ) -> Result<Self, PipelineError> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::LengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(self)
    }

    /// Write the header and all rows as CSV.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), PipelineError> {
        let mut writer = csv::Writer::from_writer(writer);
        self.write_records(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Write the table to a CSV file, replacing any existing file.
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<(), PipelineError> {
        let path = path.as_ref();
        let write_error = |source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        };

        let mut writer = csv::Writer::from_path(path).map_err(write_error)?;
        self.write_records(&mut writer).map_err(write_error)?;
        writer.flush()?;
        Ok(())
    }

    fn write_records<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> Result<(), csv::Error> {
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        Ok(())
    }
}
