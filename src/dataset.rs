//! Typed tabular data: loading, column classification, and model detection.

mod load;
mod table;
mod value;

use std::path::PathBuf;

use thiserror::Error;

pub use load::{CsvPreview, LoadOptions, load_csv, preview_csv};
pub use table::{Column, Dataset, SelectedColumns, detect_models, error_column_name};
pub use value::{ColumnData, ColumnKind};

/// Parse a user-entered cell as a calendar date, the same way column
/// inference does (ISO dashed or slashed forms).
pub fn parse_cell_date(text: &str) -> Option<time::Date> {
    value::parse_date(text)
}

/// Errors raised while loading or interrogating a dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Failed to open or read the input file.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file could not be parsed as delimited text.
    #[error("Failed to parse {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    /// The separator must be a single character.
    #[error("Separator must be a single character")]
    BadSeparator,
    /// The file parsed but contains no data rows.
    #[error("{path} contains no data rows")]
    NoRows { path: PathBuf },
    /// Columns of differing lengths were supplied.
    #[error("Column {name} has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    /// A referenced column does not exist.
    #[error("Column {0} is not present in the dataset")]
    MissingColumn(String),
    /// A column does not hold the kind of data the operation requires.
    #[error("Column {name} is {actual:?}, expected {expected:?}")]
    WrongColumnKind {
        name: String,
        expected: ColumnKind,
        actual: ColumnKind,
    },
    /// Fewer than two `error_<model>` columns were found.
    #[error("The file exposes {found} model error column(s); at least two are required")]
    TooFewModels { found: usize },
}
