//! Delimited-file ingestion.

use std::path::Path;

use super::table::{Column, Dataset};
use super::value::infer_column;
use super::DatasetError;

/// How to read a delimited file.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadOptions {
    /// Field separator, a single character.
    pub separator: char,
    /// Whether the first column is a row index to be dropped.
    pub has_index: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            has_index: false,
        }
    }
}

/// Raw first rows of a file, for the import preview table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn separator_byte(options: &LoadOptions) -> Result<u8, DatasetError> {
    u8::try_from(options.separator as u32).map_err(|_| DatasetError::BadSeparator)
}

fn read_raw(
    path: &Path,
    options: &LoadOptions,
    limit: Option<usize>,
) -> Result<(Vec<String>, Vec<Vec<String>>), DatasetError> {
    let delimiter = separator_byte(options)?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_path(path)
        .map_err(|source| map_csv_error(path, source))?;

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(|source| map_csv_error(path, source))?
        .iter()
        .map(|field| field.to_string())
        .collect();
    let skip = usize::from(options.has_index);
    headers.drain(..skip.min(headers.len()));
    // An unnamed pandas-style index header survives the index toggle.
    for (idx, header) in headers.iter_mut().enumerate() {
        if header.is_empty() {
            *header = format!("column_{idx}");
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| map_csv_error(path, source))?;
        let row: Vec<String> = record.iter().skip(skip).map(|f| f.to_string()).collect();
        rows.push(row);
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
    }
    Ok((headers, rows))
}

fn map_csv_error(path: &Path, source: csv::Error) -> DatasetError {
    if source.is_io_error() {
        let io = match source.into_kind() {
            csv::ErrorKind::Io(io) => io,
            _ => std::io::Error::other("I/O error while reading delimited file"),
        };
        return DatasetError::Read {
            path: path.to_path_buf(),
            source: io,
        };
    }
    DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

/// Read the first `limit` rows as raw text for the import preview.
pub fn preview_csv(
    path: &Path,
    options: &LoadOptions,
    limit: usize,
) -> Result<CsvPreview, DatasetError> {
    let (headers, rows) = read_raw(path, options, Some(limit))?;
    Ok(CsvPreview { headers, rows })
}

/// Load a delimited file into a typed dataset.
///
/// Column types are inferred over whole columns: numeric iff every cell
/// parses as a number, datetime iff every cell parses as a date, otherwise
/// categorical. A file without data rows is a validation error.
pub fn load_csv(path: &Path, options: &LoadOptions) -> Result<Dataset, DatasetError> {
    let (headers, rows) = read_raw(path, options, None)?;
    if rows.is_empty() {
        return Err(DatasetError::NoRows {
            path: path.to_path_buf(),
        });
    }

    let mut columns = Vec::with_capacity(headers.len());
    for (index, name) in headers.into_iter().enumerate() {
        let cells: Vec<String> = rows
            .iter()
            .map(|row| row.get(index).cloned().unwrap_or_default())
            .collect();
        columns.push(Column {
            name,
            data: infer_column(cells),
        });
    }
    Dataset::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ColumnKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_typed_columns() {
        let file = write_file(
            "load,error_ridge,error_forest,site,day\n\
             1.5,0.1,-0.2,north,2026-01-01\n\
             2.5,0.2,0.3,south,2026-01-02\n",
        );
        let dataset = load_csv(file.path(), &LoadOptions::default()).unwrap();
        assert_eq!(dataset.row_count(), 2);
        assert_eq!(dataset.column("load").unwrap().data.kind(), ColumnKind::Numeric);
        assert_eq!(dataset.column("site").unwrap().data.kind(), ColumnKind::Categorical);
        assert_eq!(dataset.column("day").unwrap().data.kind(), ColumnKind::DateTime);
    }

    #[test]
    fn index_column_is_dropped() {
        let file = write_file(",load,error_a,error_b\n0,1.0,0.1,0.2\n1,2.0,0.3,0.4\n");
        let options = LoadOptions {
            separator: ',',
            has_index: true,
        };
        let dataset = load_csv(file.path(), &options).unwrap();
        assert!(dataset.column("load").is_some());
        assert_eq!(dataset.columns().len(), 3);
    }

    #[test]
    fn semicolon_separator_is_honored() {
        let file = write_file("load;error_a;error_b\n1.0;0.1;0.2\n");
        let options = LoadOptions {
            separator: ';',
            has_index: false,
        };
        let dataset = load_csv(file.path(), &options).unwrap();
        assert_eq!(dataset.columns().len(), 3);
    }

    #[test]
    fn empty_file_reports_no_rows() {
        let file = write_file("load,error_a,error_b\n");
        let result = load_csv(file.path(), &LoadOptions::default());
        assert!(matches!(result, Err(DatasetError::NoRows { .. })));
    }

    #[test]
    fn non_ascii_separator_is_rejected() {
        let file = write_file("a\n1\n");
        let options = LoadOptions {
            separator: '→',
            has_index: false,
        };
        assert!(matches!(
            load_csv(file.path(), &options),
            Err(DatasetError::BadSeparator)
        ));
    }

    #[test]
    fn preview_limits_rows() {
        let file = write_file("a,b\n1,2\n3,4\n5,6\n7,8\n");
        let preview = preview_csv(file.path(), &LoadOptions::default(), 2).unwrap();
        assert_eq!(preview.headers, vec!["a", "b"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[1], vec!["3", "4"]);
    }
}
