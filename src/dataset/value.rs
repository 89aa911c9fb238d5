//! Column storage and type classification.

use time::{Date, format_description::FormatItem, macros::format_description};

/// Kind of data a column holds after inference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    DateTime,
}

/// A column of the dataset, stored column-major with one variant per kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
    DateTime(Vec<Date>),
}

impl ColumnData {
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Numeric(_) => ColumnKind::Numeric,
            ColumnData::Categorical(_) => ColumnKind::Categorical,
            ColumnData::DateTime(_) => ColumnKind::DateTime,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
            ColumnData::DateTime(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            ColumnData::Numeric(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_categorical(&self) -> Option<&[String]> {
        match self {
            ColumnData::Categorical(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&[Date]> {
        match self {
            ColumnData::DateTime(values) => Some(values),
            _ => None,
        }
    }

    /// Display form of one cell, used for previews and group keys.
    pub fn cell_text(&self, row: usize) -> String {
        match self {
            ColumnData::Numeric(values) => values[row].to_string(),
            ColumnData::Categorical(values) => values[row].clone(),
            ColumnData::DateTime(values) => values[row].to_string(),
        }
    }
}

const DATE_FORMATS: [&[FormatItem<'static>]; 2] = [
    format_description!("[year]-[month]-[day]"),
    format_description!("[year]/[month]/[day]"),
];

/// Parse a cell as a calendar date; accepts ISO dashed or slashed forms.
pub(crate) fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| Date::parse(text, *format).ok())
}

/// Infer a column's type from its raw cells: numeric iff every cell parses
/// as a number, datetime iff every cell parses as a date, else categorical.
pub(crate) fn infer_column(cells: Vec<String>) -> ColumnData {
    let numeric: Option<Vec<f64>> = cells
        .iter()
        .map(|cell| cell.trim().parse::<f64>().ok())
        .collect();
    if let Some(values) = numeric {
        return ColumnData::Numeric(values);
    }
    let dates: Option<Vec<Date>> = cells.iter().map(|cell| parse_date(cell)).collect();
    if let Some(values) = dates {
        return ColumnData::DateTime(values);
    }
    ColumnData::Categorical(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_numeric_cells_make_a_numeric_column() {
        let column = infer_column(cells(&["1", "2.5", "-3e2"]));
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.as_numeric().unwrap()[2], -300.0);
    }

    #[test]
    fn one_text_cell_demotes_to_categorical() {
        let column = infer_column(cells(&["1", "2", "n/a"]));
        assert_eq!(column.kind(), ColumnKind::Categorical);
    }

    #[test]
    fn date_cells_make_a_datetime_column() {
        let column = infer_column(cells(&["2026-01-02", "2026/03/04"]));
        assert_eq!(column.kind(), ColumnKind::DateTime);
        let dates = column.as_datetime().unwrap();
        assert_eq!(dates[0].to_string(), "2026-01-02");
        assert_eq!(dates[1].to_string(), "2026-03-04");
    }

    #[test]
    fn mixed_date_and_text_is_categorical() {
        let column = infer_column(cells(&["2026-01-02", "soon"]));
        assert_eq!(column.kind(), ColumnKind::Categorical);
    }
}
