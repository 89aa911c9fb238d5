//! The in-memory dataset and its column classification.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use super::value::{ColumnData, ColumnKind};
use super::DatasetError;

/// Naming convention for model error columns: `error_<model>`.
static ERROR_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^error_(.+)$").expect("error column pattern is valid"));

/// A named, typed column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// An ordered table of typed columns. Row order is load order and is never
/// re-sorted; it defines the time-step axis for grouped data.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    row_count: usize,
}

/// Columns the user designated when opening a file.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedColumns {
    /// Numeric column quantile bins and target ranges refer to.
    pub target: String,
    /// Optional grouping column defining per-individual time steps.
    pub individual: Option<String>,
    /// The two models being compared.
    pub models: [String; 2],
}

impl SelectedColumns {
    /// Error column names for the selected model pair.
    pub fn error_columns(&self) -> [String; 2] {
        [
            error_column_name(&self.models[0]),
            error_column_name(&self.models[1]),
        ]
    }
}

/// Column name holding a model's prediction errors.
pub fn error_column_name(model: &str) -> String {
    format!("error_{model}")
}

/// Extract model names from every `error_<model>` column, in column order.
pub fn detect_models(dataset: &Dataset) -> Vec<String> {
    dataset
        .columns()
        .iter()
        .filter_map(|column| {
            ERROR_COLUMN
                .captures(&column.name)
                .map(|captures| captures[1].to_string())
        })
        .collect()
}

impl Dataset {
    /// Build a dataset from columns, validating that lengths agree.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let row_count = columns.first().map(|c| c.data.len()).unwrap_or(0);
        for column in &columns {
            if column.data.len() != row_count {
                return Err(DatasetError::ColumnLengthMismatch {
                    name: column.name.clone(),
                    expected: row_count,
                    actual: column.data.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Numeric values of a column, or an error naming the offending column.
    pub fn numeric(&self, name: &str) -> Result<&[f64], DatasetError> {
        let column = self
            .column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        column
            .data
            .as_numeric()
            .ok_or_else(|| DatasetError::WrongColumnKind {
                name: name.to_string(),
                expected: ColumnKind::Numeric,
                actual: column.data.kind(),
            })
    }

    /// Dense per-row group ids for a grouping column, numbered in first-seen
    /// order. Works for any column kind; equal cells share an id.
    pub fn group_ids(&self, name: &str) -> Result<Vec<u32>, DatasetError> {
        let column = self
            .column(name)
            .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))?;
        let mut seen: HashMap<String, u32> = HashMap::new();
        let mut ids = Vec::with_capacity(self.row_count);
        for row in 0..self.row_count {
            let key = column.data.cell_text(row);
            let next = seen.len() as u32;
            let id = *seen.entry(key).or_insert(next);
            ids.push(id);
        }
        Ok(ids)
    }

    /// Maximum number of time steps: the largest group size when grouped,
    /// else the total row count.
    pub fn max_timesteps(&self, individual: Option<&str>) -> Result<usize, DatasetError> {
        let Some(name) = individual else {
            return Ok(self.row_count);
        };
        let ids = self.group_ids(name)?;
        let mut sizes: HashMap<u32, usize> = HashMap::new();
        for id in ids {
            *sizes.entry(id).or_insert(0) += 1;
        }
        Ok(sizes.values().copied().max().unwrap_or(0))
    }

    /// Columns eligible for filtering: everything except the target, the
    /// individual column, and model error columns.
    pub fn attribute_columns(&self, selected: &SelectedColumns) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|column| column.name != selected.target)
            .filter(|column| Some(column.name.as_str()) != selected.individual.as_deref())
            .filter(|column| !ERROR_COLUMN.is_match(&column.name))
            .collect()
    }

    /// Validate a column selection against this dataset: the target must be
    /// numeric, both error columns numeric, the individual column present.
    pub fn validate_selection(&self, selected: &SelectedColumns) -> Result<(), DatasetError> {
        self.numeric(&selected.target)?;
        for name in selected.error_columns() {
            self.numeric(&name)?;
        }
        if let Some(individual) = &selected.individual {
            if !self.has_column(individual) {
                return Err(DatasetError::MissingColumn(individual.clone()));
            }
        }
        Ok(())
    }

    /// Symmetric magnitude bound over both selected error columns, used for
    /// the square detail-plot limits.
    pub fn error_extent(&self, selected: &SelectedColumns) -> Result<f64, DatasetError> {
        let mut extent = 0.0_f64;
        for name in selected.error_columns() {
            for value in self.numeric(&name)? {
                extent = extent.max(value.abs());
            }
        }
        Ok(extent)
    }
}
