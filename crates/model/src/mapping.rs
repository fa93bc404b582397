use crate::{
    core::value::Value,
    records::row::{RowData, SourceRow},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pairs one source field position with a destination column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldBinding {
    pub source_index: usize,
    pub column: String,
}

/// Destination column populated by a fixed per-run value instead of a
/// source field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantColumn {
    pub column: String,
    pub value: String,
}

/// Fixed, per-run mapping from source field positions to destination
/// columns. Immutable for the duration of a run; validated against a
/// sample row before the stream is consumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub bindings: Vec<FieldBinding>,
    #[serde(default)]
    pub constants: Vec<ConstantColumn>,
}

impl ColumnMapping {
    /// Destination columns in write order: bound columns first, then
    /// constant columns.
    pub fn destination_columns(&self) -> Vec<String> {
        self.bindings
            .iter()
            .map(|b| b.column.clone())
            .chain(self.constants.iter().map(|c| c.column.clone()))
            .collect()
    }

    /// Number of destination columns each projected row carries.
    pub fn field_width(&self) -> usize {
        self.bindings.len() + self.constants.len()
    }

    /// Smallest source field count a row must have to be projectable.
    pub fn min_source_fields(&self) -> usize {
        self.bindings
            .iter()
            .map(|b| b.source_index + 1)
            .max()
            .unwrap_or(0)
    }

    /// Checks the mapping against the field count of a sample row.
    pub fn validate_sample(&self, field_count: usize) -> Result<(), MappingError> {
        for binding in &self.bindings {
            if binding.source_index >= field_count {
                return Err(MappingError::SourceIndexOutOfRange {
                    index: binding.source_index,
                    field_count,
                });
            }
        }
        Ok(())
    }

    /// Projects a parsed row into destination field order. A row with
    /// too few fields is a per-row soft failure, not fatal to the run.
    pub fn project(&self, row: &SourceRow) -> Result<RowData, ProjectionError> {
        let expected = self.min_source_fields();
        if row.fields.len() < expected {
            return Err(ProjectionError::FieldCountMismatch {
                ordinal: row.ordinal,
                expected,
                actual: row.fields.len(),
            });
        }

        let mut values = Vec::with_capacity(self.field_width());
        for binding in &self.bindings {
            let cell = &row.fields[binding.source_index];
            // Empty cells become NULL so both write strategies agree on
            // destination content.
            values.push(if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell.clone())
            });
        }
        for constant in &self.constants {
            values.push(Value::String(constant.value.clone()));
        }
        Ok(RowData::new(row.ordinal, values))
    }
}

/// What one multi-row write targets.
#[derive(Debug, Clone)]
pub struct DestinationSpec {
    pub table: String,
    pub columns: Vec<String>,
}

impl DestinationSpec {
    pub fn new(table: &str, mapping: &ColumnMapping) -> Self {
        DestinationSpec {
            table: table.to_string(),
            columns: mapping.destination_columns(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    SourceIndexOutOfRange { index: usize, field_count: usize },
}

impl fmt::Display for MappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappingError::SourceIndexOutOfRange { index, field_count } => write!(
                f,
                "mapping references source field {index} but the sample row has {field_count} fields"
            ),
        }
    }
}

impl std::error::Error for MappingError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectionError {
    FieldCountMismatch {
        ordinal: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for ProjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionError::FieldCountMismatch {
                ordinal,
                expected,
                actual,
            } => write!(
                f,
                "row {ordinal}: expected at least {expected} fields, found {actual}"
            ),
        }
    }
}

impl std::error::Error for ProjectionError {}
