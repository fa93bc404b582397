use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// One parsed record from the source stream, identified by its 0-based
/// data-row ordinal (the header line is never counted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRow {
    pub ordinal: usize,
    pub fields: Vec<String>,
}

/// A source row projected through the column mapping into destination
/// field order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub ordinal: usize,
    pub values: Vec<Value>,
}

impl RowData {
    pub fn new(ordinal: usize, values: Vec<Value>) -> Self {
        RowData { ordinal, values }
    }
}
