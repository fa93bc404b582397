use serde::{Deserialize, Serialize};

/// Scalar value carried from a source row to a destination column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Uint(u64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}
