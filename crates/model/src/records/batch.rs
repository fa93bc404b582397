use crate::records::row::RowData;
use chrono::{DateTime, Utc};

/// Bounded group of projected rows written in one destination operation.
///
/// Never empty when emitted; rows preserve source order within the
/// owning worker.
#[derive(Debug, Clone)]
pub struct Batch {
    pub worker_id: usize,
    pub seq: usize,
    pub rows: Vec<RowData>,
    pub ts: DateTime<Utc>,
}

impl Batch {
    pub fn new(worker_id: usize, seq: usize, rows: Vec<RowData>) -> Self {
        debug_assert!(!rows.is_empty(), "batches are never emitted empty");
        Batch {
            worker_id,
            seq,
            rows,
            ts: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first_ordinal(&self) -> usize {
        self.rows.first().map_or(0, |r| r.ordinal)
    }

    pub fn last_ordinal(&self) -> usize {
        self.rows.last().map_or(0, |r| r.ordinal)
    }
}
