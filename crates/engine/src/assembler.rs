use model::records::{batch::Batch, row::RowData};

/// Accumulates projected rows into bounded batches.
///
/// Owns the in-flight buffer exclusively; ownership of a completed
/// batch transfers to the executor, so no batch outlives its write
/// call.
pub struct BatchAssembler {
    worker_id: usize,
    max_rows: usize,
    seq: usize,
    buf: Vec<RowData>,
}

impl BatchAssembler {
    pub fn new(worker_id: usize, max_rows: usize) -> Self {
        debug_assert!(max_rows > 0);
        BatchAssembler {
            worker_id,
            max_rows,
            seq: 0,
            buf: Vec::with_capacity(max_rows),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns a completed batch exactly when the buffer reaches
    /// capacity; buffers internally otherwise.
    pub fn push(&mut self, row: RowData) -> Option<Batch> {
        self.buf.push(row);
        if self.buf.len() >= self.max_rows {
            self.take()
        } else {
            None
        }
    }

    /// Drains the trailing partial batch. Mandatory at end-of-stream:
    /// skipping it loses the last `< max_rows` rows.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.buf.is_empty() { None } else { self.take() }
    }

    fn take(&mut self) -> Option<Batch> {
        let rows = std::mem::replace(&mut self.buf, Vec::with_capacity(self.max_rows));
        let batch = Batch::new(self.worker_id, self.seq, rows);
        self.seq += 1;
        Some(batch)
    }
}
