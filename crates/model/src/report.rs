use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle of one import run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Idle,
    Validating,
    Running,
    Draining,
    Completed,
    Aborted,
}

impl RunStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStage::Idle => "idle",
            RunStage::Validating => "validating",
            RunStage::Running => "running",
            RunStage::Draining => "draining",
            RunStage::Completed => "completed",
            RunStage::Aborted => "aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Duplicate key, type mismatch or similar destination-side
    /// violation. Soft at batch granularity.
    Constraint,
    /// Transient failures persisted past the retry budget.
    RetriesExhausted,
    Other,
}

/// A row skipped during parsing or projection.
#[derive(Debug, Clone, Serialize)]
pub struct RejectedRow {
    pub ordinal: usize,
    pub reason: String,
}

/// A batch whose single write operation ultimately failed. Its row
/// range is recorded for later inspection; sibling batches continue.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub worker_id: usize,
    pub seq: usize,
    pub first_ordinal: usize,
    pub last_ordinal: usize,
    pub rows: usize,
    pub kind: FailureKind,
    pub message: String,
}

/// Aggregate, immutable outcome of one import run. Always produced,
/// even on partial failure, so the caller can tell a clean run from a
/// run with rejected rows from an aborted run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub strategy: String,
    pub stage: RunStage,
    pub worker_count: usize,
    pub rows_read: u64,
    pub rows_inserted: u64,
    pub rows_rejected: u64,
    pub rows_failed: u64,
    pub batches_executed: u64,
    pub rejected_rows: Vec<RejectedRow>,
    pub batch_failures: Vec<BatchFailure>,
    pub fatal: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new(strategy: &str, worker_count: usize) -> Self {
        RunReport {
            run_id: Uuid::new_v4(),
            strategy: strategy.to_string(),
            stage: RunStage::Idle,
            worker_count,
            rows_read: 0,
            rows_inserted: 0,
            rows_rejected: 0,
            rows_failed: 0,
            batches_executed: 0,
            rejected_rows: Vec::new(),
            batch_failures: Vec::new(),
            fatal: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn finalize(mut self, stage: RunStage) -> Self {
        self.stage = stage;
        self.finished_at = Some(Utc::now());
        self
    }

    pub fn is_clean(&self) -> bool {
        self.stage == RunStage::Completed
            && self.rows_rejected == 0
            && self.batch_failures.is_empty()
            && self.fatal.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finalized_report_carries_stage_and_timestamp() {
        let report = RunReport::new("batched-insert", 2);
        assert_eq!(report.stage, RunStage::Idle);
        assert!(report.finished_at.is_none());

        let report = report.finalize(RunStage::Completed);
        assert_eq!(report.stage, RunStage::Completed);
        assert!(report.finished_at.is_some());
        assert!(report.is_clean());
    }

    #[test]
    fn rejected_rows_make_a_run_unclean() {
        let mut report = RunReport::new("batched-insert", 1);
        report.rows_rejected = 1;
        let report = report.finalize(RunStage::Completed);
        assert!(!report.is_clean());
    }
}
