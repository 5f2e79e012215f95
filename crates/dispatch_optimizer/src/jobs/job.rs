use jiff::Timestamp;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::json::types::SolveResponse;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Cancelled,
    Failed,
}

impl JobStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, JobStatus::Pending | JobStatus::Running)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("job {0} not found")]
    NotFound(String),
}

/// Answer to an asynchronous submission.
#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq, Eq)]
pub struct SolveAccepted {
    pub job_id: String,
    pub status: JobStatus,
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, PartialEq)]
pub struct JobResult {
    pub job_id: String,
    pub status: JobStatus,
    /// Only for `COMPLETED` jobs
    pub response: Option<SolveResponse>,
    /// Only for `FAILED` jobs
    pub error: Option<String>,
    pub submitted_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
}

/// Row of the job table. A tombstone is a `Cancelled` entry created by a
/// cancel for an id nobody submitted yet.
#[derive(Debug, Clone)]
pub(crate) struct JobEntry {
    pub status: JobStatus,
    pub cancel_requested: bool,
    /// False only for tombstones that never saw a submission
    pub submitted: bool,
    pub submitted_at: Option<Timestamp>,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub response: Option<SolveResponse>,
    pub error: Option<String>,
}

impl JobEntry {
    pub fn pending() -> Self {
        JobEntry {
            status: JobStatus::Pending,
            cancel_requested: false,
            submitted: true,
            submitted_at: Some(Timestamp::now()),
            started_at: None,
            finished_at: None,
            response: None,
            error: None,
        }
    }

    pub fn tombstone() -> Self {
        JobEntry {
            status: JobStatus::Cancelled,
            cancel_requested: true,
            submitted: false,
            submitted_at: None,
            started_at: None,
            finished_at: Some(Timestamp::now()),
            response: None,
            error: None,
        }
    }

    /// Marks the job cancelled. A cancelled job keeps this status for good.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
        self.status = JobStatus::Cancelled;
        self.finished_at.get_or_insert_with(Timestamp::now);
    }

    pub fn finish(&mut self, status: JobStatus) {
        self.status = status;
        self.finished_at = Some(Timestamp::now());
    }

    pub fn to_result(&self, job_id: &str) -> JobResult {
        JobResult {
            job_id: job_id.to_owned(),
            status: self.status,
            response: self.response.clone(),
            error: self.error.clone(),
            submitted_at: self.submitted_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
        }
    }
}
