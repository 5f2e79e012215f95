use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use dispatch_matrix::travel_duration_client::TravelDurationSource;
use fxhash::FxHashMap;
use jiff::Timestamp;
use parking_lot::{Condvar, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    json::types::{SolveRequest, SolveResponse},
    planner::{PlanError, RoutePlanner},
};

use super::job::{JobEntry, JobError, JobResult, JobStatus, SolveAccepted};

struct JobTable {
    jobs: Mutex<FxHashMap<String, JobEntry>>,
    /// Signalled whenever a job reaches a terminal state
    finished: Condvar,
}

impl JobTable {
    fn is_cancelled(&self, job_id: &str) -> bool {
        self.jobs
            .lock()
            .get(job_id)
            .is_none_or(|entry| entry.cancel_requested)
    }
}

/// Runs solve requests on background threads, one thread per job.
///
/// The table lock is only held for reads and writes of a job entry, never
/// while a job is solving.
pub struct JobManager<S> {
    table: Arc<JobTable>,
    planner: Arc<RoutePlanner<S>>,
}

impl<S> JobManager<S>
where
    S: TravelDurationSource + 'static,
{
    pub fn new(planner: RoutePlanner<S>) -> Self {
        JobManager {
            table: Arc::new(JobTable {
                jobs: Mutex::new(FxHashMap::default()),
                finished: Condvar::new(),
            }),
            planner: Arc::new(planner),
        }
    }

    /// Accepts a request and starts its worker.
    ///
    /// An id already pending or running is not started twice. An id cancelled
    /// before submission is discarded and reported `CANCELLED`. A finished id
    /// starts a fresh run.
    pub fn submit(&self, mut request: SolveRequest) -> SolveAccepted {
        let job_id = request
            .job_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        request.job_id = Some(job_id.clone());

        {
            let mut jobs = self.table.jobs.lock();

            if let Some(entry) = jobs.get_mut(&job_id) {
                match entry.status {
                    JobStatus::Pending | JobStatus::Running => {
                        return SolveAccepted {
                            job_id,
                            status: entry.status,
                        };
                    }
                    JobStatus::Cancelled => {
                        entry.submitted = true;
                        entry.submitted_at.get_or_insert_with(Timestamp::now);
                        info!(job_id, "Discarding submission of a cancelled job");
                        return SolveAccepted {
                            job_id,
                            status: JobStatus::Cancelled,
                        };
                    }
                    JobStatus::Completed | JobStatus::Failed => {
                        info!(job_id, "Restarting finished job");
                    }
                }
            }

            jobs.insert(job_id.clone(), JobEntry::pending());
        }

        let table = Arc::clone(&self.table);
        let planner = Arc::clone(&self.planner);
        let worker_job_id = job_id.clone();

        let spawned = thread::Builder::new()
            .name(format!("job-{job_id}"))
            .spawn(move || run_job(&table, &planner, &worker_job_id, request));

        if let Err(err) = spawned {
            error!(job_id, "Cannot start worker thread: {err}");
            let mut jobs = self.table.jobs.lock();
            if let Some(entry) = jobs.get_mut(&job_id)
                && entry.status.is_active()
            {
                entry.error = Some(format!("cannot start worker thread: {err}"));
                entry.finish(JobStatus::Failed);
                self.table.finished.notify_all();
            }
        }

        SolveAccepted {
            job_id,
            status: JobStatus::Pending,
        }
    }

    /// Always succeeds. An unknown id leaves a tombstone so that a later
    /// submission of it never runs.
    pub fn cancel(&self, job_id: &str) -> JobStatus {
        let mut jobs = self.table.jobs.lock();

        match jobs.get_mut(job_id) {
            None => {
                info!(job_id, "Cancelling unknown job");
                jobs.insert(job_id.to_owned(), JobEntry::tombstone());
                JobStatus::Cancelled
            }
            Some(entry) if entry.status.is_active() => {
                info!(job_id, "Cancelling job");
                entry.cancel();
                self.table.finished.notify_all();
                JobStatus::Cancelled
            }
            Some(entry) => entry.status,
        }
    }

    pub fn status(&self, job_id: &str) -> Result<JobStatus, JobError> {
        self.table
            .jobs
            .lock()
            .get(job_id)
            .filter(|entry| entry.submitted)
            .map(|entry| entry.status)
            .ok_or_else(|| JobError::NotFound(job_id.to_owned()))
    }

    pub fn result(&self, job_id: &str) -> Result<JobResult, JobError> {
        self.table
            .jobs
            .lock()
            .get(job_id)
            .filter(|entry| entry.submitted)
            .map(|entry| entry.to_result(job_id))
            .ok_or_else(|| JobError::NotFound(job_id.to_owned()))
    }

    /// Blocks until the job is terminal or `timeout` elapses, returning the
    /// last known status.
    pub fn wait(&self, job_id: &str, timeout: Duration) -> Result<JobStatus, JobError> {
        let deadline = Instant::now() + timeout;
        let mut jobs = self.table.jobs.lock();

        loop {
            let status = jobs
                .get(job_id)
                .filter(|entry| entry.submitted)
                .map(|entry| entry.status)
                .ok_or_else(|| JobError::NotFound(job_id.to_owned()))?;

            if status.is_terminal() {
                return Ok(status);
            }

            if self
                .table
                .finished
                .wait_until(&mut jobs, deadline)
                .timed_out()
            {
                return Ok(status);
            }
        }
    }

    /// Solves on the caller's thread. A request whose `job_id` was cancelled
    /// beforehand answers with every request unserved.
    pub fn solve_blocking(&self, request: &SolveRequest) -> Result<SolveResponse, PlanError> {
        match request.job_id.as_deref() {
            Some(job_id) => {
                let is_cancelled = || {
                    self.table
                        .jobs
                        .lock()
                        .get(job_id)
                        .is_some_and(|entry| entry.status == JobStatus::Cancelled)
                };

                let response = self.planner.plan(request, &is_cancelled)?;
                if is_cancelled() {
                    return Ok(SolveResponse::all_unserved(request));
                }

                Ok(response)
            }
            None => self.planner.plan(request, &|| false),
        }
    }
}

fn run_job<S>(table: &JobTable, planner: &RoutePlanner<S>, job_id: &str, request: SolveRequest)
where
    S: TravelDurationSource,
{
    {
        let mut jobs = table.jobs.lock();
        let Some(entry) = jobs.get_mut(job_id) else {
            return;
        };

        if entry.cancel_requested {
            entry.cancel();
            table.finished.notify_all();
            info!(job_id, "Job cancelled before it started");
            return;
        }

        entry.status = JobStatus::Running;
        entry.started_at = Some(Timestamp::now());
    }

    info!(job_id, "Job started");

    let is_cancelled = || table.is_cancelled(job_id);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| planner.plan(&request, &is_cancelled)));

    let mut jobs = table.jobs.lock();
    let Some(entry) = jobs.get_mut(job_id) else {
        return;
    };

    if entry.cancel_requested {
        entry.cancel();
        info!(job_id, "Job cancelled, result discarded");
    } else {
        match outcome {
            Ok(Ok(response)) => {
                info!(
                    job_id,
                    "Job completed with {} trips, {} unserved",
                    response.routes.len(),
                    response.unserved.len()
                );
                entry.response = Some(response);
                entry.finish(JobStatus::Completed);
            }
            Ok(Err(err)) => {
                warn!(job_id, "Job failed: {err}");
                entry.error = Some(err.to_string());
                entry.finish(JobStatus::Failed);
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                error!(job_id, "Job panicked: {message}");
                entry.error = Some(format!("solver panicked: {message}"));
                entry.finish(JobStatus::Failed);
            }
        }
    }

    table.finished.notify_all();
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        String::from("unknown panic")
    }
}
