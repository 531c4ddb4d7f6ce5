use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::JobId;
use crate::internal::common::resources::{JobRequest, TimeRequest};
use crate::internal::server::partition::PartitionRef;

pub type JobRef = Arc<Job>;

#[derive(Serialize, Deserialize, Debug, Copy, Clone, Hash, Eq, PartialEq)]
pub enum JobState {
    Pending,
    Running,
    Cancelling,
    Cancelled,
    Completed,
    Failed,
    Timeout,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobState::Cancelled | JobState::Completed | JobState::Failed | JobState::Timeout
        )
    }
}

/// Why a queued job has not been given nodes yet.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Hash, Eq, PartialEq)]
pub enum PendingReason {
    #[default]
    None,
    /// Not enough free capable nodes right now.
    Resources,
    /// Waiting behind an earlier job.
    Priority,
}

#[derive(Debug)]
struct JobStatus {
    state: JobState,
    pending_reason: PendingReason,
}

/// A submitted batch job.
///
/// Everything except the status is fixed at submission. The status is
/// changed by the scheduler when it allocates the job and by whoever
/// finishes or cancels it.
pub struct Job {
    id: JobId,
    partition: PartitionRef,
    request: JobRequest,
    time_limit: Option<TimeRequest>,
    status: Mutex<JobStatus>,
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.status.lock();
        f.debug_struct("Job")
            .field("id", &self.id)
            .field("partition", &self.partition.name())
            .field("request", &self.request)
            .field("time_limit", &self.time_limit)
            .field("state", &status.state)
            .field("pending_reason", &status.pending_reason)
            .finish()
    }
}

impl Job {
    pub fn new(
        id: JobId,
        partition: PartitionRef,
        request: JobRequest,
        time_limit: Option<Duration>,
    ) -> crate::Result<Job> {
        request.validate()?;
        Ok(Job {
            id,
            partition,
            request,
            time_limit,
            status: Mutex::new(JobStatus {
                state: JobState::Pending,
                pending_reason: PendingReason::None,
            }),
        })
    }

    #[inline]
    pub fn id(&self) -> JobId {
        self.id
    }

    #[inline]
    pub fn partition(&self) -> &PartitionRef {
        &self.partition
    }

    #[inline]
    pub fn request(&self) -> &JobRequest {
        &self.request
    }

    /// Upper bound of the run time. `None` means the job may run forever.
    #[inline]
    pub fn time_limit(&self) -> Option<TimeRequest> {
        self.time_limit
    }

    pub fn state(&self) -> JobState {
        self.status.lock().state
    }

    pub fn pending_reason(&self) -> PendingReason {
        self.status.lock().pending_reason
    }

    pub fn is_pending(&self) -> bool {
        self.state() == JobState::Pending
    }

    pub fn set_state(&self, state: JobState) {
        let mut status = self.status.lock();
        if state != JobState::Pending {
            status.pending_reason = PendingReason::None;
        }
        status.state = state;
    }

    pub fn set_pending_reason(&self, reason: PendingReason) {
        self.status.lock().pending_reason = reason;
    }

    /// Transition performed when nodes were handed to the job.
    pub(crate) fn mark_started(&self) {
        let mut status = self.status.lock();
        assert_eq!(
            status.state,
            JobState::Pending,
            "Job {} started from invalid state",
            self.id
        );
        status.state = JobState::Running;
        status.pending_reason = PendingReason::None;
    }
}
