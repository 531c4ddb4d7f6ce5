use chrono::{DateTime, Utc};

use crate::JobId;
use crate::internal::common::WrappedRwLock;
use crate::internal::common::error::BatchError;
use crate::internal::scheduler::queue::JobQueue;
use crate::internal::server::allocation::Allocation;
use crate::internal::server::explain::{JobExplanation, explain_job};
use crate::internal::server::job::JobState;
use crate::internal::server::registry::AllocationRegistry;

/// The state shared by the scheduler and its surroundings: pending jobs and
/// live allocations. Both are always changed together under one lock.
#[derive(Default, Debug)]
pub struct SchedulerCore {
    queue: JobQueue,
    registry: AllocationRegistry,
}

pub type CoreRef = WrappedRwLock<SchedulerCore>;

impl CoreRef {
    pub fn new() -> Self {
        CoreRef::wrap(SchedulerCore::default())
    }

    /// Starts from allocations restored by the persistence layer.
    pub fn with_registry(registry: AllocationRegistry) -> Self {
        CoreRef::wrap(SchedulerCore {
            queue: JobQueue::default(),
            registry,
        })
    }
}

impl SchedulerCore {
    #[inline]
    pub fn queue(&self) -> &JobQueue {
        &self.queue
    }

    #[inline]
    pub fn queue_mut(&mut self) -> &mut JobQueue {
        &mut self.queue
    }

    #[inline]
    pub fn registry(&self) -> &AllocationRegistry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut AllocationRegistry {
        &mut self.registry
    }

    /// Moves a job into a terminal state.
    ///
    /// A running job loses its allocation, which is returned so that its
    /// nodes can be released downstream. A pending job is just dropped from
    /// the queue.
    pub fn finish_job(&mut self, job_id: JobId, state: JobState) -> crate::Result<Option<Allocation>> {
        if !state.is_terminal() {
            return Err(BatchError::NonTerminalState { job_id, state });
        }
        if let Some(allocation) = self.registry.delete_for_job(job_id) {
            allocation.job().set_state(state);
            log::debug!(
                "Job {} finished as {:?}, nodes {:?} released",
                job_id,
                state,
                allocation.node_names().collect::<Vec<_>>()
            );
            return Ok(Some(allocation));
        }
        if let Some(job) = self.queue.remove_job(job_id) {
            job.set_state(state);
            log::debug!("Pending job {job_id} finished as {state:?}");
            return Ok(None);
        }
        Err(BatchError::UnknownJob(job_id))
    }

    /// First step of a cancellation. A pending job is cancelled immediately.
    /// A running job only switches to `Cancelling` and keeps its nodes until
    /// [`SchedulerCore::finish_job`] confirms that it stopped.
    pub fn begin_cancel(&mut self, job_id: JobId) -> crate::Result<JobState> {
        if let Some(allocation) = self.registry.for_job(job_id) {
            allocation.job().set_state(JobState::Cancelling);
            return Ok(JobState::Cancelling);
        }
        self.finish_job(job_id, JobState::Cancelled)?;
        Ok(JobState::Cancelled)
    }

    pub fn explain_job(&self, job_id: JobId, now: DateTime<Utc>) -> Option<JobExplanation> {
        let job = self.queue.find_job(job_id)?;
        Some(explain_job(job, &self.registry, now))
    }

    pub fn sanity_check(&self) {
        self.queue.sanity_check();
        self.registry.sanity_check();
        for job in self.queue.jobs() {
            assert!(
                !self.registry.is_job_allocated(job.id()),
                "Queued job {} has an allocation",
                job.id()
            );
        }
        for allocation in self.registry.each() {
            let state = allocation.job().state();
            assert!(
                matches!(state, JobState::Running | JobState::Cancelling),
                "Allocated job {} is in state {:?}",
                allocation.job_id(),
                state
            );
            assert!(allocation.nodes().len() >= allocation.job().request().n_nodes() as usize);
        }
    }
}
