use chrono::{DateTime, Utc};

use crate::JobId;
use crate::config::{SchedulerConfig, SchedulingPolicy};
use crate::internal::scheduler::backfill::BackfillingScheduler;
use crate::internal::scheduler::fifo::FifoScheduler;
use crate::internal::server::allocation::Allocation;
use crate::internal::server::core::{CoreRef, SchedulerCore};
use crate::internal::server::job::JobRef;

/// Owner of the decision pass.
///
/// Every queue mutation and every pass holds the write lock of the shared
/// core for its whole duration, so a job can never vanish from under a
/// running pass.
pub trait Scheduler: Send + Sync {
    fn name(&self) -> &'static str;

    fn core(&self) -> &CoreRef;

    /// Runs one pass over a locked core. Newly created allocations are
    /// already registered when this returns; they are returned in the order
    /// in which they were made.
    fn schedule(&self, core: &mut SchedulerCore, now: DateTime<Utc>) -> Vec<Allocation>;

    fn add_job(&self, job: JobRef) -> bool {
        self.core().get_mut().queue_mut().add_job(job)
    }

    fn remove_job(&self, job_id: JobId) -> Option<JobRef> {
        self.core().get_mut().queue_mut().remove_job(job_id)
    }

    /// Snapshot of the queue in submission order.
    fn queue(&self) -> Vec<JobRef> {
        self.core().get().queue().jobs().to_vec()
    }

    fn allocate_jobs(&self) -> Vec<Allocation> {
        self.allocate_jobs_at(Utc::now())
    }

    fn allocate_jobs_at(&self, now: DateTime<Utc>) -> Vec<Allocation> {
        let mut core = self.core().get_mut();
        log::debug!(
            "Scheduling started ({}, {} queued jobs)",
            self.name(),
            core.queue().len()
        );
        let allocations = trace_time!("scheduler", "allocate_jobs", {
            self.schedule(&mut core, now)
        });
        core.queue_mut().remove_started();
        log::debug!(
            "Scheduling finished, {} new allocations",
            allocations.len()
        );
        allocations
    }

    fn clear(&self) {
        self.core().get_mut().queue_mut().clear();
    }
}

pub fn create_scheduler(config: &SchedulerConfig, core: CoreRef) -> Box<dyn Scheduler> {
    match config.policy {
        SchedulingPolicy::Fifo => Box::new(FifoScheduler::new(core)),
        SchedulingPolicy::Backfill => Box::new(
            BackfillingScheduler::new(core)
                .with_node_selection(config.node_selection)
                .with_max_candidates(config.max_backfill_candidates),
        ),
    }
}

/// Hands nodes to a pending job inside a pass. The job is switched to
/// running before the registry is touched. The registry must accept the
/// allocation: the nodes were chosen from free nodes under the same lock,
/// so a rejection means the core is corrupted.
pub(crate) fn commit_allocation(
    core: &mut SchedulerCore,
    job: &JobRef,
    nodes: crate::internal::server::allocation::NodeList,
    now: DateTime<Utc>,
) -> Allocation {
    job.mark_started();
    let allocation = Allocation::new(job.clone(), nodes, now);
    if let Err(error) = core.registry_mut().add(allocation.clone()) {
        panic!("Allocation registry rejected a scheduled allocation: {error}");
    }
    log::debug!(
        "Job {} allocated on nodes {:?}",
        job.id(),
        allocation.node_names().collect::<Vec<_>>()
    );
    allocation
}
