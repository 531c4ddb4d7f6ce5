use chrono::{DateTime, Utc};

use crate::internal::scheduler::base::{Scheduler, commit_allocation};
use crate::internal::server::allocation::Allocation;
use crate::internal::server::core::{CoreRef, SchedulerCore};
use crate::internal::server::job::PendingReason;

/// Strict first-come first-served scheduling.
///
/// Jobs are started in submission order. The first job that cannot start
/// blocks everything behind it, even jobs that would fit on the remaining
/// nodes.
pub struct FifoScheduler {
    core: CoreRef,
}

impl FifoScheduler {
    pub fn new(core: CoreRef) -> Self {
        FifoScheduler { core }
    }
}

impl Scheduler for FifoScheduler {
    fn name(&self) -> &'static str {
        "fifo"
    }

    fn core(&self) -> &CoreRef {
        &self.core
    }

    fn schedule(&self, core: &mut SchedulerCore, now: DateTime<Utc>) -> Vec<Allocation> {
        let mut result = Vec::new();
        let jobs = core.queue().jobs().to_vec();
        let mut blocked = false;
        for job in &jobs {
            if core.registry().is_job_allocated(job.id()) {
                log::warn!("Queued job {} is already allocated", job.id());
                continue;
            }
            if !job.is_pending() {
                log::debug!("Queued job {} is {:?}, skipping", job.id(), job.state());
                continue;
            }
            if blocked {
                job.set_pending_reason(PendingReason::Priority);
                continue;
            }
            match job.partition().available_nodes_for(job, core.registry()) {
                Some(nodes) => result.push(commit_allocation(core, job, nodes, now)),
                None => {
                    log::debug!("Job {} blocks the queue", job.id());
                    job.set_pending_reason(PendingReason::Resources);
                    blocked = true;
                }
            }
        }
        result
    }
}
