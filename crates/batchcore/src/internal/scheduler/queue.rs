use crate::internal::common::resources::NumOfNodes;
use crate::internal::common::{Map, Set};
use crate::internal::server::job::{JobRef, PendingReason};
use crate::JobId;

/// Pending jobs in submission order.
#[derive(Default, Debug)]
pub struct JobQueue {
    jobs: Vec<JobRef>,
    ids: Set<JobId>,
}

impl JobQueue {
    /// Appends the job to the tail. Returns false (and changes nothing) if a
    /// job with the same id is already queued or the job is not pending.
    pub fn add_job(&mut self, job: JobRef) -> bool {
        if !job.is_pending() {
            log::warn!(
                "Job {} in state {:?} cannot be queued",
                job.id(),
                job.state()
            );
            return false;
        }
        if !self.ids.insert(job.id()) {
            log::debug!("Job {} is already queued", job.id());
            return false;
        }
        self.jobs.push(job);
        true
    }

    pub fn remove_job(&mut self, job_id: JobId) -> Option<JobRef> {
        if !self.ids.remove(&job_id) {
            return None;
        }
        let index = self
            .jobs
            .iter()
            .position(|j| j.id() == job_id)
            .expect("Queue index out of sync");
        Some(self.jobs.remove(index))
    }

    pub fn find_job(&self, job_id: JobId) -> Option<&JobRef> {
        if !self.ids.contains(&job_id) {
            return None;
        }
        self.jobs.iter().find(|j| j.id() == job_id)
    }

    #[inline]
    pub fn contains(&self, job_id: JobId) -> bool {
        self.ids.contains(&job_id)
    }

    #[inline]
    pub fn jobs(&self) -> &[JobRef] {
        &self.jobs
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn clear(&mut self) {
        self.jobs.clear();
        self.ids.clear();
    }

    /// Drops jobs that are not pending anymore, either because they were
    /// handed nodes in a pass or because their state was changed from outside.
    pub(crate) fn remove_started(&mut self) {
        let ids = &mut self.ids;
        self.jobs.retain(|job| {
            let keep = job.is_pending();
            if !keep {
                ids.remove(&job.id());
            }
            keep
        });
    }

    /// Number of queued jobs for each requested node count.
    pub fn profile(&self) -> Map<NumOfNodes, u32> {
        let mut result = Map::default();
        for job in &self.jobs {
            *result.entry(job.request().n_nodes()).or_insert(0) += 1;
        }
        result
    }

    pub fn pending_reasons(&self) -> Vec<(JobId, PendingReason)> {
        self.jobs
            .iter()
            .map(|job| (job.id(), job.pending_reason()))
            .collect()
    }

    pub fn sanity_check(&self) {
        assert_eq!(self.jobs.len(), self.ids.len());
        for job in &self.jobs {
            assert!(self.ids.contains(&job.id()));
            assert!(job.is_pending(), "Queued job {} is not pending", job.id());
        }
    }
}
