use chrono::{DateTime, TimeDelta, Utc};

use crate::JobId;
use crate::internal::common::Set;
use crate::internal::common::resources::NumOfNodes;
use crate::internal::scheduler::base::{Scheduler, commit_allocation};
use crate::internal::scheduler::matcher;
use crate::internal::scheduler::selection::NodeSelection;
use crate::internal::server::allocation::{Allocation, NodeList};
use crate::internal::server::core::{CoreRef, SchedulerCore};
use crate::internal::server::job::{Job, JobRef, PendingReason};
use crate::internal::server::node::NodeRef;
use crate::internal::server::registry::AllocationRegistry;

/// Nodes set aside for the first job that could not start, from the moment
/// it is expected to be able to start.
#[derive(Debug)]
pub struct ShadowReservation {
    job_id: JobId,
    /// `None` when the start depends on jobs without a time limit.
    start: Option<DateTime<Utc>>,
    nodes: Set<String>,
}

impl ShadowReservation {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn is_reserved(&self, node_name: &str) -> bool {
        self.nodes.contains(node_name)
    }

    /// Is the job guaranteed to be gone before the reservation begins?
    /// Only then may it run on reserved nodes.
    pub fn ends_before_start(&self, job: &Job, now: DateTime<Utc>) -> bool {
        let (Some(start), Some(limit)) = (self.start, job.time_limit()) else {
            return false;
        };
        TimeDelta::from_std(limit)
            .ok()
            .and_then(|limit| now.checked_add_signed(limit))
            .is_some_and(|end| end <= start)
    }
}

/// Computes where and when the blocked job can start at the earliest.
///
/// Only connected nodes able to run the job are considered. Running jobs
/// free their nodes at the end of their time limit; running jobs without a
/// limit never do. Returns `None` if the partition does not have enough
/// capable nodes at all.
pub fn compute_shadow_reservation(
    job: &Job,
    registry: &AllocationRegistry,
    selection: NodeSelection,
    now: DateTime<Utc>,
) -> Option<ShadowReservation> {
    let request = job.request();
    let n_nodes = request.n_nodes() as usize;
    let mut free: Set<&str> = Set::default();
    let mut releasing: Vec<(DateTime<Utc>, &NodeRef)> = Vec::new();
    let mut capable = 0;
    for node in job.partition().capable_nodes(request) {
        capable += 1;
        match registry.for_node(node.name()) {
            None => {
                free.insert(node.name());
            }
            Some(allocation) => {
                if let Some(end) = allocation.end_time() {
                    releasing.push((end.max(now), node));
                }
            }
        }
    }
    if capable < n_nodes {
        return None;
    }

    let missing = n_nodes.saturating_sub(free.len());
    let mut nodes = Set::default();
    let (start, free_to_reserve) = if missing == 0 {
        (Some(now), n_nodes)
    } else if releasing.len() >= missing {
        // Sort is stable, equal end times keep partition order
        releasing.sort_by_key(|(end, _)| *end);
        let start = releasing[missing - 1].0;
        let mut released = 0;
        for (end, node) in &releasing {
            if *end > start || released == n_nodes {
                break;
            }
            nodes.insert(node.name().to_string());
            released += 1;
        }
        (Some(start), n_nodes - released)
    } else {
        (None, free.len())
    };

    if free_to_reserve > 0 {
        let reserved = selection
            .select(
                job.partition(),
                free_to_reserve as NumOfNodes,
                |node| free.contains(node.name()),
            )
            .unwrap_or_default();
        nodes.extend(reserved.iter().map(|n| n.name().to_string()));
    }

    Some(ShadowReservation {
        job_id: job.id(),
        start,
        nodes,
    })
}

/// EASY backfilling.
///
/// Jobs are started in submission order until one of them cannot start.
/// That job receives a shadow reservation and later jobs are started only
/// when they do not touch its reserved nodes, or when they are certain to
/// finish before the reservation begins. The blocked job therefore never
/// starts later than it would under strict FIFO.
pub struct BackfillingScheduler {
    core: CoreRef,
    node_selection: NodeSelection,
    max_candidates: Option<usize>,
}

impl BackfillingScheduler {
    pub fn new(core: CoreRef) -> Self {
        BackfillingScheduler {
            core,
            node_selection: NodeSelection::default(),
            max_candidates: None,
        }
    }

    pub fn with_node_selection(mut self, node_selection: NodeSelection) -> Self {
        self.node_selection = node_selection;
        self
    }

    /// Limits how many jobs behind the blocked one are examined in one pass.
    pub fn with_max_candidates(mut self, max_candidates: Option<usize>) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    fn select_nodes(
        &self,
        job: &Job,
        registry: &AllocationRegistry,
        reservation: Option<&ShadowReservation>,
        now: DateTime<Utc>,
    ) -> Option<NodeList> {
        let may_use_reserved = reservation.is_none_or(|r| r.ends_before_start(job, now));
        self.node_selection
            .select(job.partition(), job.request().n_nodes(), |node| {
                matcher::satisfies(node, job, registry)
                    && (may_use_reserved
                        || !reservation.is_some_and(|r| r.is_reserved(node.name())))
            })
    }

    fn try_backfill(
        &self,
        core: &mut SchedulerCore,
        job: &JobRef,
        reservation: &ShadowReservation,
        now: DateTime<Utc>,
    ) -> Option<Allocation> {
        if let Some(nodes) = self.select_nodes(job, core.registry(), Some(reservation), now) {
            log::debug!(
                "Job {} backfilled before job {}",
                job.id(),
                reservation.job_id()
            );
            return Some(commit_allocation(core, job, nodes, now));
        }
        let fits_without_reservation = job
            .partition()
            .first_fit(job.request().n_nodes(), |node| {
                matcher::satisfies(node, job, core.registry())
            })
            .is_some();
        job.set_pending_reason(if fits_without_reservation {
            PendingReason::Priority
        } else {
            PendingReason::Resources
        });
        None
    }
}

impl Scheduler for BackfillingScheduler {
    fn name(&self) -> &'static str {
        "backfill"
    }

    fn core(&self) -> &CoreRef {
        &self.core
    }

    fn schedule(&self, core: &mut SchedulerCore, now: DateTime<Utc>) -> Vec<Allocation> {
        let mut result = Vec::new();
        let jobs = core.queue().jobs().to_vec();
        let mut reservation: Option<ShadowReservation> = None;
        let mut candidates = 0;
        for job in &jobs {
            if core.registry().is_job_allocated(job.id()) {
                log::warn!("Queued job {} is already allocated", job.id());
                continue;
            }
            if !job.is_pending() {
                log::debug!("Queued job {} is {:?}, skipping", job.id(), job.state());
                continue;
            }
            if !job.partition().is_capable_to_run(job.request()) {
                // Can never start with the current nodes, so it cannot be delayed either
                job.set_pending_reason(PendingReason::Resources);
                continue;
            }
            if let Some(r) = reservation.as_ref() {
                if self.max_candidates.is_some_and(|max| candidates >= max) {
                    job.set_pending_reason(PendingReason::Priority);
                    continue;
                }
                candidates += 1;
                if let Some(allocation) = self.try_backfill(core, job, r, now) {
                    result.push(allocation);
                }
                continue;
            }
            match self.select_nodes(job, core.registry(), None, now) {
                Some(nodes) => result.push(commit_allocation(core, job, nodes, now)),
                None => {
                    job.set_pending_reason(PendingReason::Resources);
                    reservation =
                        compute_shadow_reservation(job, core.registry(), self.node_selection, now);
                    if let Some(r) = &reservation {
                        log::debug!(
                            "Job {} reserved nodes {:?} from {:?}",
                            job.id(),
                            r.nodes,
                            r.start
                        );
                    }
                }
            }
        }
        result
    }
}
