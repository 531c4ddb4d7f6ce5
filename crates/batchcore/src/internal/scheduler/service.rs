use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::JobId;
use crate::config::SchedulerConfig;
use crate::events::EventProcessor;
use crate::internal::common::resources::NodeAttributes;
use crate::internal::scheduler::base::{Scheduler, create_scheduler};
use crate::internal::server::allocation::Allocation;
use crate::internal::server::core::CoreRef;
use crate::internal::server::job::{JobRef, JobState};
use crate::internal::server::node::NodeRef;

/// Glue between the scheduler and the event consumer.
///
/// Deciding *when* to run a pass stays with the caller; this type only makes
/// sure that every state change it performs is reported, and that events
/// are emitted after the core lock was released.
pub struct SchedulerService {
    scheduler: Box<dyn Scheduler>,
    events: Arc<dyn EventProcessor>,
}

impl SchedulerService {
    pub fn new(scheduler: Box<dyn Scheduler>, events: Arc<dyn EventProcessor>) -> Self {
        SchedulerService { scheduler, events }
    }

    pub fn from_config(
        config: &SchedulerConfig,
        core: CoreRef,
        events: Arc<dyn EventProcessor>,
    ) -> Self {
        Self::new(create_scheduler(config, core), events)
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn core(&self) -> &CoreRef {
        self.scheduler.core()
    }

    pub fn submit(&self, job: JobRef) -> bool {
        self.scheduler.add_job(job)
    }

    pub fn run_pass(&self) -> Vec<Allocation> {
        self.run_pass_at(Utc::now())
    }

    pub fn run_pass_at(&self, now: DateTime<Utc>) -> Vec<Allocation> {
        let allocations = self.scheduler.allocate_jobs_at(now);
        if !allocations.is_empty() {
            self.events.on_allocations_created(&allocations);
        }
        allocations
    }

    pub fn finish_job(&self, job_id: JobId, state: JobState) -> crate::Result<Option<Allocation>> {
        let released = self.core().get_mut().finish_job(job_id, state)?;
        if let Some(allocation) = &released {
            self.events.on_allocation_released(allocation, state);
        }
        Ok(released)
    }

    pub fn cancel_job(&self, job_id: JobId) -> crate::Result<JobState> {
        self.core().get_mut().begin_cancel(job_id)
    }

    pub fn update_node_attributes(&self, node: &NodeRef, attributes: NodeAttributes) {
        node.update_attributes(attributes);
        self.events.on_node_resources_changed(node);
    }

    pub fn set_node_connected(&self, node: &NodeRef, connected: bool) {
        node.set_connected(connected);
        self.events.on_node_resources_changed(node);
    }
}
