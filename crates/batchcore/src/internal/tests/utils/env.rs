use chrono::{DateTime, TimeDelta, Utc};

use crate::config::{SchedulerConfig, SchedulingPolicy};
use crate::internal::common::ids::JobIdCounter;
use crate::internal::common::resources::{CpuCount, NodeAttributes};
use crate::internal::scheduler::base::{Scheduler, create_scheduler};
use crate::internal::scheduler::selection::NodeSelection;
use crate::internal::server::cluster::Cluster;
use crate::internal::server::core::CoreRef;
use crate::internal::server::job::{JobRef, JobState, PendingReason};
use crate::internal::server::partition::PartitionRef;
use crate::internal::tests::utils::job::JobBuilder;
use crate::internal::tests::utils::test_now;
use crate::JobId;
use std::sync::Arc;

pub struct TestEnv {
    cluster: Cluster,
    core: CoreRef,
    scheduler: Box<dyn Scheduler>,
    job_ids: JobIdCounter,
    node_counter: u32,
    now: DateTime<Utc>,
}

impl TestEnv {
    pub fn new(config: SchedulerConfig) -> TestEnv {
        let core = CoreRef::new();
        TestEnv {
            cluster: Cluster::default(),
            scheduler: create_scheduler(&config, core.clone()),
            core,
            job_ids: JobIdCounter::default(),
            node_counter: 0,
            now: test_now(),
        }
    }

    pub fn fifo() -> TestEnv {
        Self::new(SchedulerConfig {
            policy: SchedulingPolicy::Fifo,
            ..Default::default()
        })
    }

    pub fn backfill() -> TestEnv {
        Self::new(SchedulerConfig {
            policy: SchedulingPolicy::Backfill,
            ..Default::default()
        })
    }

    pub fn backfill_with(node_selection: NodeSelection) -> TestEnv {
        Self::new(SchedulerConfig {
            policy: SchedulingPolicy::Backfill,
            node_selection,
            ..Default::default()
        })
    }

    pub fn core(&self) -> &CoreRef {
        &self.core
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn scheduler(&self) -> &dyn Scheduler {
        self.scheduler.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn advance_secs(&mut self, secs: i64) {
        self.now += TimeDelta::seconds(secs);
    }

    /// Creates connected nodes with the given cpu counts and returns their names.
    pub fn new_nodes(&mut self, cpus: &[CpuCount]) -> Vec<String> {
        cpus.iter()
            .map(|c| {
                let name = format!("n{}", self.node_counter);
                self.node_counter += 1;
                let node = self
                    .cluster
                    .add_node(name.clone(), NodeAttributes::new(*c, 0, 0))
                    .unwrap();
                node.set_connected(true);
                name
            })
            .collect()
    }

    pub fn new_partition<S: AsRef<str>>(&mut self, name: &str, nodes: &[S]) -> PartitionRef {
        self.cluster.add_partition(name, nodes).unwrap()
    }

    /// Shortcut for a partition made of fresh nodes.
    pub fn new_partition_with_nodes(&mut self, name: &str, cpus: &[CpuCount]) -> PartitionRef {
        let nodes = self.new_nodes(cpus);
        self.new_partition(name, &nodes)
    }

    /// Submits a job into the named partition under the next free id.
    pub fn new_job(&mut self, partition: &str, builder: JobBuilder) -> JobRef {
        let partition = self.cluster.partition(partition).unwrap().clone();
        let job = Arc::new(
            builder
                .id(self.job_ids.next_id().as_num())
                .build(&partition),
        );
        assert!(self.scheduler.add_job(job.clone()));
        job
    }

    pub fn new_jobs(&mut self, partition: &str, n_nodes: &[u32]) -> Vec<JobRef> {
        n_nodes
            .iter()
            .map(|n| self.new_job(partition, JobBuilder::default().n_nodes(*n)))
            .collect()
    }

    /// Runs one pass and returns ids of the jobs that received nodes, in allocation order.
    pub fn schedule(&mut self) -> Vec<JobId> {
        let allocations = self.scheduler.allocate_jobs_at(self.now);
        self.sanity_check();
        allocations.iter().map(|a| a.job_id()).collect()
    }

    pub fn finish_job(&mut self, job: &JobRef) {
        self.core
            .get_mut()
            .finish_job(job.id(), JobState::Completed)
            .unwrap();
        self.sanity_check();
    }

    pub fn allocated_nodes(&self, job: &JobRef) -> Option<Vec<String>> {
        self.core
            .get()
            .registry()
            .for_job(job.id())
            .map(|a| a.node_names().map(|n| n.to_string()).collect())
    }

    pub fn is_allocated(&self, job: &JobRef) -> bool {
        self.core.get().registry().is_job_allocated(job.id())
    }

    pub fn check_pending(&self, job: &JobRef, reason: PendingReason) {
        assert_eq!(job.state(), JobState::Pending, "job {}", job.id());
        assert_eq!(job.pending_reason(), reason, "job {}", job.id());
        assert!(!self.is_allocated(job));
    }

    pub fn check_running(&self, job: &JobRef) {
        assert_eq!(job.state(), JobState::Running, "job {}", job.id());
        assert_eq!(job.pending_reason(), PendingReason::None);
        assert!(self.is_allocated(job));
    }

    pub fn sanity_check(&self) {
        let core = self.core.get();
        core.sanity_check();
        // Nodes of live allocations are pairwise disjoint
        let mut seen = crate::Set::default();
        for allocation in core.registry().each() {
            for name in allocation.node_names() {
                assert!(seen.insert(name.to_string()), "node {name} is double booked");
            }
        }
    }
}
