use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::JobId;
use crate::internal::server::job::JobRef;
use crate::internal::server::node::NodeRef;

pub type NodeList = SmallVec<[NodeRef; 4]>;

/// Binding of a job to the nodes it runs on. Never modified after creation.
#[derive(Clone)]
pub struct Allocation {
    job: JobRef,
    nodes: NodeList,
    started_at: DateTime<Utc>,
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("job", &self.job.id())
            .field("nodes", &self.node_names().collect::<Vec<_>>())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl PartialEq for Allocation {
    fn eq(&self, other: &Self) -> bool {
        self.job.id() == other.job.id()
            && self.started_at == other.started_at
            && self.node_names().eq(other.node_names())
    }
}

impl Eq for Allocation {}

impl Allocation {
    pub fn new(job: JobRef, nodes: NodeList, started_at: DateTime<Utc>) -> Self {
        assert!(
            nodes.len() >= job.request().n_nodes() as usize,
            "Allocation of job {} has {} nodes, {} requested",
            job.id(),
            nodes.len(),
            job.request().n_nodes()
        );
        Allocation {
            job,
            nodes,
            started_at,
        }
    }

    #[inline]
    pub fn job(&self) -> &JobRef {
        &self.job
    }

    #[inline]
    pub fn job_id(&self) -> JobId {
        self.job.id()
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.name())
    }

    #[inline]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Latest moment the job may still be running. `None` for jobs without a time limit.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        let limit = TimeDelta::from_std(self.job.time_limit()?).ok()?;
        self.started_at.checked_add_signed(limit)
    }

    pub fn remaining_time(&self, now: DateTime<Utc>) -> Option<Duration> {
        let end = self.end_time()?;
        Some((end - now).to_std().unwrap_or(Duration::ZERO))
    }

    pub fn to_data(&self) -> AllocationData {
        AllocationData {
            job_id: self.job_id(),
            nodes: self.node_names().map(|n| n.to_string()).collect(),
            started_at: self.started_at,
        }
    }
}

/// Persistable form of an [`Allocation`]; jobs and nodes are referenced by identity.
#[derive(Serialize, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct AllocationData {
    pub job_id: JobId,
    pub nodes: Vec<String>,
    pub started_at: DateTime<Utc>,
}
