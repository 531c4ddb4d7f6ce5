use serde::{Deserialize, Serialize};

use crate::internal::common::error::BatchError;
use crate::internal::common::{Map, Set};
use crate::internal::server::allocation::{Allocation, AllocationData, NodeList};
use crate::internal::server::cluster::Cluster;
use crate::internal::server::job::JobRef;
use crate::JobId;

/// Index of all live allocations, by job and by node.
///
/// The registry itself is not synchronized; it always lives inside the
/// scheduler core and is reached through the core's lock.
#[derive(Default, Debug)]
pub struct AllocationRegistry {
    by_job: Map<JobId, Allocation>,
    by_node: Map<String, JobId>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, Eq, PartialEq)]
pub struct RegistryData {
    pub allocations: Vec<AllocationData>,
}

impl RegistryData {
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(text: &str) -> crate::Result<RegistryData> {
        Ok(serde_json::from_str(text)?)
    }
}

impl AllocationRegistry {
    /// Registers the allocation under its job and every node it covers.
    /// Nothing is changed when the job or any of the nodes is already taken.
    pub fn add(&mut self, allocation: Allocation) -> crate::Result<()> {
        let job_id = allocation.job_id();
        if self.by_job.contains_key(&job_id) {
            return Err(BatchError::DuplicateJobAllocation { job_id });
        }
        {
            let mut seen = Set::default();
            for name in allocation.node_names() {
                if let Some(owner) = self.by_node.get(name) {
                    return Err(BatchError::DuplicateNodeAllocation {
                        job_id,
                        node: name.to_string(),
                        owner: *owner,
                    });
                }
                if !seen.insert(name) {
                    return Err(BatchError::RepeatedNode(name.to_string()));
                }
            }
        }
        for name in allocation.node_names() {
            self.by_node.insert(name.to_string(), job_id);
        }
        self.by_job.insert(job_id, allocation);
        Ok(())
    }

    /// Removes a previously added allocation together with all of its node entries.
    pub fn delete(&mut self, allocation: &Allocation) -> Option<Allocation> {
        self.delete_for_job(allocation.job_id())
    }

    pub fn delete_for_job(&mut self, job_id: JobId) -> Option<Allocation> {
        let allocation = self.by_job.remove(&job_id)?;
        for name in allocation.node_names() {
            let owner = self.by_node.remove(name);
            debug_assert_eq!(owner, Some(job_id));
        }
        Some(allocation)
    }

    #[inline]
    pub fn for_job(&self, job_id: JobId) -> Option<&Allocation> {
        self.by_job.get(&job_id)
    }

    #[inline]
    pub fn for_node(&self, node_name: &str) -> Option<&Allocation> {
        self.by_node
            .get(node_name)
            .map(|job_id| &self.by_job[job_id])
    }

    #[inline]
    pub fn is_node_allocated(&self, node_name: &str) -> bool {
        self.by_node.contains_key(node_name)
    }

    #[inline]
    pub fn is_job_allocated(&self, job_id: JobId) -> bool {
        self.by_job.contains_key(&job_id)
    }

    /// Snapshot of all allocations ordered by job id.
    pub fn each(&self) -> Vec<Allocation> {
        let mut result: Vec<Allocation> = self.by_job.values().cloned().collect();
        result.sort_unstable_by_key(|a| a.job_id());
        result
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.by_job.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_job.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_job.clear();
        self.by_node.clear();
    }

    pub fn serializable_data(&self) -> RegistryData {
        RegistryData {
            allocations: self.each().iter().map(|a| a.to_data()).collect(),
        }
    }

    /// Rebuilds a registry from [`RegistryData`]. Node names are resolved
    /// through the cluster and job ids through `find_job`.
    pub fn load(
        data: &RegistryData,
        cluster: &Cluster,
        mut find_job: impl FnMut(JobId) -> Option<JobRef>,
    ) -> crate::Result<AllocationRegistry> {
        let mut registry = AllocationRegistry::default();
        for item in &data.allocations {
            let job = find_job(item.job_id).ok_or(BatchError::UnknownJob(item.job_id))?;
            let nodes = item
                .nodes
                .iter()
                .map(|name| {
                    cluster
                        .node(name)
                        .cloned()
                        .ok_or_else(|| BatchError::UnknownNode(name.clone()))
                })
                .collect::<crate::Result<NodeList>>()?;
            if nodes.len() < job.request().n_nodes() as usize {
                return Err(BatchError::InvalidJob(format!(
                    "Stored allocation of job {} has {} nodes, {} requested",
                    item.job_id,
                    nodes.len(),
                    job.request().n_nodes()
                )));
            }
            registry.add(Allocation::new(job, nodes, item.started_at))?;
        }
        Ok(registry)
    }

    pub fn sanity_check(&self) {
        let mut node_count = 0;
        for (job_id, allocation) in &self.by_job {
            assert_eq!(*job_id, allocation.job_id());
            for name in allocation.node_names() {
                assert_eq!(self.by_node.get(name), Some(job_id));
                node_count += 1;
            }
        }
        // Every node belongs to exactly one allocation
        assert_eq!(node_count, self.by_node.len());
    }
}
