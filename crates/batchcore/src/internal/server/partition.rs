use std::fmt;
use std::sync::Arc;

use crate::internal::common::resources::{JobRequest, NumOfNodes};
use crate::internal::scheduler::matcher;
use crate::internal::server::allocation::NodeList;
use crate::internal::server::job::Job;
use crate::internal::server::node::{Node, NodeRef};
use crate::internal::server::registry::AllocationRegistry;

pub type PartitionRef = Arc<Partition>;

/// Named pool of nodes. Nodes are shared with other partitions; the order
/// in which they were listed is the order in which they are offered to jobs.
pub struct Partition {
    name: String,
    nodes: Vec<NodeRef>,
}

impl fmt::Debug for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partition")
            .field("name", &self.name)
            .field(
                "nodes",
                &self.nodes.iter().map(|n| n.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Partition {
    pub fn new(name: impl Into<String>, nodes: Vec<NodeRef>) -> Self {
        Partition {
            name: name.into(),
            nodes,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn nodes(&self) -> &[NodeRef] {
        &self.nodes
    }

    pub fn size(&self) -> NumOfNodes {
        self.nodes.len() as NumOfNodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node_name: &str) -> bool {
        self.nodes.iter().any(|n| n.name() == node_name)
    }

    /// Returns exactly `n_nodes` nodes that can run the job right now, taken
    /// from the front of the partition. Returns `None` if there are not enough.
    pub fn available_nodes_for(&self, job: &Job, registry: &AllocationRegistry) -> Option<NodeList> {
        self.first_fit(job.request().n_nodes(), |node| {
            matcher::satisfies(node, job, registry)
        })
    }

    /// Collects the first `n_nodes` nodes accepted by `filter`, stopping as soon as enough were found.
    pub(crate) fn first_fit(
        &self,
        n_nodes: NumOfNodes,
        mut filter: impl FnMut(&Node) -> bool,
    ) -> Option<NodeList> {
        let n_nodes = n_nodes as usize;
        let mut result = NodeList::new();
        for node in &self.nodes {
            if filter(node) {
                result.push(node.clone());
                if result.len() == n_nodes {
                    return Some(result);
                }
            }
        }
        None
    }

    /// Nodes whose attributes fit the request and that are connected, allocated or not.
    pub fn capable_nodes<'a>(
        &'a self,
        request: &'a JobRequest,
    ) -> impl Iterator<Item = &'a NodeRef> + 'a {
        self.nodes
            .iter()
            .filter(move |node| node.is_capable_to_run(request))
    }

    /// Would the request fit into this partition if all its nodes were free?
    pub fn is_capable_to_run(&self, request: &JobRequest) -> bool {
        let mut target_nodes = request.n_nodes();
        if target_nodes as usize > self.nodes.len() {
            return false;
        }
        for node in &self.nodes {
            if node.is_capable_to_run(request) {
                target_nodes = target_nodes.saturating_sub(1);
                if target_nodes == 0 {
                    return true;
                }
            }
        }
        false
    }
}
