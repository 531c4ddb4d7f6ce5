use serde::{Deserialize, Serialize};

use crate::internal::common::resources::{CapabilityKey, NumOfNodes};
use crate::internal::server::allocation::NodeList;
use crate::internal::server::node::Node;
use crate::internal::server::partition::Partition;

/// How to pick nodes when more of them could serve a job.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, Default, Eq, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum NodeSelection {
    /// The first suitable nodes in partition order.
    FirstFit,
    /// The least capable suitable nodes, keeping big nodes for jobs that need them.
    /// Equally capable nodes are taken in partition order.
    #[default]
    SmallestFit,
}

impl NodeSelection {
    /// Picks exactly `n_nodes` nodes of the partition accepted by `filter`.
    /// The result is always in partition order.
    pub fn select(
        &self,
        partition: &Partition,
        n_nodes: NumOfNodes,
        mut filter: impl FnMut(&Node) -> bool,
    ) -> Option<NodeList> {
        match self {
            NodeSelection::FirstFit => partition.first_fit(n_nodes, filter),
            NodeSelection::SmallestFit => {
                let n_nodes = n_nodes as usize;
                let mut candidates: Vec<(CapabilityKey, usize)> = Vec::new();
                for (idx, node) in partition.nodes().iter().enumerate() {
                    if filter(node) {
                        candidates.push((node.attributes().capability_key(), idx));
                    }
                }
                if candidates.len() < n_nodes || n_nodes == 0 {
                    return None;
                }
                candidates.sort_unstable();
                candidates.truncate(n_nodes);
                candidates.sort_unstable_by_key(|(_, idx)| *idx);
                Some(
                    candidates
                        .into_iter()
                        .map(|(_, idx)| partition.nodes()[idx].clone())
                        .collect(),
                )
            }
        }
    }
}
