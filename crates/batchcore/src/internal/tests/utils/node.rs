use std::sync::Arc;

use crate::internal::common::resources::{CpuCount, NodeAttributes};
use crate::internal::server::node::{Node, NodeRef};
use crate::internal::server::partition::{Partition, PartitionRef};

/// Partition of connected nodes `n0`, `n1`, ... with the given numbers of cpus.
pub fn create_test_partition(name: &str, cpus: &[CpuCount]) -> PartitionRef {
    let nodes = cpus
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let node = Node::new(format!("n{i}"), NodeAttributes::new(*c, 0, 0));
            node.set_connected(true);
            Arc::new(node)
        })
        .collect();
    Arc::new(Partition::new(name, nodes))
}

pub fn node_names(nodes: &[NodeRef]) -> Vec<&str> {
    nodes.iter().map(|n| n.name()).collect()
}
