use std::sync::Arc;

use crate::internal::common::Map;
use crate::internal::common::error::BatchError;
use crate::internal::common::resources::NodeAttributes;
use crate::internal::server::node::{Node, NodeRef};
use crate::internal::server::partition::{Partition, PartitionRef};

/// Directory of all known nodes and partitions.
///
/// It is built once when the cluster layout is loaded and then handed to
/// whoever needs to resolve names; there is no global instance.
#[derive(Default, Debug)]
pub struct Cluster {
    nodes: Map<String, NodeRef>,
    node_order: Vec<NodeRef>,
    partitions: Map<String, PartitionRef>,
}

impl Cluster {
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        attributes: NodeAttributes,
    ) -> crate::Result<NodeRef> {
        let name = name.into();
        if self.nodes.contains_key(&name) {
            return Err(BatchError::DuplicateNode(name));
        }
        let node = Arc::new(Node::new(name.clone(), attributes));
        self.nodes.insert(name, node.clone());
        self.node_order.push(node.clone());
        Ok(node)
    }

    /// Creates a partition from already registered nodes, keeping the given order.
    pub fn add_partition<S: AsRef<str>>(
        &mut self,
        name: impl Into<String>,
        node_names: &[S],
    ) -> crate::Result<PartitionRef> {
        let name = name.into();
        if self.partitions.contains_key(&name) {
            return Err(BatchError::DuplicatePartition(name));
        }
        let nodes = node_names
            .iter()
            .map(|n| {
                self.node(n.as_ref())
                    .cloned()
                    .ok_or_else(|| BatchError::UnknownNode(n.as_ref().to_string()))
            })
            .collect::<crate::Result<Vec<_>>>()?;
        let partition = Arc::new(Partition::new(name.clone(), nodes));
        self.partitions.insert(name, partition.clone());
        Ok(partition)
    }

    #[inline]
    pub fn node(&self, name: &str) -> Option<&NodeRef> {
        self.nodes.get(name)
    }

    pub fn get_node(&self, name: &str) -> crate::Result<&NodeRef> {
        self.node(name)
            .ok_or_else(|| BatchError::UnknownNode(name.to_string()))
    }

    #[inline]
    pub fn partition(&self, name: &str) -> Option<&PartitionRef> {
        self.partitions.get(name)
    }

    pub fn get_partition(&self, name: &str) -> crate::Result<&PartitionRef> {
        self.partition(name)
            .ok_or_else(|| BatchError::UnknownPartition(name.to_string()))
    }

    /// Nodes in registration order.
    pub fn nodes(&self) -> &[NodeRef] {
        &self.node_order
    }

    pub fn partitions(&self) -> impl Iterator<Item = &PartitionRef> {
        self.partitions.values()
    }
}
