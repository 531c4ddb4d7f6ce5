use crate::internal::common::resources::request::JobRequest;
use crate::internal::common::resources::{CpuCount, GpuCount, MemoryBytes, NodeType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Capabilities reported for a single node.
///
/// Every attribute is optional. A missing count is treated as zero and a
/// missing type never matches a typed request, so a node that has not
/// reported anything yet is only able to run jobs that ask for nothing.
#[derive(Default, Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct NodeAttributes {
    #[serde(default)]
    pub cpus: Option<CpuCount>,
    #[serde(default)]
    pub gpus: Option<GpuCount>,
    #[serde(default)]
    pub memory: Option<MemoryBytes>,
    #[serde(default)]
    pub node_type: Option<NodeType>,
}

/// Ordering used to prefer "smaller" nodes. GPUs are the scarcest resource,
/// so they dominate the comparison.
pub type CapabilityKey = (GpuCount, CpuCount, MemoryBytes);

impl NodeAttributes {
    pub fn new(cpus: CpuCount, gpus: GpuCount, memory: MemoryBytes) -> Self {
        NodeAttributes {
            cpus: Some(cpus),
            gpus: Some(gpus),
            memory: Some(memory),
            node_type: None,
        }
    }

    pub fn with_type(mut self, node_type: impl Into<NodeType>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    #[inline]
    pub fn cpus(&self) -> CpuCount {
        self.cpus.unwrap_or(0)
    }

    #[inline]
    pub fn gpus(&self) -> GpuCount {
        self.gpus.unwrap_or(0)
    }

    #[inline]
    pub fn memory(&self) -> MemoryBytes {
        self.memory.unwrap_or(0)
    }

    pub fn capability_key(&self) -> CapabilityKey {
        (self.gpus(), self.cpus(), self.memory())
    }

    /// Checks the per-node part of a request against these attributes.
    /// Connectivity and allocation state are not considered here.
    pub fn fulfills(&self, request: &JobRequest) -> bool {
        request.cpus.is_none_or(|cpus| self.cpus() >= cpus)
            && request.gpus.is_none_or(|gpus| self.gpus() >= gpus)
            && request.memory.is_none_or(|memory| self.memory() >= memory)
            && request
                .node_type
                .as_ref()
                .is_none_or(|t| self.node_type.as_ref() == Some(t))
    }
}

impl fmt::Display for NodeAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpus={} gpus={} mem={}",
            self.cpus(),
            self.gpus(),
            self.memory()
        )?;
        if let Some(node_type) = &self.node_type {
            write!(f, " type={node_type}")?;
        }
        Ok(())
    }
}
