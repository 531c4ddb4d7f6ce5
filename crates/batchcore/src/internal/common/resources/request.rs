use crate::internal::common::error::BatchError;
use crate::internal::common::resources::{CpuCount, GpuCount, MemoryBytes, NodeType, NumOfNodes};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub type TimeRequest = Duration;

/// Shape of a job: how many whole nodes it needs and what each of them must provide.
/// A `None` entry accepts any value of that attribute.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct JobRequest {
    pub n_nodes: NumOfNodes,
    #[serde(default)]
    pub cpus: Option<CpuCount>,
    #[serde(default)]
    pub gpus: Option<GpuCount>,
    #[serde(default)]
    pub memory: Option<MemoryBytes>,
    #[serde(default)]
    pub node_type: Option<NodeType>,
}

impl Default for JobRequest {
    fn default() -> Self {
        JobRequest::new(1)
    }
}

impl JobRequest {
    pub fn new(n_nodes: NumOfNodes) -> Self {
        JobRequest {
            n_nodes,
            cpus: None,
            gpus: None,
            memory: None,
            node_type: None,
        }
    }

    pub fn with_cpus(mut self, cpus: CpuCount) -> Self {
        self.cpus = Some(cpus);
        self
    }

    pub fn with_gpus(mut self, gpus: GpuCount) -> Self {
        self.gpus = Some(gpus);
        self
    }

    pub fn with_memory(mut self, memory: MemoryBytes) -> Self {
        self.memory = Some(memory);
        self
    }

    pub fn with_node_type(mut self, node_type: impl Into<NodeType>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    #[inline]
    pub fn n_nodes(&self) -> NumOfNodes {
        self.n_nodes
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.n_nodes == 0 {
            return Err(BatchError::InvalidJob(
                "Job has to request at least one node".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for JobRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "nodes={}", self.n_nodes)?;
        if let Some(cpus) = self.cpus {
            write!(f, " cpus={cpus}")?;
        }
        if let Some(gpus) = self.gpus {
            write!(f, " gpus={gpus}")?;
        }
        if let Some(memory) = self.memory {
            write!(f, " mem={memory}")?;
        }
        if let Some(node_type) = &self.node_type {
            write!(f, " type={node_type}")?;
        }
        Ok(())
    }
}
