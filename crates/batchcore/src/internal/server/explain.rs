use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::JobId;
use crate::internal::common::resources::{
    CPU_RESOURCE_NAME, GPU_RESOURCE_NAME, MEM_RESOURCE_NAME, NumOfNodes,
};
use crate::internal::server::job::Job;
use crate::internal::server::registry::AllocationRegistry;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobExplanation {
    pub job_id: JobId,
    pub n_nodes: NumOfNodes,
    /// Connected nodes whose attributes fit the job, allocated or not.
    pub capable_nodes: NumOfNodes,
    /// Capable nodes that are free right now.
    pub free_nodes: NumOfNodes,
    pub items: Vec<JobExplainItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobExplainItem {
    PartitionSize {
        n_nodes: NumOfNodes,
        partition_size: NumOfNodes,
    },
    /// Even the best node of the partition has less than requested.
    Resources {
        resource: String,
        request_amount: u64,
        node_amount: u64,
    },
    NodeType {
        requested: String,
    },
    Disconnected {
        count: NumOfNodes,
    },
    /// Capable nodes are held by other jobs. `earliest_release` is unknown if
    /// none of these jobs has a time limit.
    Occupied {
        count: NumOfNodes,
        earliest_release: Option<Duration>,
    },
}

impl JobExplanation {
    pub fn is_satisfiable_now(&self) -> bool {
        self.free_nodes >= self.n_nodes
    }
}

pub fn explain_job(job: &Job, registry: &AllocationRegistry, now: DateTime<Utc>) -> JobExplanation {
    let request = job.request();
    let partition = job.partition();
    let mut items = Vec::new();

    if request.n_nodes() > partition.size() {
        items.push(JobExplainItem::PartitionSize {
            n_nodes: request.n_nodes(),
            partition_size: partition.size(),
        });
    }

    let attributes: Vec<_> = partition.nodes().iter().map(|n| n.attributes()).collect();
    let mut check = |resource: &str, request_amount: Option<u64>, amount: &dyn Fn(usize) -> u64| {
        if let Some(request_amount) = request_amount {
            let node_amount = (0..attributes.len()).map(amount).max().unwrap_or(0);
            if request_amount > node_amount {
                items.push(JobExplainItem::Resources {
                    resource: resource.to_string(),
                    request_amount,
                    node_amount,
                });
            }
        }
    };
    check(CPU_RESOURCE_NAME, request.cpus.map(u64::from), &|i| {
        attributes[i].cpus() as u64
    });
    check(GPU_RESOURCE_NAME, request.gpus.map(u64::from), &|i| {
        attributes[i].gpus() as u64
    });
    check(MEM_RESOURCE_NAME, request.memory, &|i| attributes[i].memory());

    if let Some(node_type) = &request.node_type {
        if !attributes
            .iter()
            .any(|a| a.node_type.as_ref() == Some(node_type))
        {
            items.push(JobExplainItem::NodeType {
                requested: node_type.clone(),
            });
        }
    }

    let disconnected = partition
        .nodes()
        .iter()
        .filter(|n| !n.is_connected())
        .count() as NumOfNodes;
    if disconnected > 0 {
        items.push(JobExplainItem::Disconnected {
            count: disconnected,
        });
    }

    let mut capable_nodes = 0;
    let mut free_nodes = 0;
    let mut occupied = 0;
    let mut earliest_release: Option<Duration> = None;
    for node in partition.capable_nodes(request) {
        capable_nodes += 1;
        match registry.for_node(node.name()) {
            None => free_nodes += 1,
            Some(allocation) => {
                occupied += 1;
                if let Some(remaining) = allocation.remaining_time(now) {
                    earliest_release =
                        Some(earliest_release.map_or(remaining, |e| e.min(remaining)));
                }
            }
        }
    }
    if occupied > 0 && free_nodes < request.n_nodes() {
        items.push(JobExplainItem::Occupied {
            count: occupied,
            earliest_release,
        });
    }

    JobExplanation {
        job_id: job.id(),
        n_nodes: request.n_nodes(),
        capable_nodes,
        free_nodes,
        items,
    }
}
