use std::time::Duration;

use derive_builder::Builder;

use crate::internal::common::resources::{CpuCount, GpuCount, JobRequest, MemoryBytes, NumOfNodes};
use crate::internal::server::job::Job;
use crate::internal::server::partition::PartitionRef;

#[derive(Builder)]
#[builder(name = "JobBuilder", pattern = "owned", build_fn(name = "finish"))]
pub struct JobTemplate {
    #[builder(default = "1")]
    id: u32,
    #[builder(default = "1")]
    n_nodes: NumOfNodes,
    #[builder(default, setter(strip_option))]
    cpus: Option<CpuCount>,
    #[builder(default, setter(strip_option))]
    gpus: Option<GpuCount>,
    #[builder(default, setter(strip_option))]
    memory: Option<MemoryBytes>,
    #[builder(default, setter(into, strip_option))]
    node_type: Option<String>,
    #[builder(default, setter(strip_option))]
    time_limit: Option<Duration>,
}

impl JobBuilder {
    pub fn time_limit_secs(self, secs: u64) -> JobBuilder {
        self.time_limit(Duration::from_secs(secs))
    }

    pub fn try_build(self, partition: &PartitionRef) -> crate::Result<Job> {
        let JobTemplate {
            id,
            n_nodes,
            cpus,
            gpus,
            memory,
            node_type,
            time_limit,
        } = self.finish().unwrap();
        Job::new(
            id.into(),
            partition.clone(),
            JobRequest {
                n_nodes,
                cpus,
                gpus,
                memory,
                node_type,
            },
            time_limit,
        )
    }

    pub fn build(self, partition: &PartitionRef) -> Job {
        self.try_build(partition).unwrap()
    }
}
