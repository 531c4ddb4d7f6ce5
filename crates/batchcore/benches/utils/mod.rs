use std::sync::Arc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use batchcore::resources::{JobRequest, NodeAttributes};
use batchcore::server::{Cluster, Job, JobRef, PartitionRef};

/// Cluster with one partition "p" of connected nodes `n0`, `n1`, ...
/// Every fourth node is twice as big, so that node selection has work to do.
pub fn create_cluster(node_count: usize) -> (Cluster, PartitionRef) {
    let mut cluster = Cluster::default();
    let mut names = Vec::with_capacity(node_count);
    for i in 0..node_count {
        let name = format!("n{i}");
        let cpus = if i % 4 == 0 { 64 } else { 32 };
        let node = cluster
            .add_node(name.clone(), NodeAttributes::new(cpus, 0, 256 << 30))
            .unwrap();
        node.set_connected(true);
        names.push(name);
    }
    let partition = cluster.add_partition("p", &names).unwrap();
    (cluster, partition)
}

/// Random mix of jobs; ids start at 1.
pub fn create_jobs(partition: &PartitionRef, count: usize, max_nodes: u32) -> Vec<JobRef> {
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    (0..count)
        .map(|i| {
            let mut request = JobRequest::new(rng.random_range(1..=max_nodes));
            if rng.random_bool(0.5) {
                request = request.with_cpus(rng.random_range(1..=64));
            }
            let time_limit = rng
                .random_bool(0.8)
                .then(|| Duration::from_secs(rng.random_range(60..36_000)));
            Arc::new(
                Job::new(
                    (i as u32 + 1).into(),
                    partition.clone(),
                    request,
                    time_limit,
                )
                .unwrap(),
            )
        })
        .collect()
}
