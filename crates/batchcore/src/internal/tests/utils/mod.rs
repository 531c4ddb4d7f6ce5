#[cfg(test)]
pub mod env;
#[cfg(test)]
pub mod job;
#[cfg(test)]
pub mod node;

use crate::internal::server::allocation::{Allocation, NodeList};
use crate::internal::server::job::JobRef;
use crate::internal::server::partition::PartitionRef;
use chrono::{DateTime, TimeZone, Utc};

pub fn sorted_vec<T: Ord>(mut vec: Vec<T>) -> Vec<T> {
    vec.sort();
    vec
}

/// Fixed point in time, so that time limits in tests are reproducible.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// Allocation of `job` on the nodes of `partition` at the given positions, started at [`test_now`].
pub fn test_allocation(job: &JobRef, partition: &PartitionRef, node_indices: &[usize]) -> Allocation {
    let nodes: NodeList = node_indices
        .iter()
        .map(|idx| partition.nodes()[*idx].clone())
        .collect();
    Allocation::new(job.clone(), nodes, test_now())
}

#[allow(unused)]
#[cfg(test)]
pub fn enable_test_logging() {
    env_logger::builder().is_test(false).init()
}

#[cfg(test)]
pub fn expect_error_message<T>(result: anyhow::Result<T>, msg: &str) {
    match result {
        Ok(_) => panic!("Expected error, got Ok"),
        Err(error) => {
            let formatted = format!("{error:?}");
            if !formatted.contains(msg) {
                panic!("Did not find `{msg}` in `{formatted}`");
            }
        }
    }
}
