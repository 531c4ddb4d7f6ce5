//! Node eligibility checks.
//!
//! These are recomputed on every pass, nothing is cached: node attributes,
//! connectivity and allocations all change between passes.

use crate::internal::server::job::Job;
use crate::internal::server::node::Node;
use crate::internal::server::registry::AllocationRegistry;

/// Can the node be given to the job right now?
pub fn satisfies(node: &Node, job: &Job, registry: &AllocationRegistry) -> bool {
    is_free(node, registry) && node.is_capable_to_run(job.request())
}

#[inline]
pub fn is_free(node: &Node, registry: &AllocationRegistry) -> bool {
    !registry.is_node_allocated(node.name())
}
