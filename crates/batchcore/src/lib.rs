#[macro_use]
pub mod internal;

pub mod config;
pub mod events;

pub use crate::internal::common::ids::{JobId, JobIdCounter};
pub use crate::internal::common::{Map, Set, WrappedRwLock};

pub type Error = internal::common::error::BatchError;
pub type Result<T> = std::result::Result<T, Error>;

pub mod resources {
    pub use crate::internal::common::resources::{
        CPU_RESOURCE_NAME, CapabilityKey, CpuCount, GPU_RESOURCE_NAME, GpuCount, JobRequest,
        MEM_RESOURCE_NAME, MemoryBytes, NodeAttributes, NodeType, NumOfNodes, TimeRequest,
    };
}

pub mod server {
    pub use crate::internal::server::allocation::{Allocation, AllocationData, NodeList};
    pub use crate::internal::server::cluster::Cluster;
    pub use crate::internal::server::core::{CoreRef, SchedulerCore};
    pub use crate::internal::server::explain::{JobExplainItem, JobExplanation, explain_job};
    pub use crate::internal::server::job::{Job, JobRef, JobState, PendingReason};
    pub use crate::internal::server::node::{Node, NodeRef};
    pub use crate::internal::server::partition::{Partition, PartitionRef};
    pub use crate::internal::server::registry::{AllocationRegistry, RegistryData};
}

pub mod scheduler {
    pub use crate::internal::scheduler::backfill::{
        BackfillingScheduler, ShadowReservation, compute_shadow_reservation,
    };
    pub use crate::internal::scheduler::base::{Scheduler, create_scheduler};
    pub use crate::internal::scheduler::fifo::FifoScheduler;
    pub use crate::internal::scheduler::matcher;
    pub use crate::internal::scheduler::queue::JobQueue;
    pub use crate::internal::scheduler::selection::NodeSelection;
    pub use crate::internal::scheduler::service::SchedulerService;
}
