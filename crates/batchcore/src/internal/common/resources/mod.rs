pub mod descriptor;
pub mod request;

pub use descriptor::{CapabilityKey, NodeAttributes};
pub use request::{JobRequest, TimeRequest};

pub type NumOfNodes = u32;
pub type CpuCount = u32;
pub type GpuCount = u32;
pub type MemoryBytes = u64;
pub type NodeType = String;

pub const CPU_RESOURCE_NAME: &str = "cpus";
pub const GPU_RESOURCE_NAME: &str = "gpus";
pub const MEM_RESOURCE_NAME: &str = "mem";
