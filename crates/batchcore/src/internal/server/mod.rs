pub mod allocation;
pub mod cluster;
pub mod core;
pub mod explain;
pub mod job;
pub mod node;
pub mod partition;
pub mod registry;
