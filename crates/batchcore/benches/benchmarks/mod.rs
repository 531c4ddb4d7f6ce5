pub mod registry;
pub mod scheduler;
