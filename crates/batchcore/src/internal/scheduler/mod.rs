pub mod backfill;
pub mod base;
pub mod fifo;
pub mod matcher;
pub mod queue;
pub mod selection;
pub mod service;

pub use backfill::BackfillingScheduler;
pub use base::{Scheduler, create_scheduler};
pub use fifo::FifoScheduler;
pub use queue::JobQueue;
pub use selection::NodeSelection;
pub use service::SchedulerService;
