use crate::JobId;
use crate::internal::server::job::JobState;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Job {job_id} already has a live allocation")]
    DuplicateJobAllocation { job_id: JobId },
    #[error("Node {node} is already allocated to job {owner}, cannot allocate it to job {job_id}")]
    DuplicateNodeAllocation {
        job_id: JobId,
        node: String,
        owner: JobId,
    },
    #[error("Node {0} is listed twice in a single allocation")]
    RepeatedNode(String),
    #[error("Unknown node: {0}")]
    UnknownNode(String),
    #[error("Unknown partition: {0}")]
    UnknownPartition(String),
    #[error("Unknown job: {0}")]
    UnknownJob(JobId),
    #[error("Node {0} already exists")]
    DuplicateNode(String),
    #[error("Partition {0} already exists")]
    DuplicatePartition(String),
    #[error("Invalid job: {0}")]
    InvalidJob(String),
    #[error("Job {job_id} cannot be moved into non-terminal state {state:?}")]
    NonTerminalState { job_id: JobId, state: JobState },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl BatchError {
    /// Returns true if the error signals that the same job or node would be allocated twice.
    pub fn is_duplicate_allocation(&self) -> bool {
        matches!(
            self,
            BatchError::DuplicateJobAllocation { .. }
                | BatchError::DuplicateNodeAllocation { .. }
                | BatchError::RepeatedNode(_)
        )
    }
}

impl From<serde_json::error::Error> for BatchError {
    fn from(e: serde_json::error::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

impl From<toml::de::Error> for BatchError {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}
