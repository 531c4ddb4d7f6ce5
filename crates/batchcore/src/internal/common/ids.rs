use crate::define_id_type;
use std::sync::atomic::{AtomicU32, Ordering};

define_id_type!(JobId, u32);

/// Hands out job ids in submission order.
#[derive(Debug)]
pub struct JobIdCounter {
    next: AtomicU32,
}

impl Default for JobIdCounter {
    fn default() -> Self {
        Self::new(JobId::new(1))
    }
}

impl JobIdCounter {
    pub fn new(first: JobId) -> Self {
        JobIdCounter {
            next: AtomicU32::new(first.as_num()),
        }
    }

    pub fn next_id(&self) -> JobId {
        JobId::new(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Makes sure that ids handed out later are all greater than `id`, saturating at the last id.
    /// Used when jobs are restored from persisted state.
    pub fn bump_past(&self, id: JobId) {
        self.next.fetch_max(id.as_num().saturating_add(1), Ordering::Relaxed);
    }
}
