use parking_lot::Mutex;

use crate::internal::server::allocation::Allocation;
use crate::internal::server::job::JobState;
use crate::internal::server::node::NodeRef;

/// Receiver of everything the scheduling core reports to the outside world
/// (daemon notification, persistence, user-facing reporting).
pub trait EventProcessor: Send + Sync {
    /// Called once per pass that produced new allocations, in creation order.
    fn on_allocations_created(&self, allocations: &[Allocation]);
    fn on_allocation_released(&self, allocation: &Allocation, state: JobState);
    fn on_node_resources_changed(&self, node: &NodeRef);
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    AllocationsCreated(Vec<Allocation>),
    AllocationReleased {
        allocation: Allocation,
        state: JobState,
    },
    NodeResourcesChanged {
        node: String,
    },
}

/// Keeps events in memory until they are taken; handy for an explicit
/// dispatcher loop and for tests.
#[derive(Default)]
pub struct EventCollector {
    events: Mutex<Vec<SchedulerEvent>>,
}

impl EventCollector {
    pub fn take_events(&self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl EventProcessor for EventCollector {
    fn on_allocations_created(&self, allocations: &[Allocation]) {
        self.events
            .lock()
            .push(SchedulerEvent::AllocationsCreated(allocations.to_vec()));
    }

    fn on_allocation_released(&self, allocation: &Allocation, state: JobState) {
        self.events.lock().push(SchedulerEvent::AllocationReleased {
            allocation: allocation.clone(),
            state,
        });
    }

    fn on_node_resources_changed(&self, node: &NodeRef) {
        self.events.lock().push(SchedulerEvent::NodeResourcesChanged {
            node: node.name().to_string(),
        });
    }
}
