use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::internal::common::resources::{JobRequest, NodeAttributes};

pub type NodeRef = Arc<Node>;

#[derive(Debug)]
struct NodeState {
    attributes: NodeAttributes,
    connected: bool,
}

/// A schedulable compute node.
///
/// The name is fixed for the whole life of the node. Attributes and the
/// connectivity flag are updated by whoever talks to the node daemon,
/// possibly while a scheduling pass runs on another thread, so they live
/// behind their own small lock. Whether the node is allocated is not stored
/// here at all, the allocation registry is the only source of that fact.
pub struct Node {
    name: String,
    state: RwLock<NodeState>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("attributes", &state.attributes)
            .field("connected", &state.connected)
            .finish()
    }
}

impl Node {
    /// Creates a node that has not connected yet.
    pub fn new(name: impl Into<String>, attributes: NodeAttributes) -> Self {
        Node {
            name: name.into(),
            state: RwLock::new(NodeState {
                attributes,
                connected: false,
            }),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current attributes.
    pub fn attributes(&self) -> NodeAttributes {
        self.state.read().attributes.clone()
    }

    /// Replaces reported capabilities. Existing allocations that use this
    /// node are left untouched, only later passes see the new values.
    pub fn update_attributes(&self, attributes: NodeAttributes) {
        let mut state = self.state.write();
        if state.attributes != attributes {
            log::debug!(
                "Node {} attributes changed: {} -> {}",
                self.name,
                state.attributes,
                attributes
            );
            state.attributes = attributes;
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state.read().connected
    }

    pub fn set_connected(&self, value: bool) {
        let mut state = self.state.write();
        if state.connected != value {
            log::debug!(
                "Node {} {}",
                self.name,
                if value { "connected" } else { "disconnected" }
            );
            state.connected = value;
        }
    }

    /// Is the node connected and do its attributes fit the per-node request?
    /// Allocation state is ignored.
    pub fn is_capable_to_run(&self, request: &JobRequest) -> bool {
        let state = self.state.read();
        state.connected && state.attributes.fulfills(request)
    }
}
