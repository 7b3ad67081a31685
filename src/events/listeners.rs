use indexmap::IndexMap;
use serde::Serialize;

use crate::model::dom::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Input,
}

/// Where a listener is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Node(NodeId),
    /// Page-level listener; runs after the event has bubbled through the tree
    Document,
}

/// Work to perform when a listener fires.
///
/// Handlers are plain data so the listener table can be inspected, compared
/// and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Handler {
    /// Mount a new instance of the list at this index in the config
    Mount { list: usize },
    /// Detach the remove control's enclosing instance
    RemoveTransient,
    /// Hide the enclosing instance and append a deletion tombstone
    MarkDeleted,
    /// Enable the enclosing row's input and hide the row
    RetireRow,
    /// Flip the panel between hidden and visible
    ToggleVisibility { panel: String },
    /// Hide the panel when a click lands outside trigger and panel
    DismissOutside { panel: String, trigger: String },
    /// Re-evaluate the dirty-state watcher
    DirtyCheck,
    /// Lift the line clamp from a description card
    ExpandClamp,
}

/// Dispatch table: (event kind, target) → handlers in registration order.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    table: IndexMap<(EventKind, Target), Vec<Handler>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. An identical (kind, target, handler) registration
    /// is refused, so attaching the same widget twice is harmless.
    /// Returns true if the handler was added.
    pub fn add(&mut self, kind: EventKind, target: Target, handler: Handler) -> bool {
        let handlers = self.table.entry((kind, target)).or_default();
        if handlers.contains(&handler) {
            return false;
        }
        handlers.push(handler);
        true
    }

    pub fn handlers(&self, kind: EventKind, target: Target) -> &[Handler] {
        self.table
            .get(&(kind, target))
            .map(|h| h.as_slice())
            .unwrap_or(&[])
    }

    /// Drop every listener registered on one of `nodes`. Returns how many
    /// handlers were removed.
    pub fn remove_nodes(&mut self, nodes: &[NodeId]) -> usize {
        let before = self.len();
        self.table.retain(|(_, target), _| match target {
            Target::Node(node) => !nodes.contains(node),
            Target::Document => true,
        });
        before - self.len()
    }

    /// Total number of registered handlers
    pub fn len(&self) -> usize {
        self.table.values().map(|h| h.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
