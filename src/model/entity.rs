use indexmap::IndexMap;
use serde::Serialize;

use crate::model::dom::NodeId;

/// Lifecycle state of one repeated field group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum EntityState {
    /// Added on this page; the server has never seen it
    Transient,
    /// Rendered by the server with a known identity
    Persisted { id: String },
    /// Persisted entity whose row was retired: hidden, with its interior
    /// input enabled so the server receives it
    Retired { id: String },
    /// Persisted entity marked for deletion on the next submit
    Deleted {
        id: String,
        /// Tombstone input appended to the row, if the template was available
        #[serde(skip)]
        marker: Option<NodeId>,
    },
}

impl EntityState {
    pub fn identity(&self) -> Option<&str> {
        match self {
            EntityState::Transient => None,
            EntityState::Persisted { id }
            | EntityState::Retired { id }
            | EntityState::Deleted { id, .. } => Some(id),
        }
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self, EntityState::Deleted { .. })
    }
}

/// One entity as reported to callers: its list index plus its state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRecord {
    pub index: usize,
    #[serde(skip)]
    pub node: NodeId,
    #[serde(flatten)]
    pub state: EntityState,
}

/// Ordered entities of one container.
///
/// Entries are kept in document order: mounting only ever inserts before the
/// trailing anchor (or appends), so pushing to the end matches the tree.
#[derive(Debug, Clone)]
pub struct EntityList {
    pub container: NodeId,
    pub anchor: Option<NodeId>,
    entries: IndexMap<NodeId, EntityState>,
}

impl EntityList {
    pub fn new(container: NodeId, anchor: Option<NodeId>) -> Self {
        EntityList {
            container,
            anchor,
            entries: IndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, instance: NodeId, state: EntityState) {
        self.entries.insert(instance, state);
    }

    pub fn state(&self, instance: NodeId) -> Option<&EntityState> {
        self.entries.get(&instance)
    }

    pub fn state_mut(&mut self, instance: NodeId) -> Option<&mut EntityState> {
        self.entries.get_mut(&instance)
    }

    /// Drop an entity, keeping the order of the rest.
    pub fn remove(&mut self, instance: NodeId) -> Option<EntityState> {
        self.entries.shift_remove(&instance)
    }

    /// Move a persisted (or retired) entity to `Deleted`. Returns false if
    /// it is unknown, transient or already deleted.
    pub fn mark_deleted(&mut self, instance: NodeId) -> bool {
        let Some(state) = self.entries.get_mut(&instance) else {
            return false;
        };
        let id = match state {
            EntityState::Persisted { id } | EntityState::Retired { id } => std::mem::take(id),
            EntityState::Transient | EntityState::Deleted { .. } => return false,
        };
        *state = EntityState::Deleted { id, marker: None };
        true
    }

    pub fn records(&self) -> Vec<EntityRecord> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, (&node, state))| EntityRecord {
                index,
                node,
                state: state.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persisted(id: &str) -> EntityState {
        EntityState::Persisted { id: id.into() }
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut list = EntityList::new(NodeId(1), None);
        list.push(NodeId(2), persisted("a"));
        list.push(NodeId(3), EntityState::Transient);
        list.push(NodeId(4), persisted("c"));
        list.remove(NodeId(3));
        let nodes: Vec<NodeId> = list.records().iter().map(|r| r.node).collect();
        assert_eq!(nodes, vec![NodeId(2), NodeId(4)]);
        assert_eq!(list.records()[1].index, 1);
    }

    #[test]
    fn test_mark_deleted_only_once() {
        let mut list = EntityList::new(NodeId(1), None);
        list.push(NodeId(2), persisted("a"));
        assert!(list.mark_deleted(NodeId(2)));
        assert!(!list.mark_deleted(NodeId(2)));
        assert_eq!(
            list.state(NodeId(2)),
            Some(&EntityState::Deleted {
                id: "a".into(),
                marker: None
            })
        );
    }

    #[test]
    fn test_mark_deleted_ignores_transient() {
        let mut list = EntityList::new(NodeId(1), None);
        list.push(NodeId(2), EntityState::Transient);
        assert!(!list.mark_deleted(NodeId(2)));
        assert_eq!(list.state(NodeId(2)), Some(&EntityState::Transient));
    }

    #[test]
    fn test_record_serializes_state_tag() {
        let record = EntityRecord {
            index: 0,
            node: NodeId(7),
            state: EntityState::Deleted {
                id: "e-1".into(),
                marker: Some(NodeId(9)),
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"index":0,"state":"deleted","id":"e-1"}"#);
    }
}
