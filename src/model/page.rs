use indexmap::IndexMap;

use crate::events::listeners::Listeners;
use crate::model::config::WidgetConfig;
use crate::model::dom::{Dom, NodeId};
use crate::model::entity::{EntityList, EntityState};

/// All mutable state of one loaded page.
///
/// Every handler receives the page by `&mut`; there is no other shared
/// state. Nothing here outlives the page.
#[derive(Debug, Clone)]
pub struct Page {
    pub dom: Dom,
    pub config: WidgetConfig,
    pub listeners: Listeners,
    /// Entity lists keyed by container node
    pub lists: IndexMap<NodeId, EntityList>,
}

impl Page {
    pub fn new(dom: Dom, config: WidgetConfig) -> Self {
        Page {
            dom,
            config,
            listeners: Listeners::new(),
            lists: IndexMap::new(),
        }
    }

    /// Entity list for a container, created on first use.
    pub fn list_mut(&mut self, container: NodeId, anchor: Option<NodeId>) -> &mut EntityList {
        self.lists
            .entry(container)
            .or_insert_with(|| EntityList::new(container, anchor))
    }

    /// Entity list of the configured list with this name
    pub fn list_named(&self, name: &str) -> Option<&EntityList> {
        let config = self.config.lists.iter().find(|l| l.name == name)?;
        let container = self.dom.get_element_by_id(&config.container)?;
        self.lists.get(&container)
    }

    /// Container node of the list that tracks `instance`
    pub fn owning_list(&self, instance: NodeId) -> Option<NodeId> {
        self.lists
            .iter()
            .find(|(_, list)| list.state(instance).is_some())
            .map(|(&container, _)| container)
    }

    pub fn entity(&self, instance: NodeId) -> Option<&EntityState> {
        self.lists.values().find_map(|list| list.state(instance))
    }

    pub fn entity_mut(&mut self, instance: NodeId) -> Option<&mut EntityState> {
        self.lists
            .values_mut()
            .find_map(|list| list.state_mut(instance))
    }
}
