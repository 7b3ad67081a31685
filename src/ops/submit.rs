use serde::Serialize;

use crate::model::dom::NodeId;
use crate::model::entity::{EntityRecord, EntityState};
use crate::model::page::Page;

/// One `name=value` pair as the browser would post it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedField {
    pub name: String,
    pub value: String,
    /// True when no tombstone node existed and the pair was produced from
    /// the entity state alone
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub synthesized: bool,
}

/// What a form submission would send, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Submission {
    pub fields: Vec<SubmittedField>,
}

impl Submission {
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        self.fields
            .iter()
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect()
    }

    /// Values posted under `name`, in order
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.name == name)
            .map(|f| f.value.as_str())
            .collect()
    }
}

/// Collect every enabled, named field under `scope` (the whole page when
/// `None`) in document order.
///
/// Hidden nodes still submit; detached ones do not. A deleted entity whose
/// tombstone node could not be built contributes a synthesized tombstone
/// right after its own fields, so the deletion is never lost.
pub fn snapshot(page: &Page, scope: Option<NodeId>) -> Submission {
    let scope = scope.unwrap_or_else(|| page.dom.root());
    let mut submission = Submission::default();
    if page.dom.is_attached(scope) {
        collect(page, scope, &mut submission);
    }
    submission
}

fn collect(page: &Page, id: NodeId, out: &mut Submission) {
    let node = page.dom.node(id);
    if node.tag.is_field()
        && !node.disabled
        && let Some(ref name) = node.name
    {
        out.fields.push(SubmittedField {
            name: name.clone(),
            value: node.value.clone(),
            synthesized: false,
        });
    }

    for &child in page.dom.children(id) {
        collect(page, child, out);
    }

    if let Some(EntityState::Deleted { id: identity, marker }) = page.entity(id) {
        let has_marker = marker.is_some_and(|m| page.dom.parent(m) == Some(id));
        if !has_marker {
            out.fields.push(SubmittedField {
                name: page.config.tombstone.name.clone(),
                value: identity.clone(),
                synthesized: true,
            });
        }
    }
}

/// Entities of the configured list `name`, in list order.
pub fn entity_records(page: &Page, name: &str) -> Vec<EntityRecord> {
    page.list_named(name)
        .map(|list| list.records())
        .unwrap_or_default()
}
