use tracing::debug;

use crate::model::dom::{NodeId, Tag};
use crate::model::entity::EntityState;
use crate::model::page::Page;
use crate::ops::WidgetError;

/// Retire a server-rendered row: enable its first interior input so the
/// value is submitted, and hide the row.
///
/// Rows rendered this way carry a disabled input whose value names the
/// entity to remove; enabling it is the whole deletion signal.
pub fn retire_row(page: &mut Page, remove_control: NodeId) -> Result<NodeId, WidgetError> {
    let row = page.dom.parent(remove_control).ok_or(WidgetError::Detached)?;
    let input = page
        .dom
        .find_descendant(row, |n| n.tag == Tag::Input)
        .ok_or_else(|| WidgetError::MalformedTemplate {
            id: page.dom.node(row).id.clone().unwrap_or_default(),
            reason: "row has no input to submit",
        })?;

    page.dom.node_mut(input).disabled = false;
    page.dom.node_mut(row).set_hidden(true);

    if let Some(state) = page.entity_mut(row)
        && let EntityState::Persisted { id } = state
    {
        let id = std::mem::take(id);
        *state = EntityState::Retired { id };
    }

    debug!(?row, "retired row");
    Ok(input)
}
