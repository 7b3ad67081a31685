use tracing::debug;

use crate::model::dom::NodeId;
use crate::model::page::Page;
use crate::ops::WidgetError;

/// Detach a field instance that the server has never seen.
///
/// Idempotent: an already-detached instance is left alone and reported as
/// `Ok(false)`. The instance is dropped from its entity list either way,
/// and listeners inside the detached subtree are unregistered.
pub fn remove_transient(page: &mut Page, instance: NodeId) -> Result<bool, WidgetError> {
    if let Some(container) = page.owning_list(instance)
        && let Some(list) = page.lists.get_mut(&container)
    {
        list.remove(instance);
    }
    let detached = page.dom.detach(instance);
    if detached {
        let mut subtree = page.dom.descendants(instance);
        subtree.push(instance);
        let dropped = page.listeners.remove_nodes(&subtree);
        debug!(?instance, dropped, "removed transient instance");
    }
    Ok(detached)
}

/// Remove the instance enclosing a clicked remove control.
pub fn remove_for_control(page: &mut Page, control: NodeId) -> Result<bool, WidgetError> {
    match page.dom.parent(control) {
        Some(instance) => remove_transient(page, instance),
        None => Ok(false),
    }
}
