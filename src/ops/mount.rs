use tracing::debug;

use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::dom::NodeId;
use crate::model::entity::EntityState;
use crate::model::page::Page;
use crate::ops::WidgetError;

/// Clone the hidden template `template_id` and mount the copy into
/// `container_id`, immediately before `anchor_id` (or at the end when no
/// anchor is given). Returns the new instance.
///
/// The copy loses its id and hidden marker, and its interior remove control
/// gets a transient-removal listener. The instance is tracked as
/// [`EntityState::Transient`] in the container's entity list.
pub fn mount(
    page: &mut Page,
    template_id: &str,
    container_id: &str,
    anchor_id: Option<&str>,
) -> Result<NodeId, WidgetError> {
    let template = page
        .dom
        .get_element_by_id(template_id)
        .ok_or_else(|| WidgetError::missing("template", template_id))?;
    let container = page
        .dom
        .get_element_by_id(container_id)
        .ok_or_else(|| WidgetError::missing("container", container_id))?;
    let anchor = match anchor_id {
        Some(anchor_id) => Some(
            page.dom
                .get_element_by_id(anchor_id)
                .ok_or_else(|| WidgetError::missing("anchor", anchor_id))?,
        ),
        None => None,
    };

    if page
        .dom
        .find_descendant(template, |n| n.is_remove_control())
        .is_none()
    {
        return Err(WidgetError::MalformedTemplate {
            id: template_id.to_string(),
            reason: "no interior remove control",
        });
    }

    let instance = page.dom.deep_clone(template);
    {
        let node = page.dom.node_mut(instance);
        node.id = None;
        node.set_hidden(false);
    }

    match anchor {
        Some(anchor) => {
            // refused unless the anchor is a child of the container; the
            // clone then stays detached and unregistered
            if !page.dom.insert_before(container, instance, anchor) {
                return Err(WidgetError::AnchorOutsideContainer {
                    anchor: anchor_id.unwrap_or_default().to_string(),
                    container: container_id.to_string(),
                });
            }
        }
        None => page.dom.append_child(container, instance),
    }

    if let Some(remove) = page.dom.find_descendant(instance, |n| n.is_remove_control()) {
        page.listeners.add(
            EventKind::Click,
            Target::Node(remove),
            Handler::RemoveTransient,
        );
    }

    page.list_mut(container, anchor)
        .push(instance, EntityState::Transient);

    debug!(template = template_id, container = container_id, ?instance, "mounted instance");
    Ok(instance)
}

/// Mount a new instance of the configured list at `index`.
pub fn mount_list(page: &mut Page, index: usize) -> Result<NodeId, WidgetError> {
    let Some(list) = page.config.lists.get(index).cloned() else {
        return Err(WidgetError::missing("list config", &index.to_string()));
    };
    mount(page, &list.template, &list.container, list.anchor.as_deref())
}
