use crate::events::listeners::{EventKind, Handler, Target};
use crate::model::dom::NodeId;
use crate::model::page::Page;

/// Attach the clamp expander to every element carrying the configured
/// class. Returns how many elements were wired.
pub fn attach(page: &mut Page) -> usize {
    let class = page.config.clamp.class.clone();
    page.dom
        .elements_with_class(&class)
        .into_iter()
        .filter(|&node| {
            page.listeners
                .add(EventKind::Click, Target::Node(node), Handler::ExpandClamp)
        })
        .count()
}

/// Lift the line clamp from a clicked description.
pub fn expand(page: &mut Page, node: NodeId) {
    let expanded = page.config.clamp.expanded_class.clone();
    page.dom.node_mut(node).add_class(&expanded);
}
